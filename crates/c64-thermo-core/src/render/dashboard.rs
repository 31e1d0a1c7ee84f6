//! Live dashboard: current values on top, history graph below
//!
//! ```text
//! +--------------------------+
//! |21.5                 48.0 |  large values
//! |temp                 humi |  labels
//! |        ||||||||||||||||  |
//! |  ||||||||||||||||||||||  |  history graph
//! |min:20.9         max:21.6 |  footer
//! +--------------------------+
//! ```

use core::fmt::Write;

use super::graph::{GraphColors, GraphGeometry, GraphRenderer};
use super::layout::{Area, HAlign, VAlign, large_text_in, text_in};
use crate::display::{Canvas, Palette, TextSize};
use crate::sensors::Reading;
use crate::storage::BoundedSeries;

/// Distance of the values from the screen edge
const MARGIN_PX: i32 = 2;

/// Gap between the labels and the tallest possible bar
const HEADER_PADDING_PX: u32 = 5;

/// Gap between the baseline and the footer
const FOOTER_PADDING_PX: u32 = 2;

pub const TEMPERATURE_LABEL: &str = "temp";
pub const HUMIDITY_LABEL: &str = "humi";

/// Graph placement for a canvas of the given size and fonts.
pub fn graph_geometry<C: Canvas>(canvas: &C) -> GraphGeometry {
    let height = canvas.height();
    let (_, large_height) = canvas.glyph_size(TextSize::Large);
    let (_, normal_height) = canvas.glyph_size(TextSize::Normal);

    let bottom_margin = normal_height + FOOTER_PADDING_PX;
    let header = large_height + normal_height + HEADER_PADDING_PX;
    let max_bar_length = height.saturating_sub(header + bottom_margin);

    GraphGeometry {
        x0: 0,
        y0: height as i32 - normal_height as i32,
        max_bar_length: max_bar_length as f32,
        baseline_y: height as i32 - bottom_margin as i32 - 1,
    }
}

pub struct Dashboard;

impl Dashboard {
    /// Redraw the whole dashboard for `reading` and the given history.
    pub fn render<C: Canvas>(
        canvas: &mut C,
        palette: &Palette<C::Color>,
        reading: &Reading,
        history: &BoundedSeries,
        color_step: usize,
    ) -> Result<(), C::Error> {
        canvas.fill(palette.black)?;

        let width = canvas.width();
        let height = canvas.height();
        let values = Area::new(
            MARGIN_PX,
            MARGIN_PX,
            width.saturating_sub(MARGIN_PX as u32),
            height.saturating_sub(MARGIN_PX as u32),
        );

        let mut text: heapless::String<16> = heapless::String::new();
        write!(text, "{:.1}", reading.temperature).ok();
        large_text_in(canvas, values, &text, palette.value_text, HAlign::Left, VAlign::Top)?;

        text.clear();
        write!(text, "{:.1}", reading.humidity).ok();
        large_text_in(canvas, values, &text, palette.value_text, HAlign::Right, VAlign::Top)?;

        let (_, large_height) = canvas.glyph_size(TextSize::Large);
        let labels = Area::new(
            MARGIN_PX,
            MARGIN_PX + large_height as i32,
            values.width,
            values.height.saturating_sub(large_height),
        );
        for (label, align) in [
            (TEMPERATURE_LABEL, HAlign::Left),
            (HUMIDITY_LABEL, HAlign::Right),
        ] {
            text_in(
                canvas,
                labels,
                label,
                palette.label_text,
                palette.black,
                align,
                VAlign::Top,
            )?;
        }

        let colors = GraphColors {
            bar_primary: palette.graph_primary,
            bar_secondary: palette.graph_secondary,
            min_label: palette.min_label,
            max_label: palette.max_label,
            background: palette.black,
        };
        GraphRenderer::render(canvas, history, color_step, &graph_geometry(canvas), &colors)
    }
}
