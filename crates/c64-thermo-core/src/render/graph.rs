//! Bar graph of a sample history
//!
//! Each sample becomes one pixel column. Bar heights use a fixed split of the
//! available height:
//!
//! - 25% is a static floor every bar gets, so a nearly flat history still
//!   reads as a graph instead of a row of dots;
//! - 75% is proportional to where the sample sits between the minimum and the
//!   maximum of the visible window.
//!
//! Bars alternate between two colors every `color_step` samples to mark time
//! boundaries (minutes for the recent history, hours for the long-term one).

use core::fmt::Write;

use crate::display::{Canvas, TextSize};
use crate::storage::BoundedSeries;

/// Share of the bar height every sample gets
pub const STATIC_FRACTION: f32 = 0.25;

/// Share of the bar height that tracks the sample's position in the range
pub const DYNAMIC_FRACTION: f32 = 0.75;

/// Where the graph goes on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphGeometry {
    /// Column of the first (oldest) bar
    pub x0: i32,
    /// Row of the min/max labels
    pub y0: i32,
    /// Height of a bar for the maximum sample
    pub max_bar_length: f32,
    /// Row every bar starts from; bars grow upward
    pub baseline_y: i32,
}

/// Colors used by the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphColors<C> {
    pub bar_primary: C,
    pub bar_secondary: C,
    pub min_label: C,
    pub max_label: C,
    /// Background behind the labels
    pub background: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Primary,
    Secondary,
}

impl BarColor {
    /// Color band of sample `index` when bands are `step` samples wide.
    pub fn for_index(index: usize, step: usize) -> Self {
        if (index / step.max(1)) % 2 == 0 {
            Self::Primary
        } else {
            Self::Secondary
        }
    }

    fn resolve<C: Copy>(self, colors: &GraphColors<C>) -> C {
        match self {
            Self::Primary => colors.bar_primary,
            Self::Secondary => colors.bar_secondary,
        }
    }
}

/// One pixel column of the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Position in the series, oldest first
    pub index: usize,
    pub length: f32,
    pub color: BarColor,
}

/// Length of the bar for `value` in a window spanning `min..=min + range`.
pub fn bar_length(value: f32, min: f32, range: f32, max_bar_length: f32) -> f32 {
    let normalized = if range > 0.0 {
        (value - min) / range
    } else {
        0.0
    };
    max_bar_length * STATIC_FRACTION + normalized * max_bar_length * DYNAMIC_FRACTION
}

pub struct GraphRenderer;

impl GraphRenderer {
    /// Map every sample of `series` to a bar. Empty for an empty series.
    pub fn bars<'s>(
        series: &'s BoundedSeries,
        color_step: usize,
        max_bar_length: f32,
    ) -> impl Iterator<Item = Bar> + 's {
        let (min, max) = series.min_max().unwrap_or_default();
        let range = max - min;

        series.iter().enumerate().map(move |(index, value)| Bar {
            index,
            length: bar_length(value, min, range, max_bar_length),
            color: BarColor::for_index(index, color_step),
        })
    }

    /// Draw `series` as a bar graph followed by its min/max labels.
    ///
    /// An empty series draws nothing.
    pub fn render<C: Canvas>(
        canvas: &mut C,
        series: &BoundedSeries,
        color_step: usize,
        geometry: &GraphGeometry,
        colors: &GraphColors<C::Color>,
    ) -> Result<(), C::Error> {
        let Some((min, max)) = series.min_max() else {
            return Ok(());
        };

        for bar in Self::bars(series, color_step, geometry.max_bar_length) {
            let top_y = geometry.baseline_y - bar.length as i32;
            canvas.vline(
                geometry.baseline_y,
                top_y,
                geometry.x0 + bar.index as i32,
                bar.color.resolve(colors),
            )?;
        }

        Self::render_labels(canvas, min, max, geometry, colors)
    }

    fn render_labels<C: Canvas>(
        canvas: &mut C,
        min: f32,
        max: f32,
        geometry: &GraphGeometry,
        colors: &GraphColors<C::Color>,
    ) -> Result<(), C::Error> {
        let mut label: heapless::String<24> = heapless::String::new();

        write!(label, "min:{:.1}", min).ok();
        canvas.text(0, geometry.y0, &label, colors.min_label, colors.background)?;

        label.clear();
        write!(label, "max:{:.1}", max).ok();
        let x = canvas.width() as i32 - canvas.text_width(&label, TextSize::Normal) as i32;
        canvas.text(x, geometry.y0, &label, colors.max_label, colors.background)
    }
}
