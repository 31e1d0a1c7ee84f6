//! Commodore 64 boot screen
//!
//! Light blue border, dark blue screen, the BASIC banner and `READY.`,
//! followed by the boot commands being typed one character at a time.
//! Typing blocks the caller for a random 0–255 ms per character.

use embedded_hal::delay::DelayNs;
use log::debug;
use rand_core::RngCore;

use super::layout::Area;
use crate::display::{Canvas, Palette, TextSize};

pub const BANNER: &str = "** C64 BASIC **";
pub const READY: &str = "READY.";

/// Commands typed after `READY.`
pub const BOOT_COMMANDS: [&str; 2] = ["LOAD *,8,1", "RUN"];

/// Space between typed text and the screen border
const TEXT_INSET_PX: i32 = 2;

/// Border thickness: 10% of the screen width.
pub fn border_width(width: u32) -> u32 {
    width / 10
}

pub struct Splash;

impl Splash {
    /// Draw the full boot sequence and type `commands`.
    pub fn show<C, D, R>(
        canvas: &mut C,
        palette: &Palette<C::Color>,
        delay: &mut D,
        rng: &mut R,
        commands: &[&str],
    ) -> Result<(), C::Error>
    where
        C: Canvas,
        D: DelayNs,
        R: RngCore,
    {
        debug!("Showing splash screen");

        let screen = Self::draw_frame(canvas, palette)?;
        let (glyph_width, glyph_height) = canvas.glyph_size(TextSize::Normal);
        let mut y = screen.y + TEXT_INSET_PX;

        let banner_width = canvas.text_width(BANNER, TextSize::Normal);
        let spacing = (screen.width as i32 - banner_width as i32) / 2;
        canvas.text(screen.x + spacing, y, BANNER, palette.foreground, palette.background)?;
        y += 2 * glyph_height as i32;

        let x = screen.x + TEXT_INSET_PX;
        canvas.text(x, y, READY, palette.foreground, palette.background)?;
        y += glyph_height as i32;

        for command in commands {
            Self::type_line(
                canvas,
                palette,
                delay,
                rng,
                (x, y),
                (glyph_width, glyph_height),
                command,
            )?;
            y += glyph_height as i32;
        }
        Ok(())
    }

    /// Border fill plus the inner screen; returns the inner screen area.
    fn draw_frame<C: Canvas>(
        canvas: &mut C,
        palette: &Palette<C::Color>,
    ) -> Result<Area, C::Error> {
        canvas.fill(palette.foreground)?;

        let screen = Area::new(0, 0, canvas.width(), canvas.height())
            .inset(border_width(canvas.width()));
        canvas.rect(
            screen.x,
            screen.y,
            screen.width,
            screen.height,
            palette.background,
            true,
        )?;
        Ok(screen)
    }

    /// Type `line` at `origin` with a block cursor after the typed prefix.
    ///
    /// The cursor is left one pixel right of the glyph cell; the next prefix
    /// overwrites all but the last column, which the final erase covers.
    fn type_line<C, D, R>(
        canvas: &mut C,
        palette: &Palette<C::Color>,
        delay: &mut D,
        rng: &mut R,
        (x, y): (i32, i32),
        (glyph_width, glyph_height): (u32, u32),
        line: &str,
    ) -> Result<(), C::Error>
    where
        C: Canvas,
        D: DelayNs,
        R: RngCore,
    {
        let prefix_ends = line
            .char_indices()
            .map(|(end, _)| end)
            .skip(1)
            .chain(core::iter::once(line.len()));

        for (typed_chars, end) in core::iter::once(0).chain(prefix_ends).enumerate() {
            let typed = &line[..end];
            if !typed.is_empty() {
                canvas.text(x, y, typed, palette.foreground, palette.background)?;
            }

            let cursor_x = x + (glyph_width * typed_chars as u32) as i32 + 1;
            canvas.rect(cursor_x, y, glyph_width, glyph_height, palette.foreground, true)?;
            delay.delay_ms(rng.next_u32() & 0xff);
        }

        let end_x = x + (glyph_width * line.chars().count() as u32) as i32;
        canvas.rect(end_x, y, glyph_width + 1, glyph_height, palette.background, true)
    }
}
