//! Drawing capability used by every screen
//!
//! Screens never talk to a display driver directly. They draw through
//! [`Canvas`], which exposes the handful of primitives the dashboard needs:
//! full fills, rectangles, vertical lines and text in two sizes.

/// Text size variants
///
/// - `Normal`: labels, footer and the splash screen text
/// - `Large`: the big temperature and humidity values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Large,
}

/// Abstract drawing surface with a fixed size.
pub trait Canvas {
    /// Native color of the surface
    type Color: Copy + PartialEq + core::fmt::Debug;
    /// Error reported by the underlying display
    type Error: core::fmt::Debug;

    /// Width in pixels, fixed for the lifetime of the canvas
    fn width(&self) -> u32;

    /// Height in pixels, fixed for the lifetime of the canvas
    fn height(&self) -> u32;

    /// Convert an 8-bit-per-channel color to the native color.
    fn color_from_rgb(&self, r: u8, g: u8, b: u8) -> Self::Color;

    /// Fill the whole surface.
    fn fill(&mut self, color: Self::Color) -> Result<(), Self::Error>;

    /// Draw a rectangle outline, or a solid rectangle when `filled`.
    fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Self::Color,
        filled: bool,
    ) -> Result<(), Self::Error>;

    /// Draw a one pixel wide vertical line in column `x` from `base_y` up to `top_y`.
    fn vline(&mut self, base_y: i32, top_y: i32, x: i32, color: Self::Color)
    -> Result<(), Self::Error>;

    /// Draw normal-size text with its top-left corner at `(x, y)` over an
    /// opaque background.
    fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Self::Color,
        bg: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Draw large text with its top-left corner at `(x, y)` and a transparent
    /// background.
    fn large_text(&mut self, x: i32, y: i32, text: &str, fg: Self::Color)
    -> Result<(), Self::Error>;

    /// Cell size `(width, height)` of one character in the given size.
    fn glyph_size(&self, size: TextSize) -> (u32, u32);

    /// Pixel width of `text` rendered in the given size.
    fn text_width(&self, text: &str, size: TextSize) -> u32 {
        let (glyph_width, _) = self.glyph_size(size);
        glyph_width * text.chars().count() as u32
    }
}
