//! [`Canvas`] implementation for any embedded-graphics draw target
//!
//! Both the ST7735 driver on the device and the SDL simulator display are
//! `DrawTarget<Color = Rgb565>`, so this adapter is the only canvas needed.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder, ascii};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::canvas::{Canvas, TextSize};

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Normal => &ascii::FONT_6X10,
            TextSize::Large => &ascii::FONT_10X20,
        }
    }
}

/// Canvas over an RGB565 draw target
pub struct GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    target: D,
}

impl<D> GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    type Color = Rgb565;
    type Error = D::Error;

    fn width(&self) -> u32 {
        self.target.bounding_box().size.width
    }

    fn height(&self) -> u32 {
        self.target.bounding_box().size.height
    }

    fn color_from_rgb(&self, r: u8, g: u8, b: u8) -> Rgb565 {
        // To convert from 8-bit RGB: R>>3, G>>2, B>>3
        Rgb565::new(r >> 3, g >> 2, b >> 3)
    }

    fn fill(&mut self, color: Rgb565) -> Result<(), D::Error> {
        self.target.clear(color)
    }

    fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb565,
        filled: bool,
    ) -> Result<(), D::Error> {
        let style = if filled {
            PrimitiveStyle::with_fill(color)
        } else {
            PrimitiveStyle::with_stroke(color, 1)
        };

        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(style)
            .draw(&mut self.target)
    }

    fn vline(&mut self, base_y: i32, top_y: i32, x: i32, color: Rgb565) -> Result<(), D::Error> {
        Line::new(Point::new(x, base_y), Point::new(x, top_y))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
    }

    fn text(&mut self, x: i32, y: i32, text: &str, fg: Rgb565, bg: Rgb565) -> Result<(), D::Error> {
        let style = MonoTextStyleBuilder::new()
            .font(TextSize::Normal.font())
            .text_color(fg)
            .background_color(bg)
            .build();

        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
    }

    fn large_text(&mut self, x: i32, y: i32, text: &str, fg: Rgb565) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(TextSize::Large.font(), fg);

        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
    }

    fn glyph_size(&self, size: TextSize) -> (u32, u32) {
        let font = size.font();
        (
            font.character_size.width + font.character_spacing,
            font.character_size.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn test_color_conversion_keeps_high_bits() {
        let canvas = GraphicsCanvas::new(MockDisplay::<Rgb565>::new());
        assert_eq!(canvas.color_from_rgb(0xff, 0xff, 0xff), Rgb565::WHITE);
        assert_eq!(canvas.color_from_rgb(0, 0, 0xff), Rgb565::new(0, 0, 31));
        assert_eq!(canvas.color_from_rgb(0x00, 0x88, 0xff), Rgb565::new(0, 34, 31));
    }

    #[test]
    fn test_vline_covers_base_to_top() {
        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_out_of_bounds_drawing(false);
        let mut canvas = GraphicsCanvas::new(display);

        canvas.vline(10, 7, 2, Rgb565::RED).unwrap();

        let display = canvas.into_inner();
        for y in 7..=10 {
            assert_eq!(display.get_pixel(Point::new(2, y)), Some(Rgb565::RED));
        }
        assert_eq!(display.get_pixel(Point::new(2, 6)), None);
        assert_eq!(display.get_pixel(Point::new(2, 11)), None);
    }

    #[test]
    fn test_glyph_sizes_follow_fonts() {
        let canvas = GraphicsCanvas::new(MockDisplay::<Rgb565>::new());
        assert_eq!(canvas.glyph_size(TextSize::Normal), (6, 10));
        assert_eq!(canvas.glyph_size(TextSize::Large), (10, 20));
        assert_eq!(canvas.text_width("21.5", TextSize::Large), 40);
    }

    /// Panel that rejects every write, like a display on a dead SPI bus
    struct DeadPanel;

    #[derive(Debug)]
    struct BusFault;

    impl OriginDimensions for DeadPanel {
        fn size(&self) -> Size {
            Size::new(160, 128)
        }
    }

    impl DrawTarget for DeadPanel {
        type Color = Rgb565;
        type Error = BusFault;

        fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), BusFault>
        where
            I: IntoIterator<Item = Pixel<Rgb565>>,
        {
            Err(BusFault)
        }
    }

    fn fill_black<C: Canvas>(canvas: &mut C) -> Result<(), crate::AppError> {
        let black = canvas.color_from_rgb(0, 0, 0);
        canvas.fill(black).map_err(crate::AppError::display)
    }

    #[test]
    fn test_target_errors_surface_through_canvas() {
        let mut canvas = GraphicsCanvas::new(DeadPanel);

        assert_eq!(canvas.width(), 160);
        assert_eq!(
            fill_black(&mut canvas),
            Err(crate::AppError::Display(
                heapless::String::try_from("BusFault").unwrap()
            ))
        );
    }
}
