//! Text placement inside a box

use crate::display::{Canvas, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Axis-aligned box in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `inset` pixels on every side.
    pub const fn inset(self, inset: u32) -> Self {
        Self {
            x: self.x + inset as i32,
            y: self.y + inset as i32,
            width: self.width.saturating_sub(inset * 2),
            height: self.height.saturating_sub(inset * 2),
        }
    }
}

/// Top-left corner for a `text_width` x `text_height` block aligned in `area`.
pub fn place(
    area: Area,
    text_width: u32,
    text_height: u32,
    h_align: HAlign,
    v_align: VAlign,
) -> (i32, i32) {
    let free_x = area.width as i32 - text_width as i32;
    let free_y = area.height as i32 - text_height as i32;

    let x = match h_align {
        HAlign::Left => area.x,
        HAlign::Center => area.x + free_x / 2,
        HAlign::Right => area.x + free_x,
    };
    let y = match v_align {
        VAlign::Top => area.y,
        VAlign::Middle => area.y + free_y / 2,
        VAlign::Bottom => area.y + free_y,
    };
    (x, y)
}

/// Large text with transparent background aligned in `area`.
pub fn large_text_in<C: Canvas>(
    canvas: &mut C,
    area: Area,
    text: &str,
    color: C::Color,
    h_align: HAlign,
    v_align: VAlign,
) -> Result<(), C::Error> {
    let (_, glyph_height) = canvas.glyph_size(TextSize::Large);
    let width = canvas.text_width(text, TextSize::Large);
    let (x, y) = place(area, width, glyph_height, h_align, v_align);
    canvas.large_text(x, y, text, color)
}

/// Normal text over `bg` aligned in `area`.
pub fn text_in<C: Canvas>(
    canvas: &mut C,
    area: Area,
    text: &str,
    fg: C::Color,
    bg: C::Color,
    h_align: HAlign,
    v_align: VAlign,
) -> Result<(), C::Error> {
    let (_, glyph_height) = canvas.glyph_size(TextSize::Normal);
    let width = canvas.text_width(text, TextSize::Normal);
    let (x, y) = place(area, width, glyph_height, h_align, v_align);
    canvas.text(x, y, text, fg, bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_corners_and_center() {
        let area = Area::new(2, 2, 158, 126);

        assert_eq!(place(area, 64, 16, HAlign::Left, VAlign::Top), (2, 2));
        assert_eq!(place(area, 64, 16, HAlign::Right, VAlign::Top), (96, 2));
        assert_eq!(place(area, 64, 16, HAlign::Center, VAlign::Middle), (49, 57));
        assert_eq!(place(area, 64, 16, HAlign::Left, VAlign::Bottom), (2, 112));
    }

    #[test]
    fn test_inset_shrinks_both_sides() {
        let area = Area::new(0, 0, 160, 128).inset(16);
        assert_eq!(area, Area::new(16, 16, 128, 96));
        assert_eq!(Area::new(0, 0, 10, 10).inset(8).width, 0);
    }
}
