//! Commodore 64 inspired color palette
//!
//! Colors come from the C64 color table (<https://www.c64-wiki.com/wiki/Color>)
//! and are converted to the canvas' native format once, at startup.

use super::canvas::Canvas;

/// 8-bit RGB triple
pub type Rgb = (u8, u8, u8);

// ============================================================================
// Splash screen
// ============================================================================

/// Inner screen
pub const C64_BACKGROUND: Rgb = (0x00, 0x00, 0xff);

/// Border and text
pub const C64_FOREGROUND: Rgb = (0x00, 0x88, 0xff);

// ============================================================================
// Dashboard
// ============================================================================

pub const BLACK: Rgb = (0x00, 0x00, 0x00);
pub const VALUE_TEXT: Rgb = (0xff, 0xff, 0xff);
pub const LABEL_TEXT: Rgb = (50, 50, 50);

/// First graph color (C64 brown)
pub const GRAPH_PRIMARY: Rgb = (0x88, 0x44, 0x22);

/// Second graph color (C64 dark blue)
pub const GRAPH_SECONDARY: Rgb = (0x00, 0x00, 0xaa);

pub const MIN_LABEL: Rgb = (0x00, 0xcc, 0x55);
pub const MAX_LABEL: Rgb = (0x88, 0x00, 0x00);

/// Palette resolved to a canvas' native color type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette<C> {
    pub background: C,
    pub foreground: C,
    pub black: C,
    pub value_text: C,
    pub label_text: C,
    pub graph_primary: C,
    pub graph_secondary: C,
    pub min_label: C,
    pub max_label: C,
}

impl<C: Copy> Palette<C> {
    /// Resolve every palette entry through the canvas color conversion.
    pub fn for_canvas<K>(canvas: &K) -> Self
    where
        K: Canvas<Color = C>,
    {
        let rgb = |(r, g, b): Rgb| canvas.color_from_rgb(r, g, b);

        Self {
            background: rgb(C64_BACKGROUND),
            foreground: rgb(C64_FOREGROUND),
            black: rgb(BLACK),
            value_text: rgb(VALUE_TEXT),
            label_text: rgb(LABEL_TEXT),
            graph_primary: rgb(GRAPH_PRIMARY),
            graph_secondary: rgb(GRAPH_SECONDARY),
            min_label: rgb(MIN_LABEL),
            max_label: rgb(MAX_LABEL),
        }
    }
}
