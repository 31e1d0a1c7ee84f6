pub mod canvas;
pub mod graphics;
pub mod palette;

pub use canvas::{Canvas, TextSize};
pub use graphics::GraphicsCanvas;
pub use palette::Palette;
