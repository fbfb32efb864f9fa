mod bitmap;
mod font;
mod glyphs;
mod graphics;
mod image_attributes;
mod pixel_format;
mod surface;

pub use bitmap::Bitmap;
pub use font::{Font, FontStyle, SolidBrush, LINE_SPACING};
pub use graphics::Graphics;
pub use image_attributes::{ColorMatrix, ImageAttributes};
pub use pixel_format::PixelFormat;
pub use surface::{OffscreenSurface, TextAlign, TextFit};
