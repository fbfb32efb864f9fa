mod color;
mod rect;

pub use color::Color;
pub use rect::{PointF, Rect, Size, SizeF};
