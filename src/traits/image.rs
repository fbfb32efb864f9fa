use crate::math::{Color, Rect, Size};

/// Read-only source image - anything with dimensions and addressable pixels
pub trait Image {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Colour at `(x, y)`, `None` outside the image
    fn pixel(&self, x: u32, y: u32) -> Option<Color>;

    fn size(&self) -> Size {
        Size::new(self.width() as i32, self.height() as i32)
    }

    /// Rectangle covering the whole image
    fn bounds(&self) -> Rect {
        Rect::from_size(self.width() as i32, self.height() as i32)
    }
}
