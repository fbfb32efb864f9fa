use super::image::Image;
use crate::core::{Font, ImageAttributes, SolidBrush};
use crate::error::Result;
use crate::math::{Color, Rect, SizeF};

/// Drawing context bound to exactly one pixel buffer
///
/// Surfaces draw into their own context and paint into any other context
/// implementing this trait (a window back buffer, another surface, ...).
pub trait DrawContext {
    /// Width of the bound buffer
    fn width(&self) -> u32;

    /// Height of the bound buffer
    fn height(&self) -> u32;

    /// Fill the whole buffer with `color`, no blending
    fn clear(&mut self, color: Color);

    /// Native-offset blit: draw `image` at its own size with its top-left at `(x, y)`
    fn draw_image_at(&mut self, image: &dyn Image, x: i32, y: i32) -> Result<()>;

    /// Explicit-rectangle blit: stretch `src` of `image` into `dest`
    ///
    /// - `src` with no area is an error
    /// - `dest` with no area draws nothing
    /// - `attrs` applies colour keying and colour transforms before compositing
    fn draw_image_rect(
        &mut self,
        image: &dyn Image,
        dest: Rect,
        src: Rect,
        attrs: Option<&ImageAttributes>,
    ) -> Result<()>;

    /// Draw the `src` region of `image` unscaled with its top-left at `(x, y)`
    fn draw_image_region(&mut self, image: &dyn Image, x: i32, y: i32, src: Rect) -> Result<()> {
        let dest = Rect::new(x, y, src.width, src.height);
        self.draw_image_rect(image, dest, src, None)
    }

    /// Layout size of `text` at `font`
    fn measure_string(&self, text: &str, font: &Font) -> SizeF;

    /// Draw `text` with its layout box top-left at `(x, y)`
    fn draw_string(&mut self, text: &str, font: &Font, brush: &SolidBrush, x: f32, y: f32) -> Result<()>;
}
