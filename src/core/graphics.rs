use log::trace;

use super::bitmap::Bitmap;
use super::font::{rasterize_text, Font, SolidBrush};
use super::image_attributes::ImageAttributes;
use super::pixel_format::PixelFormat;
use crate::error::{Result, SurfaceError};
use crate::math::{Color, Rect, SizeF};
use crate::traits::{DrawContext, Image};

/// Software drawing context
///
/// The context owns the bitmap it is bound to, so it can never outlive its
/// buffer. Shapes are written source-over and quantized to the bitmap's
/// pixel format.
#[derive(Debug, Clone)]
pub struct Graphics {
    bitmap: Bitmap,
}

impl Graphics {
    /// Bind a context to `bitmap`
    pub fn from_image(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    /// Allocate a bitmap and bind a context to it
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        Ok(Self::from_image(Bitmap::new(width, height, format)?))
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Release the context and hand back its buffer
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    pub fn bounds(&self) -> Rect {
        self.bitmap.bounds()
    }

    /// Draw a single pixel, out-of-bounds coordinates are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 {
            self.bitmap.blend_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clip) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                self.bitmap.blend_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Draw line using Bresenham's algorithm
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let (mut x, mut y) = (x1, y1);

        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);

            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw circle outline using midpoint circle algorithm
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let (mut x, mut y) = (radius, 0i32);
        let mut p = 1 - radius;

        while x >= y {
            let points = [
                (cx + x, cy + y), (cx - x, cy + y),
                (cx + x, cy - y), (cx - x, cy - y),
                (cx + y, cy + x), (cx - y, cy + x),
                (cx + y, cy - x), (cx - y, cy - x),
            ];
            for (px, py) in points {
                self.set_pixel(px, py, color);
            }

            y += 1;
            if p <= 0 {
                p += 2 * y + 1;
            } else {
                x -= 1;
                p += 2 * (y - x) + 1;
            }
        }
    }

    /// Draw filled circle
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn composite(&mut self, x: i32, y: i32, color: Color, attrs: Option<&ImageAttributes>) {
        let color = match attrs {
            Some(attrs) => match attrs.apply(color) {
                Some(c) => c,
                None => return,
            },
            None => color,
        };
        self.bitmap.blend_pixel(x as u32, y as u32, color);
    }
}

impl DrawContext for Graphics {
    fn width(&self) -> u32 {
        self.bitmap.width()
    }

    fn height(&self) -> u32 {
        self.bitmap.height()
    }

    fn clear(&mut self, color: Color) {
        self.bitmap.fill(color);
    }

    fn draw_image_at(&mut self, image: &dyn Image, x: i32, y: i32) -> Result<()> {
        let placed = Rect::new(x, y, image.width() as i32, image.height() as i32);
        let Some(clip) = placed.intersection(&self.bounds()) else {
            return Ok(());
        };
        trace!("blit {}x{} at ({x}, {y}), clipped to {clip:?}", image.width(), image.height());

        for py in clip.y..clip.bottom() {
            let sy = (py - y) as u32;
            for px in clip.x..clip.right() {
                if let Some(c) = image.pixel((px - x) as u32, sy) {
                    self.bitmap.blend_pixel(px as u32, py as u32, c);
                }
            }
        }
        Ok(())
    }

    fn draw_image_rect(
        &mut self,
        image: &dyn Image,
        dest: Rect,
        src: Rect,
        attrs: Option<&ImageAttributes>,
    ) -> Result<()> {
        if src.is_empty() {
            return Err(SurfaceError::InvalidRect(src));
        }
        if dest.is_empty() {
            return Ok(());
        }
        let Some(clip) = dest.intersection(&self.bounds()) else {
            return Ok(());
        };
        trace!("stretch {src:?} into {dest:?}, clipped to {clip:?}");

        // nearest neighbour, sampling source at destination pixel centres
        let scale_x = src.width as f64 / dest.width as f64;
        let scale_y = src.height as f64 / dest.height as f64;
        let (img_w, img_h) = (image.width() as i64, image.height() as i64);

        for py in clip.y..clip.bottom() {
            let sy = src.y as i64 + (((py - dest.y) as f64 + 0.5) * scale_y).floor() as i64;
            if sy < 0 || sy >= img_h {
                continue;
            }
            for px in clip.x..clip.right() {
                let sx = src.x as i64 + (((px - dest.x) as f64 + 0.5) * scale_x).floor() as i64;
                if sx < 0 || sx >= img_w {
                    continue;
                }
                if let Some(c) = image.pixel(sx as u32, sy as u32) {
                    self.composite(px, py, c, attrs);
                }
            }
        }
        Ok(())
    }

    fn measure_string(&self, text: &str, font: &Font) -> SizeF {
        font.measure(text)
    }

    fn draw_string(&mut self, text: &str, font: &Font, brush: &SolidBrush, x: f32, y: f32) -> Result<()> {
        rasterize_text(&mut self.bitmap, text, font, brush.color(), x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(w: u32, h: u32) -> Graphics {
        Graphics::new(w, h, PixelFormat::Argb32).unwrap()
    }

    fn checker() -> Bitmap {
        let mut bmp = Bitmap::new(2, 2, PixelFormat::Argb32).unwrap();
        bmp.set_pixel(0, 0, Color::RED);
        bmp.set_pixel(1, 0, Color::GREEN);
        bmp.set_pixel(0, 1, Color::BLUE);
        bmp.set_pixel(1, 1, Color::WHITE);
        bmp
    }

    #[test]
    fn graphics_clear() {
        let mut g = ctx(10, 10);
        g.clear(Color::RED);
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::RED));
        assert_eq!(g.bitmap().get_pixel(9, 9), Some(Color::RED));
    }

    #[test]
    fn graphics_fill_rect_clipped() {
        let mut g = ctx(10, 10);
        g.fill_rect(Rect::new(-5, 8, 8, 8), Color::BLUE);
        assert_eq!(g.bitmap().get_pixel(0, 9), Some(Color::BLUE));
        assert_eq!(g.bitmap().get_pixel(2, 9), Some(Color::BLUE));
        assert_eq!(g.bitmap().get_pixel(3, 9), Some(Color::TRANSPARENT));
        assert_eq!(g.bitmap().get_pixel(0, 7), Some(Color::TRANSPARENT));
    }

    #[test]
    fn graphics_line_endpoints() {
        let mut g = ctx(50, 50);
        g.draw_line(10, 10, 20, 20, Color::WHITE);
        assert_eq!(g.bitmap().get_pixel(10, 10), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(15, 15), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(20, 20), Some(Color::WHITE));
    }

    #[test]
    fn graphics_circle_top_point() {
        let mut g = ctx(50, 50);
        g.draw_circle(25, 25, 10, Color::WHITE);
        assert_eq!(g.bitmap().get_pixel(25, 15), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(25, 25), Some(Color::TRANSPARENT));
    }

    #[test]
    fn graphics_filled_circle_off_edge() {
        let mut g = ctx(10, 10);
        g.fill_circle(0, 0, 3, Color::GREEN);
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::GREEN));
        assert_eq!(g.bitmap().get_pixel(3, 0), Some(Color::GREEN));
        assert_eq!(g.bitmap().get_pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_at_native_size() {
        let mut g = ctx(4, 4);
        g.draw_image_at(&checker(), 1, 2).unwrap();
        assert_eq!(g.bitmap().get_pixel(1, 2), Some(Color::RED));
        assert_eq!(g.bitmap().get_pixel(2, 2), Some(Color::GREEN));
        assert_eq!(g.bitmap().get_pixel(1, 3), Some(Color::BLUE));
        assert_eq!(g.bitmap().get_pixel(2, 3), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(0, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_at_negative_offset_clips() {
        let mut g = ctx(4, 4);
        g.draw_image_at(&checker(), -1, -1).unwrap();
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(1, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_rect_stretches_by_two() {
        let mut g = ctx(4, 4);
        g.draw_image_rect(&checker(), Rect::from_size(4, 4), Rect::from_size(2, 2), None)
            .unwrap();
        assert_eq!(g.bitmap().get_pixel(1, 1), Some(Color::RED));
        assert_eq!(g.bitmap().get_pixel(2, 1), Some(Color::GREEN));
        assert_eq!(g.bitmap().get_pixel(1, 2), Some(Color::BLUE));
        assert_eq!(g.bitmap().get_pixel(3, 3), Some(Color::WHITE));
    }

    #[test]
    fn draw_image_rect_shrinks() {
        let mut src = Bitmap::new(4, 4, PixelFormat::Argb32).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let c = if x < 2 { Color::RED } else { Color::BLUE };
                src.set_pixel(x, y, c);
            }
        }
        let mut g = ctx(2, 2);
        g.draw_image_rect(&src, Rect::from_size(2, 2), Rect::from_size(4, 4), None)
            .unwrap();
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::RED));
        assert_eq!(g.bitmap().get_pixel(1, 1), Some(Color::BLUE));
    }

    #[test]
    fn draw_image_rect_empty_source_is_error() {
        let mut g = ctx(4, 4);
        let err = g
            .draw_image_rect(&checker(), Rect::from_size(4, 4), Rect::from_size(0, 2), None)
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidRect(_)));
    }

    #[test]
    fn draw_image_rect_empty_destination_is_noop() {
        let mut g = ctx(4, 4);
        g.draw_image_rect(&checker(), Rect::new(0, 0, 0, 4), Rect::from_size(2, 2), None)
            .unwrap();
        assert!(g.bitmap().pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn draw_image_rect_source_outside_image_skips() {
        let mut g = ctx(4, 4);
        g.draw_image_rect(&checker(), Rect::from_size(4, 4), Rect::new(1, 1, 4, 4), None)
            .unwrap();
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(1, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_region_is_unscaled() {
        let mut g = ctx(4, 4);
        g.draw_image_region(&checker(), 2, 2, Rect::new(1, 0, 1, 2)).unwrap();
        assert_eq!(g.bitmap().get_pixel(2, 2), Some(Color::GREEN));
        assert_eq!(g.bitmap().get_pixel(2, 3), Some(Color::WHITE));
        assert_eq!(g.bitmap().get_pixel(3, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_with_color_key() {
        let mut g = ctx(2, 2);
        g.clear(Color::BLACK);
        let attrs = ImageAttributes::with_color_key(Color::GREEN);
        g.draw_image_rect(&checker(), Rect::from_size(2, 2), Rect::from_size(2, 2), Some(&attrs))
            .unwrap();
        assert_eq!(g.bitmap().get_pixel(0, 0), Some(Color::RED));
        assert_eq!(g.bitmap().get_pixel(1, 0), Some(Color::BLACK));
    }

    #[test]
    fn transparent_source_pixels_do_not_overwrite() {
        let src = Bitmap::new(2, 2, PixelFormat::Argb32).unwrap();
        let mut g = ctx(2, 2);
        g.clear(Color::BLUE);
        g.draw_image_at(&src, 0, 0).unwrap();
        assert_eq!(g.bitmap().get_pixel(1, 1), Some(Color::BLUE));
    }

    #[test]
    fn draw_string_marks_pixels() {
        let mut g = ctx(40, 20);
        let font = Font::new("Sans", 8.0).unwrap();
        g.draw_string("Hi", &font, &SolidBrush::new(Color::WHITE), 0.0, 0.0)
            .unwrap();
        assert!(g.bitmap().pixels().iter().any(|p| *p == Color::WHITE.to_u32()));
        assert_eq!(g.measure_string("Hi", &font), SizeF::new(16.0, 10.0));
    }
}
