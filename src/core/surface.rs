//! Off-screen drawing surface.
//!
//! An [`OffscreenSurface`] owns a pixel buffer together with the drawing
//! context bound to it. Callers render into the surface through its context
//! (or the `copy_*` helpers) and later composite it onto any other
//! [`DrawContext`] with one of the `paint_*` calls.
//!
//! ```
//! use offscreen::core::{Graphics, OffscreenSurface, PixelFormat};
//! use offscreen::math::{Color, Rect};
//!
//! # fn main() -> offscreen::Result<()> {
//! let mut sprite = OffscreenSurface::with_size(16, 16)?;
//! sprite.clear(Color::MAGENTA)?;
//! if let Some(g) = sprite.graphics_mut() {
//!     g.fill_circle(8, 8, 6, Color::RED);
//! }
//!
//! let mut screen = Graphics::new(320, 240, PixelFormat::Argb32)?;
//! sprite.paint_with_color_key(&mut screen, Rect::new(10, 10, 32, 32), Color::MAGENTA)?;
//! # Ok(())
//! # }
//! ```

use log::debug;

use super::bitmap::Bitmap;
use super::font::{Font, SolidBrush};
use super::graphics::Graphics;
use super::image_attributes::ImageAttributes;
use super::pixel_format::PixelFormat;
use crate::config::{BlitMode, SurfaceConfig};
use crate::error::{Result, SurfaceError};
use crate::math::{Color, PointF, Rect, Size, SizeF};
use crate::traits::{DrawContext, Image};

/// Horizontal placement for [`OffscreenSurface::fit_and_draw_string`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// One pixel in from the left edge of the box
    Left,
    #[default]
    Center,
}

/// What the text-fit helper ended up drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFit {
    /// Font size the text was drawn at
    pub font_size: f32,
    /// Measured layout size at that font size
    pub measured: SizeF,
    /// Top-left of the drawn text
    pub origin: PointF,
}

/// Pixel buffer plus drawing context, allocated and released as one unit
#[derive(Debug, Default)]
pub struct OffscreenSurface {
    graphics: Option<Graphics>,
    config: SurfaceConfig,
}

fn clamp_dimension(v: i32) -> u32 {
    v.max(1) as u32
}

impl OffscreenSurface {
    /// Empty surface, no buffer allocated
    pub fn new() -> Self {
        Self {
            graphics: None,
            config: SurfaceConfig::default(),
        }
    }

    /// Empty surface with validated settings
    pub fn with_config(config: SurfaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graphics: None,
            config,
        })
    }

    /// Surface with a buffer of `width` x `height` (each clamped to at least 1)
    pub fn with_size(width: i32, height: i32) -> Result<Self> {
        let mut surface = Self::new();
        surface.create_sized(width, height)?;
        Ok(surface)
    }

    /// Surface sized to `image` holding a copy of its pixels
    pub fn from_image(image: &dyn Image) -> Result<Self> {
        let mut surface = Self::new();
        surface.create_copy_from_image(image)?;
        Ok(surface)
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The owned buffer, if any
    pub fn image(&self) -> Option<&Bitmap> {
        self.graphics.as_ref().map(Graphics::bitmap)
    }

    /// The drawing context bound to the owned buffer, if any
    pub fn graphics(&self) -> Option<&Graphics> {
        self.graphics.as_ref()
    }

    pub fn graphics_mut(&mut self) -> Option<&mut Graphics> {
        self.graphics.as_mut()
    }

    /// Buffer width, 0 without a buffer
    pub fn width(&self) -> u32 {
        self.image().map_or(0, |b| b.width())
    }

    /// Buffer height, 0 without a buffer
    pub fn height(&self) -> u32 {
        self.image().map_or(0, |b| b.height())
    }

    /// `(0, 0, width, height)`
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width() as i32, self.height() as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_none()
    }

    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.image().map(Bitmap::format)
    }

    // ------------------------------------------------------------------
    // Creation and replacement
    // ------------------------------------------------------------------

    pub fn create(&mut self, size: Size) -> Result<&mut Graphics> {
        self.create_sized(size.width, size.height)
    }

    /// Replace the buffer with one in the configured default format
    pub fn create_sized(&mut self, width: i32, height: i32) -> Result<&mut Graphics> {
        let format = self.config.pixel_format;
        self.create_with_format(width, height, format)
    }

    /// Replace the buffer; the previous pair is released only once the new one exists
    pub fn create_with_format(
        &mut self,
        width: i32,
        height: i32,
        format: PixelFormat,
    ) -> Result<&mut Graphics> {
        let graphics = Graphics::new(clamp_dimension(width), clamp_dimension(height), format)?;
        Ok(self.install(graphics))
    }

    /// Take ownership of an external buffer and bind a new context to it
    ///
    /// Any previously owned buffer is released along with its context.
    pub fn adopt_buffer(&mut self, bitmap: Bitmap) -> &mut Graphics {
        self.install(Graphics::from_image(bitmap))
    }

    /// Size the buffer to `image` without copying pixels
    pub fn create_from_image(&mut self, image: &dyn Image) -> Result<&mut Graphics> {
        self.create_sized(image.width() as i32, image.height() as i32)
    }

    /// Size the buffer to `image` and copy its pixels in at the origin
    pub fn create_copy_from_image(&mut self, image: &dyn Image) -> Result<&mut Graphics> {
        self.create_from_image(image)?;
        self.copy_from(image)?;
        self.context()
    }

    /// Release buffer and context; calling again is a no-op
    pub fn dispose(&mut self) {
        if let Some(graphics) = self.graphics.take() {
            let (w, h) = graphics.bitmap().dimensions();
            debug!("disposing {w}x{h} surface");
        }
    }

    fn install(&mut self, graphics: Graphics) -> &mut Graphics {
        let (w, h) = graphics.bitmap().dimensions();
        match &self.graphics {
            Some(old) => {
                let (ow, oh) = old.bitmap().dimensions();
                debug!("replacing {ow}x{oh} surface with {w}x{h} {:?}", graphics.bitmap().format());
            }
            None => debug!("allocating {w}x{h} {:?} surface", graphics.bitmap().format()),
        }
        self.graphics.insert(graphics)
    }

    fn context(&mut self) -> Result<&mut Graphics> {
        self.graphics.as_mut().ok_or(SurfaceError::NoBuffer)
    }

    fn buffer(&self) -> Result<&Bitmap> {
        self.image().ok_or(SurfaceError::NoBuffer)
    }

    // ------------------------------------------------------------------
    // Drawing into the owned buffer
    // ------------------------------------------------------------------

    /// Draw all of `image` at the origin, native size
    pub fn copy_from(&mut self, image: &dyn Image) -> Result<()> {
        let mode = self.config.blit_mode;
        let g = self.context()?;
        match mode {
            BlitMode::NativeOffset => g.draw_image_at(image, 0, 0),
            BlitMode::ExplicitRect => g.draw_image_rect(image, image.bounds(), image.bounds(), None),
        }
    }

    /// Draw all of `image` at `(x, y)`, native size
    pub fn copy_from_at(&mut self, image: &dyn Image, x: i32, y: i32) -> Result<()> {
        let src = image.bounds();
        self.context()?
            .draw_image_rect(image, src.translate(x, y), src, None)
    }

    /// Stretch all of `image` over the whole buffer
    pub fn copy_scaled_from(&mut self, image: &dyn Image) -> Result<()> {
        let dest = self.bounds();
        self.context()?
            .draw_image_rect(image, dest, image.bounds(), None)
    }

    /// Copy a buffer-sized crop of `image` starting at `(x, y)` to the origin
    pub fn copy_cropped_from(&mut self, image: &dyn Image, x: i32, y: i32) -> Result<()> {
        let crop = Rect::new(x, y, self.width() as i32, self.height() as i32);
        self.context()?.draw_image_region(image, 0, 0, crop)
    }

    /// Stretch the `src` region of `image` over the whole buffer
    pub fn copy_scaled_cropped_from(&mut self, image: &dyn Image, src: Rect) -> Result<()> {
        let dest = self.bounds();
        self.context()?.draw_image_rect(image, dest, src, None)
    }

    /// Fill the whole buffer with `color`
    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.context()?.clear(color);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Compositing onto a destination
    // ------------------------------------------------------------------

    /// Draw the buffer at native size with its top-left at `(x, y)`
    pub fn paint_at(&self, dest: &mut dyn DrawContext, x: i32, y: i32) -> Result<()> {
        let buffer = self.buffer()?;
        match self.config.blit_mode {
            BlitMode::NativeOffset => dest.draw_image_at(buffer, x, y),
            BlitMode::ExplicitRect => {
                let src = buffer.bounds();
                dest.draw_image_rect(buffer, src.translate(x, y), src, None)
            }
        }
    }

    /// Stretch the whole buffer into `rect`
    pub fn paint_scaled_into(&self, dest: &mut dyn DrawContext, rect: Rect) -> Result<()> {
        let buffer = self.buffer()?;
        dest.draw_image_rect(buffer, rect, buffer.bounds(), None)
    }

    /// Draw the top-left `width` x `height` of the buffer at `(x, y)`
    pub fn paint_cropped(
        &self,
        dest: &mut dyn DrawContext,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        let buffer = self.buffer()?;
        dest.draw_image_region(buffer, x, y, Rect::from_size(width, height))
    }

    /// Draw the `crop` region of the buffer at `(x, y)`
    pub fn paint_cropped_region(
        &self,
        dest: &mut dyn DrawContext,
        x: i32,
        y: i32,
        crop: Rect,
    ) -> Result<()> {
        let buffer = self.buffer()?;
        dest.draw_image_region(buffer, x, y, crop)
    }

    /// Stretch the buffer into `rect`, leaving pixels matching `key` untouched
    pub fn paint_with_color_key(&self, dest: &mut dyn DrawContext, rect: Rect, key: Color) -> Result<()> {
        let buffer = self.buffer()?;
        // buffer pixels are quantized, so the key has to be too
        let attrs = ImageAttributes::with_color_key(buffer.format().quantize(key));
        dest.draw_image_rect(buffer, rect, buffer.bounds(), Some(&attrs))
    }

    /// Stretch the buffer into `rect` through caller-owned attributes
    ///
    /// The colour-key range is matched against the buffer's pixel format, so
    /// any colour inside the range before storage is still keyed after it.
    /// `attrs` itself is left untouched.
    pub fn paint_with_attributes(
        &self,
        dest: &mut dyn DrawContext,
        rect: Rect,
        attrs: &ImageAttributes,
    ) -> Result<()> {
        let buffer = self.buffer()?;
        let attrs = attrs.quantized(buffer.format());
        dest.draw_image_rect(buffer, rect, buffer.bounds(), Some(&attrs))
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Shrink `font` until `text` is narrower than `box_width`, then draw it
    /// vertically centred in `box_height`
    ///
    /// The font never shrinks below the configured `min_font_size`; once it
    /// reaches that size, or a step no longer makes it smaller, the text is
    /// drawn even if it still overflows. Centred text starts at
    /// `box_width / 2` (integer division) minus half the measured width.
    pub fn fit_and_draw_string(
        &mut self,
        text: &str,
        font: &Font,
        color: Color,
        box_width: i32,
        box_height: i32,
        align: TextAlign,
    ) -> Result<TextFit> {
        let min_size = self.config.min_font_size;
        let step = self.config.font_step;
        let g = self.context()?;

        let mut font = font.clone();
        let mut measured = g.measure_string(text, &font);

        while measured.width >= box_width as f32 && font.size() > min_size {
            let next = (font.size() - step).max(min_size);
            if next >= font.size() {
                break;
            }
            font = font.with_size(next)?;
            measured = g.measure_string(text, &font);
            debug!("text fit: {}pt -> {:.1}px wide (box {box_width})", font.size(), measured.width);
        }

        let y = (box_height as f32 - measured.height) / 2.0 + 1.0;
        let x = match align {
            TextAlign::Left => 1.0,
            TextAlign::Center => (box_width / 2) as f32 - measured.width / 2.0,
        };

        let brush = SolidBrush::new(color);
        g.draw_string(text, &font, &brush, x, y)?;

        Ok(TextFit {
            font_size: font.size(),
            measured,
            origin: PointF::new(x, y),
        })
    }
}

impl Image for OffscreenSurface {
    fn width(&self) -> u32 {
        OffscreenSurface::width(self)
    }

    fn height(&self) -> u32 {
        OffscreenSurface::height(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image().and_then(|b| b.get_pixel(x, y))
    }
}
