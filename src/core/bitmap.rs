use super::pixel_format::PixelFormat;
use crate::error::{Result, SurfaceError};
use crate::math::Color;
use crate::traits::Image;

/// Owned pixel buffer - one packed `0xAARRGGBB` word per pixel
#[derive(Clone, PartialEq)]
pub struct Bitmap {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Bitmap {
    /// Allocate a buffer cleared to the format's representation of transparent black
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|n| *n > 0 && *n <= isize::MAX as usize);
        if bytes.is_none() {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }

        let blank = format.quantize(Color::TRANSPARENT).to_u32();
        Ok(Self {
            pixels: vec![blank; width as usize * height as usize],
            width,
            height,
            format,
        })
    }

    /// Build a buffer from tightly packed RGBA8 bytes
    pub fn from_rgba8(width: u32, height: u32, format: PixelFormat, data: &[u8]) -> Result<Self> {
        let mut bitmap = Self::new(width, height, format)?;
        let expected = bitmap.pixel_count() * 4;
        if data.len() != expected {
            return Err(SurfaceError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        for (dst, px) in bitmap.pixels.iter_mut().zip(data.chunks_exact(4)) {
            *dst = format.quantize(Color::from_argb(px[3], px[0], px[1], px[2])).to_u32();
        }

        Ok(bitmap)
    }

    /// Tightly packed RGBA8 copy of the buffer
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixel_count() * 4);
        for &word in &self.pixels {
            let c = Color::from_u32(word);
            out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Size in bytes at the buffer's pixel format
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * self.format.bits_per_pixel() as usize / 8
    }

    /// Packed ARGB words, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes of the packed words, for uploading to a presenter
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|idx| Color::from_u32(self.pixels[idx]))
    }

    /// Overwrite one pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = self.format.quantize(color).to_u32();
        }
    }

    /// Composite one pixel source-over; out-of-bounds writes are ignored
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            let dst = Color::from_u32(self.pixels[idx]);
            self.pixels[idx] = self.format.quantize(color.over(dst)).to_u32();
        }
    }

    /// Fill every pixel with `color`, no blending
    pub fn fill(&mut self, color: Color) {
        let word = self.format.quantize(color).to_u32();
        self.pixels.fill(word);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Image for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.get_pixel(x, y)
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}
