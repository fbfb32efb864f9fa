use glam::{Mat4, Vec4};

use super::pixel_format::PixelFormat;
use crate::math::Color;

/// Affine colour transform on normalised `(r, g, b, a)`: `matrix * c + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub matrix: Mat4,
    pub offset: Vec4,
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        matrix: Mat4::IDENTITY,
        offset: Vec4::ZERO,
    };

    pub fn new(matrix: Mat4, offset: Vec4) -> Self {
        Self { matrix, offset }
    }

    /// Scale alpha by `opacity` (clamped to `0.0..=1.0`)
    pub fn opacity(opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self::new(Mat4::from_diagonal(Vec4::new(1.0, 1.0, 1.0, o)), Vec4::ZERO)
    }

    /// Luma-weighted grayscale, alpha untouched
    pub fn grayscale() -> Self {
        let luma = Vec4::new(0.299, 0.587, 0.114, 0.0);
        // columns: contribution of r, g, b, a to each output channel
        let matrix = Mat4::from_cols(
            Vec4::new(luma.x, luma.x, luma.x, 0.0),
            Vec4::new(luma.y, luma.y, luma.y, 0.0),
            Vec4::new(luma.z, luma.z, luma.z, 0.0),
            Vec4::W,
        );
        Self::new(matrix, Vec4::ZERO)
    }

    pub fn apply(&self, color: Color) -> Color {
        Color::from_vec4(self.matrix * color.to_vec4() + self.offset)
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-draw transparency and colour-transform settings
///
/// Pixels whose colour channels all fall inside the colour-key range are
/// skipped; the rest pass through the colour matrix before compositing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAttributes {
    color_key: Option<(Color, Color)>,
    color_matrix: Option<ColorMatrix>,
}

impl ImageAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes keying out exactly one colour
    pub fn with_color_key(key: Color) -> Self {
        let mut attrs = Self::new();
        attrs.set_color_key(key, key);
        attrs
    }

    /// Treat colours within `[low, high]` (per RGB channel) as transparent
    pub fn set_color_key(&mut self, low: Color, high: Color) {
        self.color_key = Some((low, high));
    }

    pub fn clear_color_key(&mut self) {
        self.color_key = None;
    }

    pub fn color_key(&self) -> Option<(Color, Color)> {
        self.color_key
    }

    pub fn set_color_matrix(&mut self, matrix: ColorMatrix) {
        self.color_matrix = Some(matrix);
    }

    pub fn clear_color_matrix(&mut self) {
        self.color_matrix = None;
    }

    pub fn color_matrix(&self) -> Option<&ColorMatrix> {
        self.color_matrix.as_ref()
    }

    pub fn is_keyed(&self, c: Color) -> bool {
        match self.color_key {
            Some((lo, hi)) => {
                (lo.r..=hi.r).contains(&c.r)
                    && (lo.g..=hi.g).contains(&c.g)
                    && (lo.b..=hi.b).contains(&c.b)
            }
            None => false,
        }
    }

    /// Copy with the colour-key range snapped to what `format` can store
    ///
    /// Quantization is monotonic per channel, so a colour inside the range
    /// stays inside it once written to a buffer of that format.
    pub fn quantized(&self, format: PixelFormat) -> ImageAttributes {
        ImageAttributes {
            color_key: self
                .color_key
                .map(|(lo, hi)| (format.quantize(lo), format.quantize(hi))),
            color_matrix: self.color_matrix,
        }
    }

    /// Colour to composite for a source pixel, `None` when it is keyed out
    pub fn apply(&self, c: Color) -> Option<Color> {
        if self.is_keyed(c) {
            return None;
        }
        Some(match &self.color_matrix {
            Some(m) => m.apply(c),
            None => c,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attributes_pass_through() {
        let attrs = ImageAttributes::new();
        assert_eq!(attrs.apply(Color::RED), Some(Color::RED));
    }

    #[test]
    fn test_exact_color_key() {
        let attrs = ImageAttributes::with_color_key(Color::MAGENTA);
        assert_eq!(attrs.apply(Color::MAGENTA), None);
        assert_eq!(attrs.apply(Color::MAGENTA.with_alpha(10)), None);
        assert_eq!(attrs.apply(Color::rgb(254, 0, 255)), Some(Color::rgb(254, 0, 255)));
    }

    #[test]
    fn test_color_key_range() {
        let mut attrs = ImageAttributes::new();
        attrs.set_color_key(Color::rgb(0, 0, 0), Color::rgb(10, 10, 10));
        assert!(attrs.is_keyed(Color::rgb(5, 10, 0)));
        assert!(!attrs.is_keyed(Color::rgb(5, 11, 0)));
        attrs.clear_color_key();
        assert!(!attrs.is_keyed(Color::BLACK));
    }

    #[test]
    fn test_quantized_key_matches_stored_pixels() {
        let key = Color::rgb(100, 149, 237);
        let attrs = ImageAttributes::with_color_key(key).quantized(PixelFormat::Rgb555);
        assert!(attrs.is_keyed(PixelFormat::Rgb555.quantize(key)));
        assert!(!ImageAttributes::with_color_key(key).is_keyed(PixelFormat::Rgb555.quantize(key)));
    }

    #[test]
    fn test_quantized_keeps_matrix_and_missing_key() {
        let mut attrs = ImageAttributes::new();
        attrs.set_color_matrix(ColorMatrix::opacity(0.5));
        let q = attrs.quantized(PixelFormat::Rgb565);
        assert_eq!(q.color_key(), None);
        assert_eq!(q.color_matrix(), attrs.color_matrix());
    }

    #[test]
    fn test_opacity_matrix_scales_alpha() {
        let out = ColorMatrix::opacity(0.5).apply(Color::WHITE);
        assert_eq!((out.r, out.g, out.b), (255, 255, 255));
        assert_eq!(out.a, 128);
    }

    #[test]
    fn test_grayscale_matrix() {
        let out = ColorMatrix::grayscale().apply(Color::WHITE);
        assert_eq!(out, Color::WHITE);
        let red = ColorMatrix::grayscale().apply(Color::RED);
        assert_eq!(red.r, red.g);
        assert_eq!(red.g, red.b);
    }

    #[test]
    fn test_key_checked_before_matrix() {
        let mut attrs = ImageAttributes::with_color_key(Color::BLACK);
        attrs.set_color_matrix(ColorMatrix::new(Mat4::IDENTITY, Vec4::new(1.0, 0.0, 0.0, 0.0)));
        assert_eq!(attrs.apply(Color::BLACK), None);
        assert_eq!(attrs.apply(Color::rgb(0, 0, 1)), Some(Color::rgb(255, 0, 1)));
    }
}
