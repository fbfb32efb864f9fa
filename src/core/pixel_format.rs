use serde::{Deserialize, Serialize};

use crate::math::Color;

/// Bit layout of a buffer's pixels
///
/// Buffers keep one packed ARGB word per pixel; the format decides which
/// colours are representable, so every write is quantized through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 16-bit, 5 bits per channel, no alpha
    #[default]
    Rgb555,
    /// 16-bit, 6 bits of green, no alpha
    Rgb565,
    /// 16-bit, 1 bit of alpha
    Argb1555,
    /// 24-bit, no alpha
    Rgb24,
    /// 32-bit with an unused byte
    Rgb32,
    /// 32-bit with full alpha
    Argb32,
}

impl PixelFormat {
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Rgb555 | PixelFormat::Rgb565 | PixelFormat::Argb1555 => 16,
            PixelFormat::Rgb24 => 24,
            PixelFormat::Rgb32 | PixelFormat::Argb32 => 32,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::Argb1555 | PixelFormat::Argb32)
    }

    /// Nearest colour this format can store
    pub fn quantize(&self, c: Color) -> Color {
        match self {
            PixelFormat::Rgb555 => Color::rgb(expand5(c.r), expand5(c.g), expand5(c.b)),
            PixelFormat::Rgb565 => Color::rgb(expand5(c.r), expand6(c.g), expand5(c.b)),
            PixelFormat::Argb1555 => {
                let a = if c.a >= 128 { 255 } else { 0 };
                Color::from_argb(a, expand5(c.r), expand5(c.g), expand5(c.b))
            }
            PixelFormat::Rgb24 | PixelFormat::Rgb32 => c.with_alpha(255),
            PixelFormat::Argb32 => c,
        }
    }
}

fn expand5(v: u8) -> u8 {
    let v = v >> 3;
    (v << 3) | (v >> 2)
}

fn expand6(v: u8) -> u8 {
    let v = v >> 2;
    (v << 2) | (v >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_16bit_rgb555() {
        assert_eq!(PixelFormat::default(), PixelFormat::Rgb555);
        assert_eq!(PixelFormat::default().bits_per_pixel(), 16);
    }

    #[test]
    fn test_extremes_survive_quantization() {
        for format in [
            PixelFormat::Rgb555,
            PixelFormat::Rgb565,
            PixelFormat::Argb1555,
            PixelFormat::Rgb24,
            PixelFormat::Rgb32,
            PixelFormat::Argb32,
        ] {
            assert_eq!(format.quantize(Color::WHITE), Color::WHITE, "{format:?}");
            assert_eq!(format.quantize(Color::MAGENTA), Color::MAGENTA, "{format:?}");
            assert_eq!(format.quantize(Color::BLACK), Color::BLACK, "{format:?}");
        }
    }

    #[test]
    fn test_rgb555_drops_low_bits() {
        let q = PixelFormat::Rgb555.quantize(Color::rgb(0x0F, 0x80, 0xF9));
        assert_eq!(q, Color::rgb(0x08, 0x84, 0xFF));
    }

    #[test]
    fn test_rgb565_keeps_more_green() {
        let q = PixelFormat::Rgb565.quantize(Color::rgb(0, 0x06, 0));
        assert_eq!(q.g, 0x04);
        assert_eq!(PixelFormat::Rgb555.quantize(Color::rgb(0, 0x06, 0)).g, 0);
    }

    #[test]
    fn test_formats_without_alpha_are_opaque() {
        let c = Color::from_argb(10, 1, 2, 3);
        assert_eq!(PixelFormat::Rgb24.quantize(c).a, 255);
        assert_eq!(PixelFormat::Rgb555.quantize(c).a, 255);
        assert_eq!(PixelFormat::Argb32.quantize(c), c);
    }

    #[test]
    fn test_argb1555_thresholds_alpha() {
        assert_eq!(PixelFormat::Argb1555.quantize(Color::WHITE.with_alpha(127)).a, 0);
        assert_eq!(PixelFormat::Argb1555.quantize(Color::WHITE.with_alpha(128)).a, 255);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PixelFormat::Argb1555).unwrap();
        assert_eq!(json, "\"argb1555\"");
        let parsed: PixelFormat = serde_json::from_str("\"rgb565\"").unwrap();
        assert_eq!(parsed, PixelFormat::Rgb565);
    }
}
