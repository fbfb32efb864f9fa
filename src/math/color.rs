use glam::Vec4;
use serde::{Deserialize, Serialize};

/// 8-bit ARGB colour
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    /// Unpack a `0xAARRGGBB` word
    pub const fn from_u32(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` word
    pub const fn to_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Opaque colour from a hue in turns, saturation and value
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        Self::from_rgb_f32(hsv_to_rgb(hue, saturation, value))
    }

    /// Opaque colour from `[r, g, b]` channels in `0.0..=1.0`
    pub fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(c(rgb[0]), c(rgb[1]), c(rgb[2]))
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Normalised `(r, g, b, a)` vector
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }

    pub fn from_vec4(v: Vec4) -> Self {
        let v = (v.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        Self::from_argb(v.w as u8, v.x as u8, v.y as u8, v.z as u8)
    }

    /// Source-over composite of `self` onto `dst`
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = sa as u32;
                let da = dst.a as u32;
                let inv = 255 - sa;
                // out_a scaled by 255
                let out_a = sa * 255 + da * inv;
                if out_a == 0 {
                    return Color::TRANSPARENT;
                }
                let mix = |s: u8, d: u8| {
                    ((s as u32 * sa * 255 + d as u32 * da * inv + out_a / 2) / out_a) as u8
                };
                Color::from_argb(
                    ((out_a + 127) / 255) as u8,
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                )
            }
        }
    }
}

/// `[r, g, b]` in `0.0..=1.0` for a hue in turns (wrapping), saturation and value
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let chroma = value * saturation;
    let sector = hue.rem_euclid(1.0) * 6.0;
    let rising = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let base = value - chroma;

    let [r, g, b] = match sector as u8 {
        0 => [chroma, rising, 0.0],
        1 => [rising, chroma, 0.0],
        2 => [0.0, chroma, rising],
        3 => [0.0, rising, chroma],
        4 => [rising, 0.0, chroma],
        _ => [chroma, 0.0, rising],
    };

    [r + base, g + base, b + base]
}
