//! Fonts, brushes and the bundled bitmap text rasterizer.
//!
//! Text uses a single 8x8 ASCII face scaled to the font size. Sizes are in
//! points at 72 dpi, so one point is one pixel: every glyph advances by
//! `size` pixels and lines are `size * LINE_SPACING` apart. The family name is
//! carried for identity (and for contexts with real font backends) but does
//! not change the bundled face.

use bitflags::bitflags;

use super::bitmap::Bitmap;
use super::glyphs::glyph;
use crate::error::{Result, SurfaceError};
use crate::math::{Color, SizeF};

/// Line height as a multiple of the font size
pub const LINE_SPACING: f32 = 1.25;

/// Italic shear, in ems of horizontal offset across the glyph height
const ITALIC_SHEAR: f32 = 0.2;

bitflags! {
    /// Combinable style flags
    #[derive(Default)]
    pub struct FontStyle: u8 {
        const REGULAR   = 0;
        const BOLD      = 0b0001;
        const ITALIC    = 0b0010;
        const UNDERLINE = 0b0100;
        const STRIKEOUT = 0b1000;
    }
}

/// Font family, size and style
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    size: f32,
    style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Result<Self> {
        Self::with_style(family, size, FontStyle::REGULAR)
    }

    pub fn with_style(family: impl Into<String>, size: f32, style: FontStyle) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(SurfaceError::InvalidFontSize(size));
        }
        Ok(Self {
            family: family.into(),
            size,
            style,
        })
    }

    /// Same family and style at another size
    pub fn with_size(&self, size: f32) -> Result<Self> {
        Self::with_style(self.family.clone(), size, self.style)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Horizontal advance of every glyph
    pub fn advance(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_SPACING
    }

    /// Width of the longest line by the number of lines
    pub fn measure(&self, text: &str) -> SizeF {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        SizeF::new(widest as f32 * self.advance(), lines as f32 * self.line_height())
    }
}

/// Solid colour fill for text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBrush {
    color: Color,
}

impl SolidBrush {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Rasterize `text` into `target` with its layout box top-left at `(x, y)`
pub(crate) fn rasterize_text(target: &mut Bitmap, text: &str, font: &Font, color: Color, x: f32, y: f32) {
    let advance = font.advance();
    let em = font.size();
    let line_height = font.line_height();
    let pad = (line_height - em) / 2.0;
    let style = font.style();
    let thickness = (em / 16.0).max(1.0);

    for (row, line) in text.split('\n').enumerate() {
        let top = y + row as f32 * line_height + pad;
        let mut count = 0usize;

        for (col, ch) in line.chars().enumerate() {
            let left = x + col as f32 * advance;
            draw_glyph(target, ch, left, top, advance, em, style, color);
            count = col + 1;
        }

        if count == 0 {
            continue;
        }
        let width = count as f32 * advance;
        if style.contains(FontStyle::UNDERLINE) {
            fill_span(target, x, top + em * 0.9, width, thickness, color);
        }
        if style.contains(FontStyle::STRIKEOUT) {
            fill_span(target, x, top + em * 0.5, width, thickness, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    target: &mut Bitmap,
    ch: char,
    left: f32,
    top: f32,
    advance: f32,
    em: f32,
    style: FontStyle,
    color: Color,
) {
    let rows = glyph(ch);
    let bold = style.contains(FontStyle::BOLD);
    let italic = style.contains(FontStyle::ITALIC);
    let slant = if italic { em * ITALIC_SHEAR } else { 0.0 };

    let (w, h) = target.dimensions();
    let x0 = left.floor().max(0.0) as i64;
    let x1 = ((left + advance + slant).ceil() as i64).min(w as i64);
    let y0 = top.floor().max(0.0) as i64;
    let y1 = ((top + em).ceil() as i64).min(h as i64);

    for py in y0..y1 {
        let v = (py as f32 + 0.5 - top) / em;
        if !(0.0..1.0).contains(&v) {
            continue;
        }
        let gy = (v * 8.0) as usize;
        let shift = slant * (1.0 - v);

        for px in x0..x1 {
            let u = (px as f32 + 0.5 - left - shift) / advance;
            if !(0.0..1.0).contains(&u) {
                continue;
            }
            let gx = (u * 8.0) as usize;
            let ink = |gx: usize| rows[gy] & (0x80 >> gx) != 0;
            if ink(gx) || (bold && gx > 0 && ink(gx - 1)) {
                target.blend_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn fill_span(target: &mut Bitmap, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let (w, h) = target.dimensions();
    let x0 = x.round().max(0.0) as i64;
    let x1 = ((x + width).round() as i64).min(w as i64);
    let y0 = y.round().max(0.0) as i64;
    let y1 = ((y + height).round() as i64).min(h as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            target.blend_pixel(px as u32, py as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PixelFormat;

    #[test]
    fn test_font_rejects_bad_sizes() {
        assert!(matches!(Font::new("Sans", 0.0), Err(SurfaceError::InvalidFontSize(_))));
        assert!(Font::new("Sans", -3.0).is_err());
        assert!(Font::new("Sans", f32::NAN).is_err());
        assert!(Font::new("Sans", 0.5).is_ok());
    }

    #[test]
    fn test_with_size_keeps_family_and_style() {
        let font = Font::with_style("Mono", 12.0, FontStyle::BOLD | FontStyle::ITALIC).unwrap();
        let smaller = font.with_size(11.0).unwrap();
        assert_eq!(smaller.family(), "Mono");
        assert_eq!(smaller.style(), font.style());
        assert_eq!(smaller.size(), 11.0);
    }

    #[test]
    fn test_style_flags() {
        let mut style = FontStyle::REGULAR;
        assert!(!style.contains(FontStyle::BOLD));
        style |= FontStyle::UNDERLINE;
        assert!(style.contains(FontStyle::UNDERLINE));
        assert!(style.contains(FontStyle::REGULAR));
    }

    #[test]
    fn test_style_default_and_bits() {
        assert_eq!(FontStyle::default(), FontStyle::REGULAR);
        assert!(FontStyle::REGULAR.is_empty());
        let all = FontStyle::BOLD | FontStyle::ITALIC | FontStyle::UNDERLINE | FontStyle::STRIKEOUT;
        assert_eq!(all, FontStyle::all());
        assert_eq!((FontStyle::BOLD | FontStyle::STRIKEOUT).bits(), 0b1001);
    }

    #[test]
    fn test_measure_single_line() {
        let font = Font::new("Sans", 10.0).unwrap();
        assert_eq!(font.measure("Hello"), SizeF::new(50.0, 12.5));
    }

    #[test]
    fn test_measure_multi_line_uses_widest() {
        let font = Font::new("Sans", 8.0).unwrap();
        assert_eq!(font.measure("ab\nabcd\n"), SizeF::new(32.0, 30.0));
    }

    #[test]
    fn test_measure_empty() {
        let font = Font::new("Sans", 8.0).unwrap();
        assert_eq!(font.measure("").width, 0.0);
    }

    #[test]
    fn test_rasterize_native_size_matches_glyph_bits() {
        let mut bmp = Bitmap::new(8, 10, PixelFormat::Argb32).unwrap();
        let font = Font::new("Sans", 8.0).unwrap();
        rasterize_text(&mut bmp, "I", &font, Color::WHITE, 0.0, 0.0);

        // line height 10, glyph starts 1px down; 'I' top row is 0x7E
        assert_eq!(bmp.get_pixel(0, 1), Some(Color::TRANSPARENT));
        assert_eq!(bmp.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(bmp.get_pixel(6, 1), Some(Color::WHITE));
        assert_eq!(bmp.get_pixel(7, 1), Some(Color::TRANSPARENT));
        assert_eq!(bmp.get_pixel(3, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_rasterize_space_draws_nothing() {
        let mut bmp = Bitmap::new(16, 16, PixelFormat::Argb32).unwrap();
        let font = Font::new("Sans", 12.0).unwrap();
        rasterize_text(&mut bmp, "  ", &font, Color::WHITE, 0.0, 0.0);
        assert!(bmp.pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn test_underline_spans_text_width() {
        let mut bmp = Bitmap::new(32, 16, PixelFormat::Argb32).unwrap();
        let font = Font::with_style("Sans", 8.0, FontStyle::UNDERLINE).unwrap();
        rasterize_text(&mut bmp, "  ", &font, Color::RED, 0.0, 0.0);
        // pad 1 + 0.9 * 8 = 8.2 -> row 8
        assert_eq!(bmp.get_pixel(0, 8), Some(Color::RED));
        assert_eq!(bmp.get_pixel(15, 8), Some(Color::RED));
        assert_eq!(bmp.get_pixel(16, 8), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_rasterize_clips_negative_origin() {
        let mut bmp = Bitmap::new(4, 4, PixelFormat::Argb32).unwrap();
        let font = Font::new("Sans", 8.0).unwrap();
        rasterize_text(&mut bmp, "W", &font, Color::WHITE, -6.0, -4.0);
        assert_eq!(bmp.pixel_count(), 16);
    }
}
