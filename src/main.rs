use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use offscreen::cli::Cli;
use offscreen::core::{ColorMatrix, Font, FontStyle, Graphics, ImageAttributes, OffscreenSurface, PixelFormat, TextAlign};
use offscreen::math::{Color, Rect};
use offscreen::{DrawContext, SurfaceConfig};

// === Constants ===

const SPRITE_SIZE: i32 = 32;
const SPRITE_COUNT: i32 = 6;
const BANNER_HEIGHT: i32 = 24;
const BACKGROUND: Color = Color::rgb(16, 24, 40);

/// Sprite drawn once off-screen: a ring of hue bands on a magenta key
fn build_sprite(config: &SurfaceConfig) -> Result<OffscreenSurface> {
    let mut sprite = OffscreenSurface::with_config(config.clone())?;
    let g = sprite.create_sized(SPRITE_SIZE, SPRITE_SIZE)?;
    g.clear(Color::MAGENTA);

    let c = SPRITE_SIZE / 2;
    for r in (2..c).rev().step_by(3) {
        let hue = r as f32 / c as f32;
        g.fill_circle(c, c, r, Color::from_hsv(hue, 0.8, 1.0));
    }
    g.draw_circle(c, c, c - 1, Color::WHITE);
    Ok(sprite)
}

fn build_banner(config: &SurfaceConfig, width: i32, label: &str) -> Result<OffscreenSurface> {
    let mut banner = OffscreenSurface::with_config(config.clone())?;
    banner.create_sized(width, BANNER_HEIGHT)?;
    banner.clear(Color::BLACK)?;

    let font = Font::with_style("Sans", 20.0, FontStyle::BOLD)?;
    let fit = banner.fit_and_draw_string(label, &font, Color::WHITE, width, BANNER_HEIGHT, TextAlign::Center)?;
    info!("banner text fitted at {}pt ({:.0}x{:.0})", fit.font_size, fit.measured.width, fit.measured.height);
    Ok(banner)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SurfaceConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SurfaceConfig::default(),
    };
    info!("surface config: {config:?}");

    let mut back = Graphics::new(cli.width, cli.height, PixelFormat::Argb32)?;
    back.clear(BACKGROUND);
    let width = cli.width as i32;
    let height = cli.height as i32;

    let sprite = build_sprite(&config)?;
    let spacing = width / (SPRITE_COUNT + 1);

    // keyed sprites along the top row, growing left to right
    for i in 0..SPRITE_COUNT {
        let size = SPRITE_SIZE / 2 + i * 4;
        let dest = Rect::new(spacing * (i + 1) - size / 2, BANNER_HEIGHT + 8, size, size);
        sprite.paint_with_color_key(&mut back, dest, Color::MAGENTA)?;
    }

    // keyed and faded copy through shared attributes
    let mut attrs = ImageAttributes::with_color_key(Color::MAGENTA);
    attrs.set_color_matrix(ColorMatrix::opacity(0.5));
    sprite.paint_with_attributes(&mut back, Rect::new(width / 2 - 48, height / 2, 96, 96), &attrs)?;

    // unkeyed native and cropped paints along the bottom
    sprite.paint_at(&mut back, 4, height - SPRITE_SIZE - 4)?;
    let half = SPRITE_SIZE / 2;
    sprite.paint_cropped(&mut back, SPRITE_SIZE + 8, height - SPRITE_SIZE - 4, half, half)?;

    let banner = build_banner(&config, width, &cli.label)?;
    banner.paint_at(&mut back, 0, 0)?;

    info!("composited {}x{} frame", back.width(), back.height());

    if let Some(path) = &cli.output {
        let bitmap = back.into_bitmap();
        let (w, h) = bitmap.dimensions();
        let frame = image::RgbaImage::from_raw(w, h, bitmap.to_rgba8())
            .context("frame buffer does not match its dimensions")?;
        frame
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}x{} frame to {}", w, h, path.display());
    }

    Ok(())
}
