use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::PixelFormat;
use crate::error::{Result, SurfaceError};

/// Which blit primitive full-image copies and native-size paints go through
///
/// Some targets only handle one form efficiently; both produce the same pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitMode {
    /// `draw_image_at(image, x, y)`
    NativeOffset,
    /// `draw_image_rect(image, dest, src)` with equal-sized rectangles
    #[default]
    ExplicitRect,
}

/// Surface behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Blit primitive for unscaled whole-image draws
    pub blit_mode: BlitMode,
    /// Format used by `create_sized`
    pub pixel_format: PixelFormat,
    /// Smallest size the text-fit helper shrinks a font to
    pub min_font_size: f32,
    /// Size decrement per text-fit iteration
    pub font_step: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            blit_mode: BlitMode::ExplicitRect,
            pixel_format: PixelFormat::Rgb555,
            min_font_size: 1.0,
            font_step: 1.0,
        }
    }
}

impl SurfaceConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SurfaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_font_size.is_finite() || self.min_font_size <= 0.0 {
            return Err(SurfaceError::Config(format!(
                "min_font_size must be positive, got {}",
                self.min_font_size
            )));
        }
        if !self.font_step.is_finite() || self.font_step <= 0.0 {
            return Err(SurfaceError::Config(format!(
                "font_step must be positive, got {}",
                self.font_step
            )));
        }
        Ok(())
    }
}
