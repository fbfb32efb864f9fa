//! Off-screen drawing surfaces for double-buffered software rendering.
//!
//! Draw into an [`OffscreenSurface`] once, then composite it onto a window
//! back buffer (or any other [`DrawContext`]) as often as needed, natively,
//! scaled, cropped or through a colour key.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod traits;

pub use crate::config::{BlitMode, SurfaceConfig};
pub use crate::core::{Bitmap, Font, FontStyle, Graphics, ImageAttributes, OffscreenSurface, PixelFormat, SolidBrush};
pub use crate::error::{Result, SurfaceError};
pub use crate::traits::{DrawContext, Image};
