pub mod draw_context;
pub mod image;

pub use draw_context::*;
pub use image::*;
