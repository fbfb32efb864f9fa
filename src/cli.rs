// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "offscreen-demo")]
#[command(about = "Composite off-screen sprites onto a back buffer", long_about = None)]
pub struct Cli {
    /// Back buffer width in pixels
    #[arg(long, default_value_t = 320)]
    pub width: u32,

    /// Back buffer height in pixels
    #[arg(long, default_value_t = 200)]
    pub height: u32,

    /// JSON surface configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Text fitted into the banner surface
    #[arg(long, default_value = "Offscreen")]
    pub label: String,

    /// Write the composited frame to this PNG file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
