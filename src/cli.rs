// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "paper-fold")]
#[command(about = "Procedural paper folding in a studio scene", long_about = None)]
pub struct Cli {
    /// JSON configuration file, defaults are used when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Paper grid subdivisions along its width
    #[arg(long)]
    pub width_segments: Option<u32>,

    /// Paper grid subdivisions along its height
    #[arg(long)]
    pub height_segments: Option<u32>,

    /// Draw the paper as one double-sided mesh instead of top and bottom meshes
    #[arg(long)]
    pub double_sided: bool,

    /// Directory holding the .glb models
    #[arg(long)]
    pub assets: Option<PathBuf>,
}
