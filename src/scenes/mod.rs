mod lights;
mod paper;
mod props;
mod studio;

pub use lights::{overhead_light, OVERHEAD_LIGHT_POSITION};
pub use paper::{apply_shape, Paper, PaperConfig, PaperLayout};
pub use props::{bust, lychee, plant, table, torus_knot};
pub use studio::{FoldingScene, RusticStudio};
