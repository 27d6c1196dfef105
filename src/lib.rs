pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod fold;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod types;

pub use fold::{FoldConfig, FoldPose, FoldShape, Regime, RegimeKind, Zone};
pub use scenes::{FoldingScene, Paper, PaperConfig};
