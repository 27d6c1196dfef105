use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::CameraConfig;
use crate::cli::Cli;
use crate::fold::{FoldConfig, MAX_MIN_RADIUS_RATIO};
use crate::scenes::{PaperConfig, PaperLayout};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Constant term standing in for the environment map
    pub ambient: f32,
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient: 0.35,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub fold: FoldConfig,
    pub paper: PaperConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub assets_dir: PathBuf,
    pub show_ui: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            fold: FoldConfig::default(),
            paper: PaperConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            assets_dir: PathBuf::from("assets"),
            show_ui: true,
        }
    }
}

impl AppConfig {
    /// Read a JSON config, or the defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                Self::from_json(&text).with_context(|| format!("Invalid config file: {:?}", path))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config JSON")
    }

    pub fn validate(&self) -> Result<()> {
        let fold = &self.fold;
        if !fold.length.is_finite() || fold.length <= 0.0 {
            bail!("fold.length must be positive, got {}", fold.length);
        }
        if !fold.amplitude.is_finite() {
            bail!("fold.amplitude must be finite");
        }
        if fold.fold_period_ms <= 0.0 || fold.twist_period_ms <= 0.0 {
            bail!("fold periods must be positive");
        }
        let radius_ceiling = fold.touchdown_radius() * MAX_MIN_RADIUS_RATIO;
        if !fold.min_radius.is_finite() || fold.min_radius < 0.0 || fold.min_radius > radius_ceiling {
            bail!(
                "fold.min_radius must lie in [0, {}] for length {}, got {}",
                radius_ceiling,
                fold.length,
                fold.min_radius
            );
        }
        if fold.min_folded_height < 0.0 {
            bail!("fold.min_folded_height must not be negative");
        }

        let paper = &self.paper;
        if paper.width_segments == 0 || paper.height_segments == 0 {
            bail!("paper segments must be at least 1");
        }
        if paper.width <= 0.0 || paper.height <= 0.0 {
            bail!("paper size must be positive, got {}x{}", paper.width, paper.height);
        }

        let camera = &self.camera;
        if camera.min_distance > camera.max_distance {
            bail!(
                "camera.min_distance {} exceeds camera.max_distance {}",
                camera.min_distance,
                camera.max_distance
            );
        }
        if camera.near <= 0.0 || camera.far <= camera.near {
            bail!("camera clip planes must satisfy 0 < near < far");
        }

        if self.window.width == 0 || self.window.height == 0 {
            bail!("window size must be non-zero");
        }
        Ok(())
    }

    /// Apply command-line flags on top of file values
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self> {
        if cli.no_ui {
            self.show_ui = false;
        }
        if let Some(segments) = cli.width_segments {
            self.paper.width_segments = segments;
        }
        if let Some(segments) = cli.height_segments {
            self.paper.height_segments = segments;
        }
        if cli.double_sided {
            self.paper.layout = PaperLayout::DoubleSided;
        }
        if let Some(assets) = &cli.assets {
            self.assets_dir = assets.clone();
        }
        self.validate()?;
        Ok(self)
    }
}
