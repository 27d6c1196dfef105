//! Procedural paper folding.
//!
//! A flat sheet is warped each frame as a pure function of a pose: a scalar
//! `target` sweeping the sheet through the flat, curling, rolling and folding
//! regimes, and an `angle` that turns the fold axis in the ground plane.
//! Nothing is carried over between frames.

mod pose;
mod regime;
mod shape;

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

pub use pose::FoldPose;
pub use regime::{Regime, RegimeKind};
pub use shape::{FoldShape, Zone};

/// Guard added to divisors that reach zero at regime boundaries
pub const EPSILON: f32 = 1e-5;

/// Smallest curl radius any configuration can produce
pub const MIN_RADIUS_FLOOR: f32 = 1e-3;

/// Upper bound on `min_radius` as a fraction of the touchdown radius
pub const MAX_MIN_RADIUS_RATIO: f32 = 0.5;

/// Shape and timing constants of the fold animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldConfig {
    /// Paper length `L` along the fold axis
    pub length: f32,
    /// Peak of the `target` oscillation, normally equal to `length`
    pub amplitude: f32,
    /// `target = amplitude * cos(t / fold_period_ms)`
    pub fold_period_ms: f64,
    /// `angle = twist_amplitude * cos(t / twist_period_ms)`
    pub twist_period_ms: f64,
    pub twist_amplitude: f32,
    pub min_radius: f32,
    /// Lift kept between the folded-over layer and the sheet beneath it
    pub min_folded_height: f32,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            length: 6.8,
            amplitude: 6.8,
            fold_period_ms: 2000.0,
            twist_period_ms: 3000.0,
            twist_amplitude: FRAC_PI_2,
            min_radius: 0.03,
            min_folded_height: 0.03,
        }
    }
}

impl FoldConfig {
    /// `target` below which the curl flattens into the fold
    pub fn mid_crease(&self) -> f32 {
        self.length / 2.0
    }

    /// `target` below which the rolled sheet has touched down
    pub fn touchdown(&self) -> f32 {
        self.length / 8.0
    }

    /// Radius of the roll at touchdown, shared by Rolling and Folding
    pub fn touchdown_radius(&self) -> f32 {
        let length = self.length.max(EPSILON);
        (length - length / 8.0) / (2.0 + 2.0 * PI)
    }

    /// Folding radius floor, kept below the touchdown radius
    pub fn min_radius(&self) -> f32 {
        let ceiling = self.touchdown_radius() * MAX_MIN_RADIUS_RATIO;
        self.min_radius.max(MIN_RADIUS_FLOOR).min(ceiling)
    }
}
