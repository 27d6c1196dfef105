use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

use super::{FoldConfig, FoldPose, Regime, EPSILON};
use crate::math::PlanarRotation;

/// Where a vertex sits along the fold axis within the active regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Untouched, rest position is kept exactly
    Flat,
    /// On the rising curl
    Arc,
    /// Going over the crease
    Crease,
    /// Lying on top of the sheet after the fold
    FoldedFlat,
}

/// Displacement field of the paper for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldShape {
    regime: Regime,
    rotation: PlanarRotation,
    min_folded_height: f32,
}

impl FoldShape {
    pub fn new(regime: Regime, angle: f32, min_folded_height: f32) -> Self {
        Self {
            regime,
            rotation: PlanarRotation::new(angle),
            min_folded_height,
        }
    }

    pub fn from_pose(pose: FoldPose, config: &FoldConfig) -> Self {
        Self::new(
            Regime::select(pose.target, config),
            pose.angle,
            config.min_folded_height,
        )
    }

    /// Shape at `timestamp_ms` on the animation clock
    pub fn at(timestamp_ms: f64, config: &FoldConfig) -> Self {
        Self::from_pose(FoldPose::at(timestamp_ms, config), config)
    }

    pub fn regime(&self) -> &Regime {
        &self.regime
    }

    pub fn zone(&self, u: f32) -> Zone {
        match self.regime {
            Regime::Flat => Zone::Flat,
            Regime::Curling { target, .. } => {
                if u > target {
                    Zone::Arc
                } else {
                    Zone::Flat
                }
            }
            Regime::Rolling {
                length,
                fold_length,
                flat_bottom,
                ..
            } => {
                if u > length - fold_length {
                    Zone::Crease
                } else if u > flat_bottom {
                    Zone::Arc
                } else {
                    Zone::Flat
                }
            }
            Regime::Folding {
                arc_length,
                flat_bottom,
                flat_top_start,
                ..
            } => {
                if u > flat_top_start {
                    Zone::FoldedFlat
                } else if u > flat_bottom + arc_length {
                    Zone::Crease
                } else if u > flat_bottom {
                    Zone::Arc
                } else {
                    Zone::Flat
                }
            }
        }
    }

    /// Displaced `(u, lift)` for a rest coordinate `u`, `None` if untouched
    pub fn displace_planar(&self, u: f32) -> Option<(f32, f32)> {
        match (self.regime, self.zone(u)) {
            (_, Zone::Flat) => None,
            (Regime::Curling { target, radius }, Zone::Arc) => {
                let theta = (u - target) / radius;
                Some(Self::rise(target, radius, theta))
            }
            (
                Regime::Rolling {
                    radius,
                    arc_length,
                    flat_bottom,
                    ..
                }
                | Regime::Folding {
                    radius,
                    arc_length,
                    flat_bottom,
                    ..
                },
                Zone::Arc,
            ) => {
                let theta = PI * (u - flat_bottom) / arc_length.max(EPSILON);
                Some(Self::rise(flat_bottom, radius, theta))
            }
            (
                Regime::Rolling {
                    length,
                    progress,
                    radius,
                    fold_length,
                    flat_bottom,
                    ..
                },
                Zone::Crease,
            ) => {
                let fold_t = (1.0 - (length - u) / (fold_length + EPSILON)).min(1.0);
                let theta = fold_t * (1.0 - progress) * PI;
                Some(self.crease(flat_bottom, radius, theta))
            }
            (
                Regime::Folding {
                    radius,
                    arc_length,
                    flat_bottom,
                    flat_top_start,
                    ..
                },
                Zone::Crease,
            ) => {
                let fold_t = 1.0 - (flat_top_start - u) / arc_length.max(EPSILON);
                Some(self.crease(flat_bottom, radius, fold_t * PI))
            }
            (Regime::Folding { length, target, .. }, Zone::FoldedFlat) => {
                Some((target + (length - u), self.min_folded_height))
            }
            _ => None,
        }
    }

    /// Live position of a rest vertex
    pub fn displace(&self, rest: Vec3) -> Vec3 {
        if self.regime == Regime::Flat {
            return rest;
        }

        let uv = self.rotation.to_planar(Vec2::new(rest.x, rest.z));
        match self.displace_planar(uv.x) {
            None => rest,
            Some((u, lift)) => {
                let xz = self.rotation.from_planar(Vec2::new(u, uv.y));
                Vec3::new(xz.x, rest.y + lift, xz.y)
            }
        }
    }

    /// Overwrite `live` with the displaced `rest` buffer, index for index
    pub fn apply(&self, rest: &[Vec3], live: &mut [Vec3]) {
        debug_assert_eq!(rest.len(), live.len());
        for (out, r) in live.iter_mut().zip(rest) {
            *out = self.displace(*r);
        }
    }

    /// Circle of `radius` rising from the sheet at `start`
    fn rise(start: f32, radius: f32, theta: f32) -> (f32, f32) {
        let (sin, cos) = theta.sin_cos();
        (start + sin * radius, radius - cos * radius)
    }

    /// Down the far side of the crease onto the layer below
    fn crease(&self, flat_bottom: f32, radius: f32, theta: f32) -> (f32, f32) {
        let (sin, cos) = theta.sin_cos();
        let u = if theta < FRAC_PI_2 {
            flat_bottom - sin * radius
        } else {
            flat_bottom - 2.0 * radius + sin * radius
        };
        (u, (radius + cos * radius).max(self.min_folded_height))
    }
}
