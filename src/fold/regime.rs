use std::f32::consts::PI;

use super::{FoldConfig, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegimeKind {
    Flat,
    Curling,
    Rolling,
    Folding,
}

/// Active geometric regime and its parameters for one frame
///
/// Bands on `target`, each closed at the top and open at the bottom:
///
/// | regime  | band                           |
/// |---------|--------------------------------|
/// | Flat    | `target > L`                   |
/// | Curling | `L/2 < target <= L`            |
/// | Rolling | `L/8 < target <= L/2`          |
/// | Folding | `target <= L/8`                |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Regime {
    Flat,
    /// A curl lifts off at `u = target`
    Curling { target: f32, radius: f32 },
    /// The curl has become a roll and is shrinking toward touchdown
    Rolling {
        length: f32,
        /// 1 at the mid crease, 0 at touchdown
        progress: f32,
        radius: f32,
        arc_length: f32,
        fold_length: f32,
        flat_bottom: f32,
    },
    /// Folded flat onto itself with the crease moving along `u`
    Folding {
        length: f32,
        /// Clamped to `[-L, L/8]`
        target: f32,
        radius: f32,
        arc_length: f32,
        flat_bottom: f32,
        flat_top_start: f32,
    },
}

impl Regime {
    pub fn select(target: f32, config: &FoldConfig) -> Regime {
        let length = config.length.max(EPSILON);
        let mid_crease = length / 2.0;
        let touchdown = length / 8.0;
        let min_radius = config.min_radius();

        if target.is_nan() || target > length {
            return Regime::Flat;
        }

        // Both sides of L/8 agree on it
        let touchdown_radius = config.touchdown_radius();

        if target > mid_crease {
            let t = (target - mid_crease) / mid_crease;
            let radius = (length / (2.0 * PI)) * 4.0_f32.powf(t);

            Regime::Curling {
                target,
                radius: radius.max(min_radius),
            }
        } else if target > touchdown {
            let t = (target - touchdown) / (mid_crease - touchdown);
            let t_sq = t * t;
            let radius = (t_sq * length / (2.0 * PI) + (1.0 - t_sq) * touchdown_radius)
                .max(min_radius);

            let arc_length = PI * radius;
            let fold_length = (1.0 - t) * arc_length;

            Regime::Rolling {
                length,
                progress: t,
                radius,
                arc_length,
                fold_length,
                flat_bottom: length - arc_length - fold_length,
            }
        } else {
            let target = target.max(-length);
            let t = 1.0 - (target - touchdown) / (-length - touchdown);
            let radius = (t * touchdown_radius + (1.0 - t) * min_radius).max(min_radius);

            let arc_length = PI * radius;
            let flat_bottom = ((length + 2.0 * radius + target) / 2.0 - arc_length).max(0.0);

            Regime::Folding {
                length,
                target,
                radius,
                arc_length,
                flat_bottom,
                flat_top_start: flat_bottom + 2.0 * arc_length,
            }
        }
    }

    pub fn kind(&self) -> RegimeKind {
        match self {
            Regime::Flat => RegimeKind::Flat,
            Regime::Curling { .. } => RegimeKind::Curling,
            Regime::Rolling { .. } => RegimeKind::Rolling,
            Regime::Folding { .. } => RegimeKind::Folding,
        }
    }

    /// Curl radius, `None` while flat
    pub fn radius(&self) -> Option<f32> {
        match *self {
            Regime::Flat => None,
            Regime::Curling { radius, .. }
            | Regime::Rolling { radius, .. }
            | Regime::Folding { radius, .. } => Some(radius),
        }
    }
}
