use glam::Vec2;

/// Rotate `(x, z)` into the fold plane `(u, v)`
pub fn to_planar(angle: f32, x: f32, z: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (x * cos - z * sin, x * sin + z * cos)
}

/// Inverse of [`to_planar`]
pub fn from_planar(angle: f32, u: f32, v: f32) -> (f32, f32) {
    to_planar(-angle, u, v)
}

/// Rotation into the fold plane with sin/cos cached for a whole frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarRotation {
    sin: f32,
    cos: f32,
}

impl PlanarRotation {
    pub fn new(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { sin, cos }
    }

    pub fn to_planar(&self, xz: Vec2) -> Vec2 {
        Vec2::new(
            xz.x * self.cos - xz.y * self.sin,
            xz.x * self.sin + xz.y * self.cos,
        )
    }

    pub fn from_planar(&self, uv: Vec2) -> Vec2 {
        Vec2::new(
            uv.x * self.cos + uv.y * self.sin,
            -uv.x * self.sin + uv.y * self.cos,
        )
    }
}

impl Default for PlanarRotation {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_angle_is_identity() {
        let (u, v) = to_planar(0.0, 3.0, -2.0);
        assert_eq!((u, v), (3.0, -2.0));
    }

    #[test]
    fn test_quarter_turn() {
        let (u, v) = to_planar(FRAC_PI_2, 1.0, 0.0);
        assert!(u.abs() < 1e-6);
        assert!((v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let angles = [-PI, -1.3, -0.02, 0.0, 0.7, FRAC_PI_2, 2.9];
        let points = [(0.0, 0.0), (5.5, 4.0), (-5.5, 4.0), (1.25, -3.75)];

        for angle in angles {
            for (x, z) in points {
                let (u, v) = to_planar(angle, x, z);
                let (bx, bz) = from_planar(angle, u, v);
                assert!((bx - x).abs() < 1e-5, "x round trip at angle {}", angle);
                assert!((bz - z).abs() < 1e-5, "z round trip at angle {}", angle);
            }
        }
    }

    #[test]
    fn test_cached_rotation_matches_free_functions() {
        let rotation = PlanarRotation::new(0.9);
        let uv = rotation.to_planar(Vec2::new(2.0, -1.0));
        let (u, v) = to_planar(0.9, 2.0, -1.0);
        assert!((uv.x - u).abs() < 1e-6);
        assert!((uv.y - v).abs() < 1e-6);

        let xz = rotation.from_planar(uv);
        assert!((xz.x - 2.0).abs() < 1e-5);
        assert!((xz.y + 1.0).abs() < 1e-5);
    }
}
