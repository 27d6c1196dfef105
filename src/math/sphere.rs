use glam::Vec3;

use super::AABB;

/// Bounding sphere centred on the bounding box of a point set
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere around `points`, centred on their box
    pub fn from_points(points: &[Vec3]) -> Option<BoundingSphere> {
        let center = AABB::from_points(points)?.center();
        let max_distance_sq = points
            .iter()
            .map(|p| center.distance_squared(*p))
            .fold(0.0_f32, f32::max);

        Some(BoundingSphere {
            center,
            radius: max_distance_sq.sqrt(),
        })
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance(point) <= self.radius + 1e-5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_from_symmetric_points() {
        let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let sphere = BoundingSphere::from_points(&points).unwrap();
        assert_eq!(sphere.center, Vec3::ZERO);
        assert!((sphere.radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_contains_all_points() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 1.0, -2.0),
            Vec3::new(-1.0, 3.0, 5.0),
            Vec3::new(2.0, -2.0, 1.0),
        ];
        let sphere = BoundingSphere::from_points(&points).unwrap();
        assert!(points.iter().all(|p| sphere.contains(*p)));
    }

    #[test]
    fn test_sphere_from_no_points() {
        assert!(BoundingSphere::from_points(&[]).is_none());
    }
}
