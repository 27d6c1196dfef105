//! CPU-side mesh buffers.

mod edges;
mod plane;
mod torus_knot;

use glam::{Mat3, Mat4, Vec3};
use log::debug;

use crate::math::{BoundingSphere, AABB};
use crate::scene::Disposable;

pub use edges::{edges_geometry, DEFAULT_THRESHOLD_ANGLE};
pub use plane::plane_geometry;
pub use torus_knot::torus_knot_geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
    LineList,
}

/// Vertex buffers of one mesh
///
/// Deformable geometry also holds a rest snapshot of its positions, taken
/// once by [`Geometry::snapshot_rest`]. Every deformation reads from the
/// snapshot, so error never accumulates across frames.
#[derive(Debug, Clone)]
pub struct Geometry {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Option<Vec<u32>>,
    topology: Topology,
    rest: Option<Vec<Vec3>>,
    bounding_box: Option<AABB>,
    bounding_sphere: Option<BoundingSphere>,
    version: u64,
    disposed: bool,
}

impl Geometry {
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Option<Vec<u32>>,
        topology: Topology,
    ) -> Self {
        let count = positions.len();
        let mut normals = normals;
        normals.resize(count, Vec3::Y);

        Self {
            positions,
            normals,
            indices,
            topology,
            rest: None,
            bounding_box: None,
            bounding_sphere: None,
            version: 0,
            disposed: false,
        }
    }

    /// Indexed triangle mesh with normals to be computed
    pub fn triangles(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut geometry = Self::new(positions, Vec::new(), Some(indices), Topology::TriangleList);
        geometry.compute_vertex_normals();
        geometry
    }

    /// Non-indexed segment list, two vertices per segment
    pub fn lines(positions: Vec<Vec3>) -> Self {
        Self::new(positions, Vec::new(), None, Topology::LineList)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Rest snapshot, or the live positions for static geometry
    pub fn rest(&self) -> &[Vec3] {
        self.rest.as_deref().unwrap_or(&self.positions)
    }

    pub fn is_deformable(&self) -> bool {
        self.rest.is_some()
    }

    /// Freeze the current positions as the rest pose
    ///
    /// Only the first call takes effect.
    pub fn snapshot_rest(&mut self) {
        if self.rest.is_none() {
            self.rest = Some(self.positions.clone());
        }
    }

    /// Rewrite every live position from its rest position
    pub fn deform_from_rest(&mut self, displace: impl Fn(Vec3) -> Vec3) {
        let Some(rest) = &self.rest else {
            debug!("deform_from_rest on static geometry ignored");
            return;
        };

        for (live, r) in self.positions.iter_mut().zip(rest) {
            *live = displace(*r);
        }
        self.mark_positions_dirty();
    }

    /// Apply an affine transform to positions and normals
    pub fn apply_transform(&mut self, transform: &Mat4) {
        let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

        for p in &mut self.positions {
            *p = transform.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = (normal_matrix * *n).normalize_or_zero();
        }
        self.mark_positions_dirty();
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.apply_transform(&Mat4::from_rotation_x(angle));
    }

    /// Translate so the bounding box is centred on the origin
    pub fn center(&mut self) {
        if let Some(aabb) = AABB::from_points(&self.positions) {
            self.apply_transform(&Mat4::from_translation(-aabb.center()));
        }
    }

    /// Area-weighted vertex normals from the triangle faces
    ///
    /// Line geometry has no faces and keeps its normals.
    pub fn compute_vertex_normals(&mut self) {
        if self.topology != Topology::TriangleList {
            return;
        }

        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        let mut accumulate = |a: usize, b: usize, c: usize| {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        };

        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .for_each(|tri| accumulate(tri[0] as usize, tri[1] as usize, tri[2] as usize)),
            None => (0..self.positions.len() / 3)
                .for_each(|i| accumulate(3 * i, 3 * i + 1, 3 * i + 2)),
        }

        for (out, n) in self.normals.iter_mut().zip(normals) {
            *out = n.normalize_or_zero();
        }
    }

    pub fn compute_bounding_box(&mut self) -> Option<AABB> {
        self.bounding_box = AABB::from_points(&self.positions);
        self.bounding_box
    }

    pub fn compute_bounding_sphere(&mut self) -> Option<BoundingSphere> {
        self.bounding_sphere = BoundingSphere::from_points(&self.positions);
        self.bounding_sphere
    }

    pub fn bounding_box(&self) -> Option<AABB> {
        self.bounding_box
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounding_sphere
    }

    /// Flag positions as changed so the renderer uploads them again
    pub fn mark_positions_dirty(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Bumped on every position change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Disposable for Geometry {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.indices = None;
        self.rest = None;
        self.bounding_box = None;
        self.bounding_sphere = None;
        self.disposed = true;
        self.mark_positions_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Geometry {
        Geometry::triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_triangle_normals_follow_winding() {
        let geometry = quad();
        for n in geometry.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_rest_defaults_to_positions() {
        let geometry = quad();
        assert!(!geometry.is_deformable());
        assert_eq!(geometry.rest(), geometry.positions());
    }

    #[test]
    fn test_deform_reads_rest_not_live() {
        let mut geometry = quad();
        geometry.snapshot_rest();
        let shift = |p: Vec3| p + Vec3::Y;

        geometry.deform_from_rest(shift);
        geometry.deform_from_rest(shift);

        assert_eq!(geometry.positions()[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(geometry.rest()[0], Vec3::ZERO);
    }

    #[test]
    fn test_snapshot_is_taken_once() {
        let mut geometry = quad();
        geometry.snapshot_rest();
        geometry.apply_transform(&Mat4::from_translation(Vec3::X));
        geometry.snapshot_rest();
        assert_eq!(geometry.rest()[0], Vec3::ZERO);
    }

    #[test]
    fn test_deform_static_geometry_is_ignored() {
        let mut geometry = quad();
        let before = geometry.version();
        geometry.deform_from_rest(|p| p * 2.0);
        assert_eq!(geometry.positions()[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(geometry.version(), before);
    }

    #[test]
    fn test_center_moves_box_to_origin() {
        let mut geometry = quad();
        geometry.center();
        let aabb = geometry.compute_bounding_box().unwrap();
        assert!(aabb.center().length() < 1e-6);
    }

    #[test]
    fn test_dispose_twice_is_noop() {
        let mut geometry = quad();
        geometry.dispose();
        let version = geometry.version();
        geometry.dispose();
        assert!(geometry.is_disposed());
        assert_eq!(geometry.vertex_count(), 0);
        assert_eq!(geometry.version(), version);
    }
}
