use glam::Vec3;
use std::collections::HashMap;

use super::{Geometry, Topology};

/// Degrees between face normals above which a shared edge is kept
pub const DEFAULT_THRESHOLD_ANGLE: f32 = 1.0;

/// Positions closer than this are treated as the same vertex
const PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

struct HalfEdge {
    index0: usize,
    index1: usize,
    normal: Vec3,
}

fn vertex_key(p: Vec3) -> VertexKey {
    [
        (p.x * PRECISION).round() as i64,
        (p.y * PRECISION).round() as i64,
        (p.z * PRECISION).round() as i64,
    ]
}

/// Line segments along the boundary and hard edges of a triangle mesh
///
/// An edge shared by two faces is kept when their normals differ by more than
/// `threshold_angle` degrees; an edge with a single face is always kept.
/// The result reads vertex positions from `geometry.rest()`.
pub fn edges_geometry(geometry: &Geometry, threshold_angle: f32) -> Geometry {
    let threshold_dot = threshold_angle.to_radians().cos();
    let positions = geometry.rest();

    let triangle_count = match geometry.indices() {
        Some(indices) => indices.len() / 3,
        None => positions.len() / 3,
    };
    let corner = |tri: usize, j: usize| -> usize {
        match geometry.indices() {
            Some(indices) => indices[3 * tri + j] as usize,
            None => 3 * tri + j,
        }
    };

    // Insertion-ordered so the output is stable between runs
    let mut edges: Vec<Option<HalfEdge>> = Vec::new();
    let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();
    let mut segments = Vec::new();

    if geometry.topology() == Topology::TriangleList {
        for tri in 0..triangle_count {
            let idx = [corner(tri, 0), corner(tri, 1), corner(tri, 2)];
            let verts = idx.map(|i| positions[i]);
            let keys = verts.map(vertex_key);

            if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
                continue;
            }

            let normal = (verts[2] - verts[1]).cross(verts[0] - verts[1]).normalize_or_zero();

            for j in 0..3 {
                let next = (j + 1) % 3;
                let forward = (keys[j], keys[next]);
                let reverse = (keys[next], keys[j]);

                match lookup.get(&reverse).copied() {
                    Some(slot) if edges[slot].is_some() => {
                        if let Some(other) = edges[slot].take() {
                            if normal.dot(other.normal) <= threshold_dot {
                                segments.push(verts[j]);
                                segments.push(verts[next]);
                            }
                        }
                    }
                    _ => {
                        if !lookup.contains_key(&forward) {
                            lookup.insert(forward, edges.len());
                            edges.push(Some(HalfEdge {
                                index0: idx[j],
                                index1: idx[next],
                                normal,
                            }));
                        }
                    }
                }
            }
        }
    }

    for edge in edges.into_iter().flatten() {
        segments.push(positions[edge.index0]);
        segments.push(positions[edge.index1]);
    }

    Geometry::lines(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane_geometry;

    #[test]
    fn test_flat_plane_keeps_only_boundary() {
        let plane = plane_geometry(11.0, 8.0, 22, 16);
        let edges = edges_geometry(&plane, DEFAULT_THRESHOLD_ANGLE);
        let boundary_segments = 2 * (22 + 16);
        assert_eq!(edges.vertex_count(), 2 * boundary_segments);
        assert_eq!(edges.topology(), Topology::LineList);

        for p in edges.positions() {
            let on_x = (p.x.abs() - 5.5).abs() < 1e-4;
            let on_y = (p.y.abs() - 4.0).abs() < 1e-4;
            assert!(on_x || on_y, "{:?} is not on the boundary", p);
        }
    }

    #[test]
    fn test_hard_edge_is_kept() {
        // Two faces meeting at a right angle along the x axis
        let geometry = Geometry::triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![0, 1, 2, 1, 0, 3],
        );
        let edges = edges_geometry(&geometry, DEFAULT_THRESHOLD_ANGLE);
        // Five distinct edges, shared one included
        assert_eq!(edges.vertex_count(), 10);
    }

    #[test]
    fn test_degenerate_triangles_skipped() {
        let geometry = Geometry::triangles(
            vec![Vec3::ZERO, Vec3::ZERO, Vec3::X],
            vec![0, 1, 2],
        );
        let edges = edges_geometry(&geometry, DEFAULT_THRESHOLD_ANGLE);
        assert_eq!(edges.vertex_count(), 0);
    }
}
