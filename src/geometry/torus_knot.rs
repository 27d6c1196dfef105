use glam::Vec3;
use std::f32::consts::TAU;

use super::{Geometry, Topology};

/// Point on the (p, q) torus knot curve at parameter `u`
fn knot_point(u: f32, p: u32, q: u32, radius: f32) -> Vec3 {
    let (su, cu) = u.sin_cos();
    let qu_over_p = q as f32 / p as f32 * u;
    let cs = qu_over_p.cos();

    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Tube of radius `tube` swept along a (p, q) torus knot
pub fn torus_knot_geometry(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let p = p.max(1);

    let vertex_count = ((tubular + 1) * (radial + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p as f32 * TAU;

        // Frenet-like frame from a forward difference along the curve
        let p1 = knot_point(u, p, q, radius);
        let p2 = knot_point(u + 0.01, p, q, radius);
        let tangent = p2 - p1;
        let n = p2 + p1;
        let binormal = tangent.cross(n);
        let normal = binormal.cross(tangent).normalize_or_zero();
        let binormal = binormal.normalize_or_zero();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let vertex = p1 + normal * cx + binormal * cy;
            positions.push(vertex);
            normals.push((vertex - p1).normalize_or_zero());
        }
    }

    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = (radial + 1) * (j - 1) + (i - 1);
            let b = (radial + 1) * j + (i - 1);
            let c = (radial + 1) * j + i;
            let d = (radial + 1) * (j - 1) + i;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Geometry::new(positions, normals, Some(indices), Topology::TriangleList)
}
