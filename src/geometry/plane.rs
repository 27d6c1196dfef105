use glam::Vec3;

use super::{Geometry, Topology};

/// Rectangle in the XY plane facing +Z, `width_segments` × `height_segments` quads
///
/// Rows run from +Y down to -Y, columns from -X to +X. Each quad is split
/// into two counter-clockwise triangles.
pub fn plane_geometry(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let grid_x = width_segments.max(1);
    let grid_y = height_segments.max(1);
    let grid_x1 = grid_x + 1;
    let grid_y1 = grid_y + 1;

    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let width_half = width / 2.0;
    let height_half = height / 2.0;

    let vertex_count = (grid_x1 * grid_y1) as usize;
    let mut positions = Vec::with_capacity(vertex_count);

    for iy in 0..grid_y1 {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..grid_x1 {
            let x = ix as f32 * segment_width - width_half;
            positions.push(Vec3::new(x, -y, 0.0));
        }
    }

    let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + grid_x1 * iy;
            let b = ix + grid_x1 * (iy + 1);
            let c = (ix + 1) + grid_x1 * (iy + 1);
            let d = (ix + 1) + grid_x1 * iy;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let normals = vec![Vec3::Z; vertex_count];
    Geometry::new(positions, normals, Some(indices), Topology::TriangleList)
}
