use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use paper_fold::geometry::{edges_geometry, plane_geometry, Topology, DEFAULT_THRESHOLD_ANGLE};
use paper_fold::math::AABB;
use paper_fold::scenes::apply_shape;
use paper_fold::{FoldConfig, FoldPose, FoldShape};

#[test]
fn test_plane_counts_and_extent() {
    let plane = plane_geometry(11.0, 8.0, 220, 160);
    assert_eq!(plane.vertex_count(), 221 * 161);
    assert_eq!(plane.indices().unwrap().len(), 220 * 160 * 6);

    let aabb = AABB::from_points(plane.positions()).unwrap();
    assert!((aabb.size() - Vec3::new(11.0, 8.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_plane_rotated_flat_faces_up() {
    let mut plane = plane_geometry(11.0, 8.0, 11, 8);
    plane.rotate_x(-FRAC_PI_2);
    plane.center();

    for n in plane.normals() {
        assert!((*n - Vec3::Y).length() < 1e-5);
    }

    // Recomputing from the faces agrees with the transformed normals
    plane.compute_vertex_normals();
    for n in plane.normals() {
        assert!((*n - Vec3::Y).length() < 1e-5);
    }
}

#[test]
fn test_outline_of_plane_is_its_boundary_and_follows_deformation() {
    let mut plane = plane_geometry(11.0, 8.0, 22, 16);
    plane.rotate_x(-FRAC_PI_2);
    plane.center();
    plane.snapshot_rest();

    let mut outline = edges_geometry(&plane, DEFAULT_THRESHOLD_ANGLE);
    outline.snapshot_rest();
    assert_eq!(outline.topology(), Topology::LineList);
    assert_eq!(outline.vertex_count(), 2 * 2 * (22 + 16));

    let shape = FoldShape::from_pose(FoldPose::new(-2.0, 0.0), &FoldConfig::default());
    apply_shape(&shape, &mut plane);
    apply_shape(&shape, &mut outline);

    // Every outline vertex sits where the same rest vertex of the sheet went
    for (live, rest) in outline.positions().iter().zip(outline.rest()) {
        assert_eq!(*live, shape.displace(*rest));
    }
    let top = plane.bounding_box().unwrap().max.y;
    let outline_top = outline.bounding_box().unwrap().max.y;
    assert!((top - outline_top).abs() < 1e-4);
}

#[test]
fn test_deformation_never_drifts_from_rest() {
    let mut plane = plane_geometry(11.0, 8.0, 22, 16);
    plane.rotate_x(-FRAC_PI_2);
    plane.snapshot_rest();
    let config = FoldConfig::default();

    let first = FoldShape::at(1234.0, &config);
    apply_shape(&first, &mut plane);
    let once: Vec<Vec3> = plane.positions().to_vec();

    for step in 0..50 {
        apply_shape(&FoldShape::at(step as f64 * 97.0, &config), &mut plane);
    }
    apply_shape(&first, &mut plane);
    assert_eq!(plane.positions(), &once[..]);
}

#[test]
fn test_bounds_track_deformed_positions() {
    let mut plane = plane_geometry(11.0, 8.0, 22, 16);
    plane.rotate_x(-FRAC_PI_2);
    plane.snapshot_rest();

    let shape = FoldShape::from_pose(FoldPose::new(3.3, 0.0), &FoldConfig::default());
    apply_shape(&shape, &mut plane);

    let aabb = plane.bounding_box().unwrap();
    let sphere = plane.bounding_sphere().unwrap();
    assert!(aabb.max.y > 1.0);
    for p in plane.positions() {
        assert!(sphere.contains(*p));
    }
}

#[test]
fn test_apply_transform_moves_bounds() {
    let mut plane = plane_geometry(2.0, 2.0, 1, 1);
    plane.apply_transform(&Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));
    let aabb = plane.compute_bounding_box().unwrap();
    assert!((aabb.center() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
}
