use glam::Vec3;
use log::warn;

use crate::geometry::torus_knot_geometry;
use crate::loaders::load_model;
use crate::scene::{compose, Group, Material, Mesh, SceneContext};

/// Import `file` from the assets directory into a group of static meshes
///
/// A model that fails to load leaves the group empty and the scene running.
fn import_model(ctx: &mut SceneContext<'_>, name: &str, file: &str) -> Group {
    let mut group = Group::new(name);
    let path = ctx.assets_dir.join(file);

    match load_model(&path) {
        Ok(parts) => {
            for part in parts {
                let geometry = ctx.track(part.geometry);
                group.add(Mesh::new(part.name, geometry, part.material));
            }
        }
        Err(e) => warn!("Skipping {}: {:#}", name, e),
    }
    group
}

pub fn table(ctx: &mut SceneContext<'_>) -> Group {
    place_table(import_model(ctx, "table-model", "table.glb"))
}

/// Model scaled then lowered, inside a group turned and pushed along its own Z
fn place_table(mut model: Group) -> Group {
    model.transform = compose(Vec3::new(0.0, -22.0, 0.0), Vec3::ZERO, Vec3::splat(40.0));

    let mut table = Group::new("table");
    table.add_group(model);
    table.rotate_y(1.28);
    table.translate_on_axis(Vec3::Z, 3.0);
    table
}

pub fn plant(ctx: &mut SceneContext<'_>) -> Group {
    let mut plant = import_model(ctx, "plant", "plant.glb");
    plant.place(Vec3::new(10.0, -0.25, -5.0), Vec3::ZERO, Vec3::splat(18.0));
    plant
}

pub fn lychee(ctx: &mut SceneContext<'_>) -> Group {
    let mut lychee = import_model(ctx, "lychee", "lychee.glb");
    lychee.place(
        Vec3::new(8.5, -0.05, -2.95),
        Vec3::new(-6.64, 0.0, -0.14),
        Vec3::splat(45.0),
    );
    lychee
}

pub fn bust(ctx: &mut SceneContext<'_>) -> Group {
    let mut bust = import_model(ctx, "bust", "bust.glb");
    bust.place(
        Vec3::new(7.23, -0.05, 5.93),
        Vec3::new(0.0, -1.87, 0.0),
        Vec3::splat(8.0),
    );
    bust
}

pub fn torus_knot(ctx: &mut SceneContext<'_>) -> Group {
    let mut knot = torus_knot_geometry(1.7, 0.6, 150, 20, 2, 3);
    knot.compute_bounding_box();
    knot.compute_bounding_sphere();
    let geometry = ctx.track(knot);

    let mut group = Group::new("torus-knot");
    group.add(Mesh::new("torus-knot", geometry, Material::standard(0x862a16).with_metalness(1.0)));
    group.place(Vec3::new(6.0, 1.4, 9.6), Vec3::new(-4.75, 0.0, 0.0), Vec3::ONE);
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane_geometry;
    use crate::scene::{share, DisposalList, UpdateList};
    use std::path::PathBuf;

    #[test]
    fn test_missing_models_leave_empty_groups() {
        let mut updates = UpdateList::new();
        let mut disposal = DisposalList::new();
        let mut ctx = SceneContext {
            update_list: &mut updates,
            disposal: &mut disposal,
            assets_dir: PathBuf::from("no-such-assets-dir"),
        };

        assert!(table(&mut ctx).meshes.is_empty());
        assert!(plant(&mut ctx).meshes.is_empty());
        assert!(lychee(&mut ctx).meshes.is_empty());
        assert!(bust(&mut ctx).meshes.is_empty());
        assert!(disposal.is_empty());
    }

    #[test]
    fn test_torus_knot_placement() {
        let mut updates = UpdateList::new();
        let mut disposal = DisposalList::new();
        let mut ctx = SceneContext {
            update_list: &mut updates,
            disposal: &mut disposal,
            assets_dir: PathBuf::from("."),
        };

        let knot = torus_knot(&mut ctx);
        let origin = knot.transform.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(6.0, 1.4, 9.6)).length() < 1e-5);
        assert_eq!(knot.meshes[0].material.metalness, 1.0);
        assert_eq!(disposal.len(), 1);
    }

    #[test]
    fn test_table_translation_is_not_scaled() {
        let mut model = Group::new("model");
        model.add(Mesh::new("top", share(plane_geometry(1.0, 1.0, 1, 1)), Material::default()));
        let table = place_table(model);

        let mesh = &table.meshes[0];
        let origin = (table.transform * mesh.transform).transform_point3(Vec3::ZERO);
        let (sin, cos) = 1.28f32.sin_cos();
        let expected = Vec3::new(3.0 * sin, -22.0, 3.0 * cos);
        assert!((origin - expected).length() < 1e-4);
    }
}
