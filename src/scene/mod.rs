//! Retained scene graph: groups of meshes, frame callbacks and disposal.

mod disposal;
mod update;

use glam::{EulerRot, Mat4, Quat, Vec3};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::geometry::Geometry;
use crate::math::{hex_to_rgb, AABB};

pub use disposal::{Disposable, DisposalList};
pub use update::{FrameCallback, UpdateList};

/// Geometry shared between the scene graph and the frame callback mutating it
pub type SharedGeometry = Rc<RefCell<Geometry>>;

pub fn share(geometry: Geometry) -> SharedGeometry {
    Rc::new(RefCell::new(geometry))
}

/// Which faces a material draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// sRGB base colour
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub side: Side,
    /// Ignore lighting, draw the flat colour
    pub unlit: bool,
}

impl Material {
    pub fn standard(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            roughness: 1.0,
            metalness: 0.0,
            side: Side::Front,
            unlit: false,
        }
    }

    pub fn line(hex: u32) -> Self {
        Self {
            unlit: true,
            side: Side::Double,
            ..Self::standard(hex)
        }
    }

    pub fn with_side(self, side: Side) -> Self {
        Self { side, ..self }
    }

    pub fn with_roughness(self, roughness: f32) -> Self {
        Self { roughness, ..self }
    }

    pub fn with_metalness(self, metalness: f32) -> Self {
        Self { metalness, ..self }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(0xb3b3b3)
    }
}

pub struct Mesh {
    pub name: String,
    pub geometry: SharedGeometry,
    pub material: Material,
    /// Relative to the owning group
    pub transform: Mat4,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: SharedGeometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(self, transform: Mat4) -> Self {
        Self { transform, ..self }
    }
}

/// Named set of meshes sharing one placement
pub struct Group {
    pub name: String,
    pub transform: Mat4,
    pub meshes: Vec<Mesh>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            meshes: Vec::new(),
        }
    }

    pub fn add(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// Absorb another group, baking its placement into its meshes
    pub fn add_group(&mut self, group: Group) {
        for mesh in group.meshes {
            let transform = group.transform * mesh.transform;
            self.meshes.push(mesh.with_transform(transform));
        }
    }

    /// Set placement from translation, XYZ Euler rotation and scale
    pub fn place(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.transform = compose(position, rotation, scale);
    }

    /// Rotate about the local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.transform *= Mat4::from_rotation_y(angle);
    }

    /// Move along a local axis
    pub fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.transform *= Mat4::from_translation(axis * distance);
    }

    /// World-space bounds of every mesh with computed bounds
    pub fn bounds(&self) -> Option<AABB> {
        self.meshes
            .iter()
            .filter_map(|mesh| {
                let geometry = mesh.geometry.borrow();
                let local = geometry.bounding_box().or_else(|| AABB::from_points(geometry.positions()))?;
                Some(local.transformed(&(self.transform * mesh.transform)))
            })
            .reduce(|a, b| a.union(&b))
    }
}

/// Translation · rotation(XYZ) · scale
pub fn compose(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Light shines from here toward the origin
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light
    pub fn direction(&self) -> Vec3 {
        let direction = self.position.normalize_or_zero();
        if direction == Vec3::ZERO {
            Vec3::Y
        } else {
            direction
        }
    }
}

/// Services an object needs while it is being built
pub struct SceneContext<'a> {
    pub update_list: &'a mut UpdateList,
    pub disposal: &'a mut DisposalList,
    /// Directory model files are resolved against
    pub assets_dir: PathBuf,
}

impl SceneContext<'_> {
    /// Share `geometry` and register it for disposal
    pub fn track(&mut self, geometry: Geometry) -> SharedGeometry {
        let shared = share(geometry);
        self.disposal.push(shared.clone());
        shared
    }
}

/// Everything drawn in one frame plus the callbacks animating it
pub struct Scene {
    pub groups: Vec<Group>,
    pub lights: Vec<DirectionalLight>,
    /// Ambient term standing in for image-based lighting
    pub ambient: f32,
    update_list: UpdateList,
    disposal: DisposalList,
}

impl Scene {
    pub fn new(update_list: UpdateList, disposal: DisposalList) -> Self {
        Self {
            groups: Vec::new(),
            lights: Vec::new(),
            ambient: 0.3,
            update_list,
            disposal,
        }
    }

    pub fn update(&mut self, timestamp_ms: f64) {
        self.update_list.run(timestamp_ms);
    }

    /// Every mesh with its world transform, in group order
    pub fn meshes(&self) -> impl Iterator<Item = (Mat4, &Mesh)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.meshes.iter().map(move |mesh| (group.transform * mesh.transform, mesh)))
    }

    pub fn mesh_count(&self) -> usize {
        self.groups.iter().map(|g| g.meshes.len()).sum()
    }

    pub fn update_count(&self) -> usize {
        self.update_list.len()
    }

    pub fn bounds(&self) -> Option<AABB> {
        self.groups
            .iter()
            .filter_map(Group::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposal.is_released()
    }
}

impl Disposable for Scene {
    fn dispose(&mut self) {
        if self.disposal.is_released() {
            return;
        }
        self.update_list.clear();
        self.disposal.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane_geometry;

    #[test]
    fn test_compose_orders_scale_rotation_translation() {
        let m = compose(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0), Vec3::splat(2.0));
        let p = m.transform_point3(Vec3::X);
        // scale to (2,0,0), rotate about Y to (0,0,-2), translate
        assert!((p - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_add_group_bakes_transform() {
        let mut inner = Group::new("inner");
        inner.transform = Mat4::from_translation(Vec3::Y);
        inner.add(Mesh::new("m", share(plane_geometry(1.0, 1.0, 1, 1)), Material::default()));

        let mut outer = Group::new("outer");
        outer.add_group(inner);
        assert_eq!(outer.meshes[0].transform, Mat4::from_translation(Vec3::Y));
    }

    #[test]
    fn test_rotate_then_translate_moves_along_rotated_axis() {
        let mut group = Group::new("g");
        group.rotate_y(std::f32::consts::FRAC_PI_2);
        group.translate_on_axis(Vec3::Z, 3.0);
        let origin = group.transform.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_scene_dispose_releases_tracked_geometry() {
        let mut updates = UpdateList::new();
        let mut disposal = DisposalList::new();
        let geometry = {
            let mut ctx = SceneContext {
                update_list: &mut updates,
                disposal: &mut disposal,
                assets_dir: PathBuf::from("."),
            };
            ctx.track(plane_geometry(1.0, 1.0, 1, 1))
        };

        let mut scene = Scene::new(updates, disposal);
        scene.dispose();
        scene.dispose();
        assert!(geometry.borrow().is_disposed());
        assert!(scene.is_disposed());
    }
}
