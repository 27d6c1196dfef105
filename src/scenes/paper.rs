use glam::{Mat4, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::fold::{FoldConfig, FoldShape};
use crate::geometry::{edges_geometry, plane_geometry, Geometry, DEFAULT_THRESHOLD_ANGLE};
use crate::scene::{Group, Material, Mesh, SceneContext, SharedGeometry, Side};

/// How the two faces of the sheet are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperLayout {
    /// Two meshes over one geometry, front-culled and back-culled, coloured apart
    DualMesh,
    /// One mesh with culling disabled
    DoubleSided,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub layout: PaperLayout,
    pub outline: bool,
    pub position: [f32; 3],
    pub rotation_y: f32,
    pub top_color: u32,
    pub bottom_color: u32,
    pub bottom_roughness: f32,
    pub outline_color: u32,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            width: 11.0,
            height: 8.0,
            width_segments: 220,
            height_segments: 160,
            layout: PaperLayout::DualMesh,
            outline: true,
            position: [0.7, -0.05, 0.3],
            rotation_y: -0.02,
            top_color: 0xeeeeee,
            bottom_color: 0x3b186f,
            bottom_roughness: 0.8,
            outline_color: 0x444444,
        }
    }
}

/// The animated sheet: surface meshes, optional outline and their frame callback
pub struct Paper {
    group: Group,
    surface: SharedGeometry,
    outline: Option<SharedGeometry>,
}

impl Paper {
    pub fn new(ctx: &mut SceneContext<'_>, config: &PaperConfig, fold: FoldConfig) -> Self {
        let mut plane = plane_geometry(
            config.width,
            config.height,
            config.width_segments,
            config.height_segments,
        );
        plane.rotate_x(-FRAC_PI_2);
        plane.center();
        plane.snapshot_rest();

        let outline = config.outline.then(|| {
            let mut edges = edges_geometry(&plane, DEFAULT_THRESHOLD_ANGLE);
            edges.snapshot_rest();
            edges
        });

        let surface = ctx.track(plane);
        let outline = outline.map(|edges| ctx.track(edges));

        let mut group = Group::new("paper");
        group.transform = Mat4::from_translation(Vec3::from_array(config.position));
        group.rotate_y(config.rotation_y);

        let top = Material::standard(config.top_color);
        match config.layout {
            PaperLayout::DualMesh => {
                let bottom = Material::standard(config.bottom_color)
                    .with_roughness(config.bottom_roughness)
                    .with_side(Side::Back);
                group.add(Mesh::new("paper-top", surface.clone(), top));
                group.add(Mesh::new("paper-bottom", surface.clone(), bottom));
            }
            PaperLayout::DoubleSided => {
                group.add(Mesh::new("paper", surface.clone(), top.with_side(Side::Double)));
            }
        }
        if let Some(outline) = &outline {
            group.add(Mesh::new("paper-outline", outline.clone(), Material::line(config.outline_color)));
        }

        {
            let surface = surface.clone();
            let outline = outline.clone();
            ctx.update_list.register(move |timestamp_ms| {
                let shape = FoldShape::at(timestamp_ms, &fold);
                apply_shape(&shape, &mut surface.borrow_mut());
                if let Some(outline) = &outline {
                    apply_shape(&shape, &mut outline.borrow_mut());
                }
            });
        }

        debug!(
            "Paper {}x{} with {} vertices, outline {}",
            config.width_segments,
            config.height_segments,
            surface.borrow().vertex_count(),
            outline.as_ref().map_or(0, |o| o.borrow().vertex_count())
        );

        Self {
            group,
            surface,
            outline,
        }
    }

    pub fn surface(&self) -> &SharedGeometry {
        &self.surface
    }

    pub fn outline(&self) -> Option<&SharedGeometry> {
        self.outline.as_ref()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn into_group(self) -> Group {
        self.group
    }
}

/// Deform `geometry` from its rest pose and refresh normals and bounds
pub fn apply_shape(shape: &FoldShape, geometry: &mut Geometry) {
    geometry.deform_from_rest(|rest| shape.displace(rest));
    geometry.compute_vertex_normals();
    geometry.compute_bounding_box();
    geometry.compute_bounding_sphere();
}
