use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info};
use std::path::Path;

use crate::geometry::{Geometry, Topology};
use crate::math::linear_to_srgb;
use crate::scene::Material;

/// One glTF primitive with node transforms baked into its vertices
pub struct ModelPart {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
}

/// Loads every triangle primitive of a glTF or GLB file
pub fn load_model(path: impl AsRef<Path>) -> Result<Vec<ModelPart>> {
    let path = path.as_ref();
    debug!("Loading model: {:?}", path);

    let (document, buffers, _images) =
        ::gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    let mut parts = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut parts)?;
        }
    }

    info!(
        "Loaded {:?}: {} parts, {} vertices",
        path.file_name().unwrap_or_default(),
        parts.len(),
        parts.iter().map(|p| p.geometry.vertex_count()).sum::<usize>()
    );
    Ok(parts)
}

/// Recursively walks nodes, accumulating their transforms
fn process_node(
    node: &::gltf::Node,
    buffers: &[::gltf::buffer::Data],
    parent_transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, parts)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, parts)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &::gltf::Mesh,
    buffers: &[::gltf::buffer::Data],
    transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let name = mesh.name().unwrap_or("mesh").to_string();

    for primitive in mesh.primitives() {
        if primitive.mode() != ::gltf::mesh::Mode::Triangles {
            debug!("  Skipping non-triangle primitive in {}", name);
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(Vec3::from_array)
            .collect();
        let normals: Vec<Vec3> = reader
            .read_normals()
            .map(|normals| normals.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());

        let has_normals = normals.len() == positions.len();
        let mut geometry = Geometry::new(positions, normals, indices, Topology::TriangleList);
        if !has_normals {
            geometry.compute_vertex_normals();
        }
        geometry.apply_transform(transform);
        geometry.compute_bounding_box();
        geometry.compute_bounding_sphere();

        debug!("  {}: {} vertices", name, geometry.vertex_count());
        parts.push(ModelPart {
            name: name.clone(),
            geometry,
            material: material_of(&primitive.material()),
        });
    }

    Ok(())
}

/// Base colour factor only, textures are not sampled
fn material_of(material: &::gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _a] = pbr.base_color_factor();

    Material {
        color: linear_to_srgb([r, g, b]),
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
        ..Material::default()
    }
    .with_side(if material.double_sided() {
        crate::scene::Side::Double
    } else {
        crate::scene::Side::Front
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_model("does/not/exist.glb");
        assert!(result.is_err());
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("Failed to load glTF file"));
    }
}
