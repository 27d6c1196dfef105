use log::debug;
use wgpu::util::DeviceExt;

use crate::geometry::{Geometry, Topology};
use crate::scene::Disposable;
use crate::types::{ModelUniform, Vertex};

/// Interleave positions and normals for upload
pub fn vertices_of(geometry: &Geometry) -> Vec<Vertex> {
    geometry
        .positions()
        .iter()
        .zip(geometry.normals())
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// Vertex and index buffers mirroring one [`Geometry`]
///
/// Re-uploaded whenever the geometry version moves. Buffers are destroyed
/// exactly once, on dispose.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    vertex_count: u32,
    index_count: u32,
    topology: Topology,
    uploaded_version: u64,
    destroyed: bool,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = vertices_of(geometry);
        let vertex_buffer = Self::create_vertex_buffer(device, &vertices);

        let index_buffer = geometry.indices().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        Self {
            vertex_buffer,
            index_buffer,
            vertex_capacity: vertices.len(),
            vertex_count: vertices.len() as u32,
            index_count: geometry.indices().map_or(0, |i| i.len() as u32),
            topology: geometry.topology(),
            uploaded_version: geometry.version(),
            destroyed: false,
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, vertices: &[Vertex]) -> wgpu::Buffer {
        let placeholder = [Vertex {
            position: [0.0; 3],
            normal: [0.0; 3],
        }];
        let contents = if vertices.is_empty() { &placeholder[..] } else { vertices };

        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Upload positions and normals if the geometry changed since last time
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, geometry: &Geometry) -> bool {
        if self.destroyed || geometry.version() == self.uploaded_version {
            return false;
        }

        let vertices = vertices_of(geometry);
        if vertices.len() > self.vertex_capacity {
            debug!("Growing vertex buffer to {} vertices", vertices.len());
            self.vertex_buffer.destroy();
            self.vertex_buffer = Self::create_vertex_buffer(device, &vertices);
            self.vertex_capacity = vertices.len();
        } else if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        self.vertex_count = vertices.len() as u32;
        if geometry.indices().is_none() {
            self.index_count = 0;
        }
        self.uploaded_version = geometry.version();
        true
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed || self.vertex_count == 0
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) if self.index_count > 0 => {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            _ => pass.draw(0..self.vertex_count, 0..1),
        }
    }
}

impl Disposable for GpuMesh {
    fn dispose(&mut self) {
        if self.destroyed {
            return;
        }
        self.vertex_buffer.destroy();
        if let Some(indices) = &self.index_buffer {
            indices.destroy();
        }
        self.destroyed = true;
    }
}

/// Uniform buffer and bind group for one draw
pub struct ModelBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    destroyed: bool,
}

impl ModelBinding {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Buffer"),
            size: std::mem::size_of::<ModelUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("model_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            destroyed: false,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniform: &ModelUniform) {
        if self.destroyed {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl ModelBinding {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Disposable for ModelBinding {
    fn dispose(&mut self) {
        if self.destroyed {
            return;
        }
        self.buffer.destroy();
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane_geometry;

    #[test]
    fn test_vertices_interleave_positions_and_normals() {
        let plane = plane_geometry(2.0, 2.0, 1, 1);
        let vertices = vertices_of(&plane);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [-1.0, 1.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_disposed_geometry_has_no_vertices() {
        let mut plane = plane_geometry(2.0, 2.0, 1, 1);
        plane.dispose();
        assert!(vertices_of(&plane).is_empty());
    }

    /// Headless device, or `None` on machines without an adapter
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default())).ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
    }

    #[test]
    fn test_gpu_resources_dispose_once() {
        let Some((device, queue)) = headless_device() else {
            return;
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let mut binding = ModelBinding::new(&device, &layout);
        binding.dispose();
        binding.dispose();
        assert!(binding.is_destroyed());
        // Writes after disposal are dropped
        binding.write(&queue, &ModelUniform::new(glam::Mat4::IDENTITY, &crate::scene::Material::default()));

        let plane = plane_geometry(2.0, 2.0, 1, 1);
        let mut mesh = GpuMesh::new(&device, &plane);
        mesh.dispose();
        mesh.dispose();
        assert!(mesh.is_empty());
    }
}
