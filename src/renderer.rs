use anyhow::{Context, Result};
use std::sync::Arc;
use winit::window::Window;

use crate::camera::Camera;
use crate::core::{GpuContext, GpuMesh, MeshCache, ModelBinding};
use crate::geometry::Topology;
use crate::scene::{DirectionalLight, Disposable, Scene, Side};
use crate::scenes::overhead_light;
use crate::types::{CameraUniform, ModelUniform, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.075,
    b: 0.07,
    a: 1.0,
};

/// One pipeline per cull mode plus the outline pipeline
struct Pipelines {
    front: wgpu::RenderPipeline,
    back: wgpu::RenderPipeline,
    double: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

impl Pipelines {
    fn select(&self, topology: Topology, side: Side) -> &wgpu::RenderPipeline {
        match (topology, side) {
            (Topology::LineList, _) => &self.lines,
            (Topology::TriangleList, Side::Front) => &self.front,
            (Topology::TriangleList, Side::Back) => &self.back,
            (Topology::TriangleList, Side::Double) => &self.double,
        }
    }
}

/// egui state for the FPS overlay
struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

pub struct Renderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    pipelines: Pipelines,
    /// Meshes over one geometry upload once
    meshes: MeshCache<GpuMesh>,
    bindings: Vec<ModelBinding>,
    overlay: Option<Overlay>,
    disposed: bool,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, show_ui: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let device = gpu.device();

        let surface_config = Self::create_surface_config(&surface, gpu.adapter(), size)?;
        surface.configure(device, &surface_config);

        let depth_view = Self::create_depth_texture(device, &surface_config);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = Self::uniform_layout(device, "camera_bind_group_layout");
        let model_layout = Self::uniform_layout(device, "model_bind_group_layout");

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipelines = Self::create_pipelines(device, &camera_layout, &model_layout, surface_config.format);

        let overlay = show_ui.then(|| {
            let ctx = egui::Context::default();
            let state = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let renderer = egui_wgpu::Renderer::new(
                device,
                surface_config.format,
                egui_wgpu::RendererOptions::default(),
            );
            Overlay { ctx, state, renderer }
        });

        log::info!(
            "Renderer initialized: {}x{} {:?}",
            size.width,
            size.height,
            surface_config.format
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            size,
            depth_view,
            camera_buffer,
            camera_bind_group,
            model_layout,
            pipelines,
            meshes: MeshCache::new(),
            bindings: Vec::new(),
            overlay,
            disposed: false,
        })
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let fallback = *surface_caps
            .formats
            .first()
            .context("Surface reports no supported formats")?;
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(fallback);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some(label),
        })
    }

    fn create_pipelines(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        model_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Pipelines {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[camera_layout, model_layout],
            push_constant_ranges: &[],
        });

        let create = |label: &str, topology: wgpu::PrimitiveTopology, cull_mode: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        Pipelines {
            front: create("Front Pipeline", wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
            back: create("Back Pipeline", wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Front)),
            double: create("Double Pipeline", wgpu::PrimitiveTopology::TriangleList, None),
            lines: create("Line Pipeline", wgpu::PrimitiveTopology::LineList, None),
        }
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_texture(self.gpu.device(), &self.surface_config);
    }

    /// Upload changed geometry and per-draw uniforms
    fn sync_scene(&mut self, scene: &Scene) {
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        let pruned = self.meshes.prune();
        if pruned > 0 {
            log::debug!("Released {} GPU meshes", pruned);
        }

        for (index, (world, mesh)) in scene.meshes().enumerate() {
            let geometry = mesh.geometry.borrow();

            self.meshes
                .get_or_insert_with(&mesh.geometry, || GpuMesh::new(device, &geometry))
                .sync(device, queue, &geometry);

            if index >= self.bindings.len() {
                self.bindings.push(ModelBinding::new(device, &self.model_layout));
            }
            self.bindings[index].write(queue, &ModelUniform::new(world, &mesh.material));
        }
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        window: &Window,
        fps: f32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        if self.disposed {
            return Ok(());
        }
        self.sync_scene(scene);

        let light = scene.lights.first().copied().unwrap_or_else(|| overhead_light(0.0));
        self.write_camera(camera, &light, scene.ambient);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (index, (_, mesh)) in scene.meshes().enumerate() {
                let (Some(gpu_mesh), Some(binding)) = (self.meshes.get(&mesh.geometry), self.bindings.get(index)) else {
                    continue;
                };
                if gpu_mesh.is_empty() || binding.is_destroyed() {
                    continue;
                }
                render_pass.set_pipeline(self.pipelines.select(gpu_mesh.topology(), mesh.material.side));
                render_pass.set_bind_group(1, binding.bind_group(), &[]);
                gpu_mesh.draw(&mut render_pass);
            }
        }

        if self.overlay.is_some() {
            self.render_overlay(&mut encoder, &view, window, scene, fps);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn write_camera(&self, camera: &Camera, light: &DirectionalLight, ambient: f32) {
        let camera_uniform = camera.to_uniform(self.aspect(), light, ambient);
        self.gpu.queue().write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );
    }

    fn render_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        scene: &Scene,
        fps: f32,
    ) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let mesh_count = scene.mesh_count();
        let buffer_count = self.meshes.len();
        let resolution = (self.size.width, self.size.height);

        let raw_input = overlay.state.take_egui_input(window);
        let full_output = overlay.ctx.run(raw_input, |ctx| {
            egui::Window::new("FPS")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", fps))
                            .size(24.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );

                    let frame_time_ms = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
                    ui.label(
                        egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                            .size(14.0)
                            .color(egui::Color32::GRAY),
                    );
                    ui.monospace(format!("Meshes: {} ({} buffers)", mesh_count, buffer_count));
                    ui.monospace(format!("Resolution: {}x{}", resolution.0, resolution.1));
                });
        });

        overlay
            .state
            .handle_platform_output(window, full_output.platform_output);

        let tris = overlay
            .ctx
            .tessellate(full_output.shapes, overlay.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            overlay.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        overlay
            .renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            overlay
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            overlay.renderer.free_texture(id);
        }
    }

    /// Returns true when the overlay consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match self.overlay.as_mut() {
            Some(overlay) => overlay.state.on_window_event(window, event).consumed,
            None => false,
        }
    }

}

impl Disposable for Renderer {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.meshes.dispose();
        for binding in &mut self.bindings {
            binding.dispose();
        }
        self.bindings.clear();
        self.camera_buffer.destroy();
        self.disposed = true;
        log::debug!("Renderer resources released");
    }
}
