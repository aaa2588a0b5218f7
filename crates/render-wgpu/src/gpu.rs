use crate::shaders;
use crate::tessellate::{FrameGeometry, GpuVertex, PipelineKind};
use cubescape_common::{ColoredBatch, Rgb};
use cubescape_render::{Camera, DrawBackend, DrawStyle, RenderError, TransformStack};
use glam::Mat4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_VERTEX_CAPACITY: u64 = 64 * 1024;

struct Pipelines {
    points: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    offset_triangles: wgpu::RenderPipeline,
}

impl Pipelines {
    fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Points => &self.points,
            PipelineKind::Lines => &self.lines,
            PipelineKind::Triangles => &self.triangles,
            PipelineKind::OffsetTriangles => &self.offset_triangles,
        }
    }
}

struct OpenFrame {
    clear: Rgb,
    clip_from_world: Mat4,
}

/// Immediate-mode draw backend on top of a wgpu surface.
///
/// Draws are collected on the CPU during a frame and submitted in a single
/// render pass by `end_frame`. Line width and point size are not supported
/// by WebGPU and are ignored.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    depth_texture: wgpu::TextureView,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    geometry: FrameGeometry,
    transforms: TransformStack,
    frame: Option<OpenFrame>,
    status: String,
    status_dirty: bool,
    adapter_name: String,
}

impl WgpuBackend {
    /// Create a backend drawing into `target` (usually an `Arc<Window>`).
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RenderError::Device("no compatible graphics adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubescape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        // The frame pacer owns the rate cap, so presentation must not block on vsync.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let adapter_name = adapter.get_info().name;
        tracing::info!(
            adapter = %adapter_name,
            backend = adapter.get_info().backend.to_str(),
            ?surface_format,
            "GPU initialized"
        );

        let pipelines = create_pipelines(&device, surface_format);
        let depth_texture = create_depth_texture(&device, config.width, config.height);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            depth_texture,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            geometry: FrameGeometry::default(),
            transforms: TransformStack::new(),
            frame: None,
            status: String::new(),
            status_dirty: false,
            adapter_name,
        })
    }

    /// Reconfigure the surface and depth buffer after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, self.config.width, self.config.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// The status line, if it changed since the last call.
    pub fn take_status(&mut self) -> Option<&str> {
        if std::mem::take(&mut self.status_dirty) {
            Some(&self.status)
        } else {
            None
        }
    }

    fn open_frame(&self) -> Result<&OpenFrame, RenderError> {
        self.frame.as_ref().ok_or(RenderError::NotInFrame)
    }

    fn upload(&mut self) {
        let bytes = std::mem::size_of_val(self.geometry.vertices()) as u64;
        if bytes > self.vertex_capacity {
            self.vertex_capacity = bytes.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            tracing::debug!(capacity = self.vertex_capacity, "vertex buffer grown");
        }
        self.queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(self.geometry.vertices()),
        );
    }
}

impl DrawBackend for WgpuBackend {
    fn begin_frame(&mut self, clear: Rgb) -> Result<(), RenderError> {
        if self.frame.is_some() {
            return Err(RenderError::FrameAlreadyOpen);
        }
        self.geometry.clear();
        self.transforms.reset();
        self.frame = Some(OpenFrame {
            clear,
            clip_from_world: Mat4::IDENTITY,
        });
        Ok(())
    }

    fn set_camera(&mut self, camera: &Camera) -> Result<(), RenderError> {
        let frame = self.frame.as_mut().ok_or(RenderError::NotInFrame)?;
        frame.clip_from_world = camera.view_projection();
        Ok(())
    }

    fn push_transform(&mut self, transform: Mat4) -> Result<(), RenderError> {
        self.open_frame()?;
        self.transforms.push(transform)
    }

    fn pop_transform(&mut self) -> Result<(), RenderError> {
        self.open_frame()?;
        self.transforms.pop()
    }

    fn draw(&mut self, batch: &ColoredBatch, style: DrawStyle) -> Result<(), RenderError> {
        let clip_from_model = self.open_frame()?.clip_from_world * self.transforms.current();
        self.geometry.push_batch(batch, style, clip_from_model);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let frame = self.frame.take().ok_or(RenderError::NotInFrame)?;

        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout, frame skipped");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if !self.geometry.is_empty() {
            self.upload();
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let [r, g, b] = frame.clear.to_array();
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for run in self.geometry.runs() {
                pass.set_pipeline(self.pipelines.get(run.pipeline));
                pass.draw(run.vertices.clone(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        tracing::trace!(
            vertices = self.geometry.vertices().len(),
            runs = self.geometry.runs().len(),
            "frame presented"
        );
        Ok(())
    }

    fn set_status(&mut self, status: &str) -> Result<(), RenderError> {
        if self.status != status {
            self.status.clear();
            self.status.push_str(status);
            self.status_dirty = true;
        }
        Ok(())
    }

    fn renderer_name(&self) -> &str {
        &self.adapter_name
    }
}

fn create_pipelines(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Pipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("colored_shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::COLORED_SHADER.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("colored_pipeline_layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    let build = |kind: PipelineKind| {
        let (label, topology, bias) = match kind {
            PipelineKind::Points => ("points_pipeline", wgpu::PrimitiveTopology::PointList, None),
            PipelineKind::Lines => ("lines_pipeline", wgpu::PrimitiveTopology::LineList, None),
            PipelineKind::Triangles => {
                ("triangles_pipeline", wgpu::PrimitiveTopology::TriangleList, None)
            }
            PipelineKind::OffsetTriangles => (
                "offset_triangles_pipeline",
                wgpu::PrimitiveTopology::TriangleList,
                Some(wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                }),
            ),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_colored"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x4,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_colored"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: bias.unwrap_or_default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    };

    Pipelines {
        points: build(PipelineKind::Points),
        lines: build(PipelineKind::Lines),
        triangles: build(PipelineKind::Triangles),
        offset_triangles: build(PipelineKind::OffsetTriangles),
    }
}

fn create_vertex_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("frame_vertex_buffer"),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
