use crate::constants::*;
use diorama_core::scene::{Geometry, GeometryId, Material, TextureId};
use diorama_core::{Camera, Color, Scene};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use web_sys as web;

mod helpers;
use helpers::PipelineKey;

static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    pos: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

struct GpuGeometry {
    vertices: wgpu::Buffer,
    indices: Option<(wgpu::Buffer, u32)>,
    vertex_count: u32,
    lines: bool,
}

struct DrawItem {
    geometry: GeometryId,
    texture: Option<TextureId>,
    world: Mat4,
    uniforms: DrawUniforms,
    blend: bool,
    double_sided: bool,
    view_z: f32,
}

#[inline]
fn srgb_to_linear(c: Color) -> [f32; 3] {
    c.to_array().map(|v| v.max(0.0).powf(2.2))
}

fn draw_uniforms(world: Mat4, m: &Material) -> DrawUniforms {
    let normal = if world.determinant().abs() > 1e-12 {
        world.inverse().transpose()
    } else {
        world
    };
    let [r, g, b] = srgb_to_linear(m.color);
    let [er, eg, eb] = srgb_to_linear(m.emissive.scaled(m.emissive_intensity));
    DrawUniforms {
        model: world.to_cols_array_2d(),
        normal: normal.to_cols_array_2d(),
        color: [r, g, b, m.opacity],
        emissive: [er, eg, eb, if m.lit { 1.0 } else { 0.0 }],
    }
}

fn pipeline_index(lines: bool, blend: bool, double_sided: bool) -> usize {
    match (lines, blend, double_sided) {
        (true, false, _) => 4,
        (true, true, _) => 5,
        (false, b, d) => usize::from(b) * 2 + usize::from(d),
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    draw_bgl: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bg: wgpu::BindGroup,
    draw_capacity: usize,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_bg: wgpu::BindGroup,

    // tri opaque (cull, double), tri blend (cull, double), lines opaque, lines blend
    pipelines: Vec<wgpu::RenderPipeline>,

    geometries: FnvHashMap<GeometryId, GpuGeometry>,
    textures: FnvHashMap<TextureId, wgpu::BindGroup>,

    width: u32,
    height: u32,
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniforms"),
        size: DRAW_UNIFORM_STRIDE * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bg)
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (_depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let uniform_entry = |dynamic: bool| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: None,
            },
            count: None,
        };
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(false)],
        });
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[uniform_entry(true)],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let (draw_buffer, draw_bg) = create_draw_buffer(&device, &draw_bgl, INITIAL_DRAW_SLOTS);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let white = helpers::create_rgba_texture(&device, &queue, "white", 1, 1, &[255; 4]);
        let white_bg = Self::texture_bind_group(&device, &texture_bgl, &sampler, &white);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_layout"),
            bind_group_layouts: &[&globals_bgl, &draw_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let tri = wgpu::PrimitiveTopology::TriangleList;
        let lines = wgpu::PrimitiveTopology::LineList;
        let keys = [
            (tri, Some(wgpu::Face::Back), false),
            (tri, None, false),
            (tri, Some(wgpu::Face::Back), true),
            (tri, None, true),
            (lines, None, false),
            (lines, None, true),
        ];
        let pipelines = keys
            .into_iter()
            .map(|(topology, cull_mode, blend)| {
                helpers::make_scene_pipeline(
                    &device,
                    &layout,
                    &shader,
                    VERTEX_LAYOUT,
                    format,
                    PipelineKey {
                        topology,
                        cull_mode,
                        blend,
                    },
                )
            })
            .collect();

        log::info!("[gpu] surface {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_buffer,
            globals_bg,
            draw_bgl,
            draw_buffer,
            draw_bg,
            draw_capacity: INITIAL_DRAW_SLOTS,
            texture_bgl,
            sampler,
            white_bg,
            pipelines,
            geometries: FnvHashMap::default(),
            textures: FnvHashMap::default(),
            width,
            height,
        })
    }

    fn texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        let (_tex, view) = helpers::create_depth_texture(&self.device, width, height);
        self.depth_view = view;
    }

    fn upload_geometry(&mut self, scene: &Scene, id: GeometryId) {
        if self.geometries.contains_key(&id) {
            return;
        }
        let (vertices, indices, lines): (Vec<Vertex>, Option<&[u32]>, bool) =
            match scene.geometry(id) {
                Geometry::Triangles(mesh) => (
                    mesh.positions
                        .iter()
                        .enumerate()
                        .map(|(i, p)| Vertex {
                            pos: p.to_array(),
                            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
                            uv: mesh.uvs.get(i).map(|uv| uv.to_array()).unwrap_or([0.0; 2]),
                        })
                        .collect(),
                    Some(&mesh.indices),
                    false,
                ),
                Geometry::Lines(l) => (
                    l.positions
                        .iter()
                        .map(|p| Vertex {
                            pos: p.to_array(),
                            normal: [0.0; 3],
                            uv: [0.0; 2],
                        })
                        .collect(),
                    None,
                    true,
                ),
            };
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("geometry_vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = indices.filter(|ix| !ix.is_empty()).map(|ix| {
            let buf = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("geometry_indices"),
                    contents: bytemuck::cast_slice(ix),
                    usage: wgpu::BufferUsages::INDEX,
                });
            (buf, ix.len() as u32)
        });
        self.geometries.insert(
            id,
            GpuGeometry {
                vertices: vertex_buffer,
                indices: index_buffer,
                vertex_count: vertices.len() as u32,
                lines,
            },
        );
    }

    fn upload_texture(&mut self, scene: &Scene, id: TextureId) {
        if self.textures.contains_key(&id) {
            return;
        }
        let data = scene.texture(id);
        let view = helpers::create_rgba_texture(
            &self.device,
            &self.queue,
            "scene_texture",
            data.width,
            data.height,
            &data.rgba,
        );
        let bg = Self::texture_bind_group(&self.device, &self.texture_bgl, &self.sampler, &view);
        self.textures.insert(id, bg);
    }

    fn collect_draws(&mut self, scene: &Scene, view: Mat4) -> Vec<DrawItem> {
        let mut items = Vec::new();
        scene.visit_drawables(|_, d, world| {
            let m = &d.material;
            if m.opacity <= 0.0 {
                return;
            }
            items.push(DrawItem {
                geometry: d.geometry,
                texture: m.texture,
                world,
                uniforms: draw_uniforms(world, m),
                blend: m.transparent || m.opacity < 1.0,
                double_sided: m.double_sided,
                view_z: (view * world.w_axis).z,
            });
        });
        for item in &items {
            self.upload_geometry(scene, item.geometry);
            if let Some(t) = item.texture {
                self.upload_texture(scene, t);
            }
        }
        // opaque first, then blended far to near
        items.sort_by(|a, b| {
            a.blend
                .cmp(&b.blend)
                .then_with(|| match a.blend {
                    true => a.view_z.total_cmp(&b.view_z),
                    false => std::cmp::Ordering::Equal,
                })
        });
        items
    }

    fn ensure_draw_capacity(&mut self, count: usize) {
        if count <= self.draw_capacity {
            return;
        }
        let slots = count.next_power_of_two();
        let (buffer, bg) = create_draw_buffer(&self.device, &self.draw_bgl, slots);
        self.draw_buffer = buffer;
        self.draw_bg = bg;
        self.draw_capacity = slots;
        log::debug!("[gpu] draw uniform slots -> {}", slots);
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        background: Color,
    ) -> Result<(), wgpu::SurfaceError> {
        let view = camera.view_matrix();
        let items = self.collect_draws(scene, view);
        self.ensure_draw_capacity(items.len());

        let light = Vec3::from(LIGHT_DIR).normalize();
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light: [light.x, light.y, light.z, AMBIENT],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let stride = DRAW_UNIFORM_STRIDE as usize;
        let mut staging = vec![0u8; items.len() * stride];
        for (i, item) in items.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&item.uniforms);
            staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let [r, g, b] = srgb_to_linear(background);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
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
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.globals_bg, &[]);
            for (i, item) in items.iter().enumerate() {
                let Some(geo) = self.geometries.get(&item.geometry) else {
                    continue;
                };
                let texture_bg = item
                    .texture
                    .and_then(|t| self.textures.get(&t))
                    .unwrap_or(&self.white_bg);
                pass.set_pipeline(
                    &self.pipelines[pipeline_index(geo.lines, item.blend, item.double_sided)],
                );
                pass.set_bind_group(1, &self.draw_bg, &[(i * stride) as u32]);
                pass.set_bind_group(2, texture_bg, &[]);
                pass.set_vertex_buffer(0, geo.vertices.slice(..));
                match &geo.indices {
                    Some((ib, count)) => {
                        pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => pass.draw(0..geo.vertex_count, 0..1),
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
