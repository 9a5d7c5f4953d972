//! Scene controller: mesh buffers, lighting, and the per-frame spin.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use girder_extrude::TriangleMesh;
use girder_math::{Mat4, Transform};

use crate::{GpuContext, OrbitCamera, RenderError};

/// Turntable angular rate in radians per second.
pub const ROTATION_RATE: f64 = 0.2;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The page behind the viewer is white.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Steel grey, high metalness, low roughness.
const STEEL: MaterialDesc = MaterialDesc {
    base_color: [0.294, 0.333, 0.388, 1.0],
    metalness: 0.9,
    roughness: 0.1,
    unlit: false,
};

/// Shear-centre marker: flat red, no lighting.
const MARKER: MaterialDesc = MaterialDesc {
    base_color: [0.9, 0.05, 0.05, 1.0],
    metalness: 0.0,
    roughness: 1.0,
    unlit: true,
};

#[derive(Debug, Clone, Copy)]
struct MaterialDesc {
    base_color: [f32; 4],
    metalness: f32,
    roughness: f32,
    unlit: bool,
}

/// Interleaved vertex layout matching the shader's two attributes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Per-object uniform block. Layout mirrors `Uniforms` in `shader.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// xyz: direction toward the light, w: intensity.
    light0: [f32; 4],
    light1: [f32; 4],
    /// x: ambient intensity.
    ambient: [f32; 4],
    base_color: [f32; 4],
    /// x: metalness, y: roughness, z: unlit flag.
    params: [f32; 4],
}

/// One uploaded mesh with its material and uniform slot.
struct SceneObject {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    uniform_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    material: MaterialDesc,
}

/// The auto-spin state: an angle that accumulates wall-clock time while
/// enabled. Kept separate from the camera so mesh construction (once,
/// pure) and the per-frame transform update stay independent stages.
#[derive(Debug, Clone)]
pub struct Turntable {
    /// Accumulated rotation in radians.
    pub angle: f64,
    /// Whether the turntable is advancing.
    pub spinning: bool,
}

impl Turntable {
    /// A spinning turntable at angle zero.
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            spinning: true,
        }
    }

    /// Advance by `dt` seconds of wall-clock time.
    pub fn advance(&mut self, dt: f64) {
        if self.spinning {
            self.angle += dt * ROTATION_RATE;
        }
    }
}

impl Default for Turntable {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the render pipeline, the uploaded meshes, the camera, and the
/// turntable. Geometry is uploaded once at construction; afterwards each
/// frame rewrites the uniform buffers and records a single render pass.
///
/// Dropping the controller drops every wgpu buffer and texture it
/// created, so repeated open/close cycles leave no GPU residue.
pub struct SceneController {
    ctx: &'static GpuContext,
    pipeline: wgpu::RenderPipeline,
    objects: Vec<SceneObject>,
    color_texture: wgpu::Texture,
    depth_texture: wgpu::Texture,
    width: u32,
    height: u32,
    /// Z midpoint of the solid; the model transform recenters by this so
    /// orbit and spin pivot through the centroid.
    z_center: f64,
    /// User-orbitable camera.
    pub camera: OrbitCamera,
    /// Auto-spin state.
    pub turntable: Turntable,
}

impl SceneController {
    /// Upload the solid and its marker and build the render pipeline.
    pub fn new(
        ctx: &'static GpuContext,
        solid: &TriangleMesh,
        marker: &TriangleMesh,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Section Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Section Bind Group Layout"),
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

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Section Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        };

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Section Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            });

        let objects = vec![
            upload_object(ctx, &bind_group_layout, solid, STEEL),
            upload_object(ctx, &bind_group_layout, marker, MARKER),
        ];

        let (color_texture, depth_texture) = create_targets(ctx, width, height);

        Ok(Self {
            ctx,
            pipeline,
            objects,
            color_texture,
            depth_texture,
            width,
            height,
            z_center: mesh_z_center(solid),
            camera: OrbitCamera::new(),
            turntable: Turntable::new(),
        })
    }

    /// Advance the turntable by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.turntable.advance(dt);
    }

    /// Orbit the camera. Taking manual control of the orbit pauses the
    /// turntable; [`SceneController::set_spinning`] resumes it.
    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.turntable.spinning = false;
        self.camera.orbit(delta_yaw, delta_pitch);
    }

    /// Zoom the camera.
    pub fn zoom(&mut self, factor: f64) {
        self.camera.zoom(factor);
    }

    /// Pan the camera target.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.camera.pan(dx, dy);
    }

    /// Enable or disable the turntable spin.
    pub fn set_spinning(&mut self, spinning: bool) {
        self.turntable.spinning = spinning;
    }

    /// Current render target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize the render targets. No-op when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return;
        }
        let (color, depth) = create_targets(self.ctx, width, height);
        self.color_texture = color;
        self.depth_texture = depth;
        self.width = width;
        self.height = height;
    }

    /// Render one frame and read it back as tightly-packed RGBA bytes
    /// (`width * height * 4`).
    pub fn render_frame(&mut self) -> Result<Vec<u8>, RenderError> {
        let aspect = self.width as f64 / self.height as f64;
        let view_proj = mat_to_array(&self.camera.view_proj(aspect));

        // The solid spans z in [~0, depth]; recenter before spinning so
        // the turntable pivots through the centroid.
        let model = Transform::rotation_y(self.turntable.angle)
            .then(&Transform::translation(0.0, 0.0, -self.z_center));
        let model_arr = mat_to_array(&model.matrix);

        let eye = self.camera.eye();
        let light0 = normalized_light([5.0, 5.0, 5.0], 1.2);
        let light1 = normalized_light([-5.0, 5.0, -5.0], 0.8);

        for object in &self.objects {
            let uniforms = ObjectUniforms {
                view_proj,
                model: model_arr,
                camera_pos: [eye.x as f32, eye.y as f32, eye.z as f32, 1.0],
                light0,
                light1,
                ambient: [0.3, 0.0, 0.0, 0.0],
                base_color: object.material.base_color,
                params: [
                    object.material.metalness,
                    object.material.roughness,
                    if object.material.unlit { 1.0 } else { 0.0 },
                    0.0,
                ],
            };
            self.ctx
                .queue
                .write_buffer(&object.uniform_buf, 0, bytemuck::bytes_of(&uniforms));
        }

        let color_view = self.color_texture.create_view(&Default::default());
        let depth_view = self.depth_texture.create_view(&Default::default());

        let padded_bytes_per_row = (self.width * 4).div_ceil(256) * 256;
        let readback_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Readback Buffer"),
            size: (padded_bytes_per_row * self.height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Section Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            for object in &self.objects {
                pass.set_bind_group(0, &object.bind_group, &[]);
                pass.set_vertex_buffer(0, object.vertex_buf.slice(..));
                pass.set_index_buffer(object.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..object.index_count, 0, 0..1);
            }
        }

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.ctx.queue.submit(Some(encoder.finish()));

        // Map and read buffer
        let buffer_slice = readback_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RenderError::BufferMapping)?
            .map_err(|_| RenderError::BufferMapping)?;

        let data = buffer_slice.get_mapped_range();

        // Strip row padding.
        let mut frame = Vec::with_capacity((self.width * self.height * 4) as usize);
        for row in 0..self.height {
            let start = (row * padded_bytes_per_row) as usize;
            frame.extend_from_slice(&data[start..start + (self.width * 4) as usize]);
        }

        drop(data);
        readback_buffer.unmap();

        Ok(frame)
    }
}

fn upload_object(
    ctx: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    mesh: &TriangleMesh,
    material: MaterialDesc,
) -> SceneObject {
    let vertices: Vec<Vertex> = (0..mesh.num_vertices())
        .map(|i| Vertex {
            position: [
                mesh.vertices[i * 3],
                mesh.vertices[i * 3 + 1],
                mesh.vertices[i * 3 + 2],
            ],
            normal: [
                mesh.normals[i * 3],
                mesh.normals[i * 3 + 1],
                mesh.normals[i * 3 + 2],
            ],
        })
        .collect();

    let vertex_buf = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

    let index_buf = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

    let uniform_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform Buffer"),
        size: std::mem::size_of::<ObjectUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buf.as_entire_binding(),
        }],
    });

    SceneObject {
        vertex_buf,
        index_buf,
        index_count: mesh.indices.len() as u32,
        uniform_buf,
        bind_group,
        material,
    }
}

fn create_targets(ctx: &GpuContext, width: u32, height: u32) -> (wgpu::Texture, wgpu::Texture) {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let color = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Color Target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let depth = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    (color, depth)
}

/// Midpoint of the mesh's Z extent.
fn mesh_z_center(mesh: &TriangleMesh) -> f64 {
    let mut min_z = f64::INFINITY;
    let mut max_z = f64::NEG_INFINITY;
    for v in mesh.vertices.chunks(3) {
        min_z = min_z.min(v[2] as f64);
        max_z = max_z.max(v[2] as f64);
    }
    if min_z.is_finite() {
        (min_z + max_z) / 2.0
    } else {
        0.0
    }
}

/// nalgebra stores column-major, same as WGSL `mat4x4<f32>`.
fn mat_to_array(m: &Mat4) -> [[f32; 4]; 4] {
    let mut out = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            out[col][row] = m[(row, col)] as f32;
        }
    }
    out
}

fn normalized_light(position: [f64; 3], intensity: f64) -> [f32; 4] {
    let len = (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
    [
        (position[0] / len) as f32,
        (position[1] / len) as f32,
        (position[2] / len) as f32,
        intensity as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_extrude::uv_sphere;

    #[test]
    fn test_turntable_accumulates_rate_times_dt() {
        let mut turntable = Turntable::new();
        for _ in 0..60 {
            turntable.advance(1.0 / 60.0);
        }
        assert!((turntable.angle - ROTATION_RATE).abs() < 1e-9);
    }

    #[test]
    fn test_turntable_pauses() {
        let mut turntable = Turntable::new();
        turntable.advance(1.0);
        turntable.spinning = false;
        turntable.advance(5.0);
        assert!((turntable.angle - ROTATION_RATE).abs() < 1e-9);
    }

    #[test]
    fn test_mat_to_array_is_column_major() {
        let m = Transform::translation(7.0, 8.0, 9.0).matrix;
        let a = mat_to_array(&m);
        // Translation lives in the last column.
        assert_eq!(a[3][0], 7.0);
        assert_eq!(a[3][1], 8.0);
        assert_eq!(a[3][2], 9.0);
        assert_eq!(a[0][0], 1.0);
    }

    #[test]
    fn test_mesh_z_center() {
        let sphere = uv_sphere(0.5, 8, 8);
        assert!(mesh_z_center(&sphere).abs() < 1e-6);
    }

    #[test]
    #[ignore = "requires GPU"]
    fn test_open_close_cycles_leave_no_residue() {
        let ctx = match GpuContext::init_blocking() {
            Ok(ctx) => ctx,
            Err(RenderError::NoAdapter) => return,
            Err(e) => panic!("{e}"),
        };
        let solid = uv_sphere(0.1, 8, 8);
        let marker = uv_sphere(0.02, 8, 8);
        for _ in 0..4 {
            let mut scene = SceneController::new(ctx, &solid, &marker, 64, 64).unwrap();
            scene.advance(0.016);
            let frame = scene.render_frame().unwrap();
            assert_eq!(frame.len(), 64 * 64 * 4);
            // Dropping the controller releases every buffer it created.
        }
    }
}
