use glam::{Mat4, Vec3};
use hoop_core::{Drawable, Material, MeshKind};
use wgpu::util::DeviceExt;

use super::helpers::{uniform_entry, DEPTH_FORMAT};
use super::meshes::{MeshData, Vertex};
use crate::constants::{DRAW_UNIFORM_STRIDE, LIGHT_DIR, MAX_DRAWS};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    view_proj: [[f32; 4]; 4],
    // xyz eye, w elapsed seconds
    eye_time: [f32; 4],
    light_dir: [f32; 4],
}

impl Globals {
    pub(crate) fn new(view_proj: Mat4, eye: Vec3, time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye_time: [eye.x, eye.y, eye.z, time],
            light_dir: Vec3::from_array(LIGHT_DIR).normalize().extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniform {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
    // glow, deflate, material, ripple
    params: [f32; 4],
    origin: [f32; 4],
}

fn material_code(m: Material) -> f32 {
    match m {
        Material::Standard => 0.0,
        Material::Deflatable => 1.0,
        Material::Emissive => 2.0,
    }
}

impl From<&Drawable> for DrawUniform {
    fn from(d: &Drawable) -> Self {
        let ripple = if d.mesh == MeshKind::Floor { 1.0 } else { 0.0 };
        Self {
            model: d.transform.to_cols_array_2d(),
            tint: d.tint,
            params: [d.glow, d.deflate, material_code(d.material), ripple],
            origin: d.origin.extend(1.0).to_array(),
        }
    }
}

/// Vertex and index buffers for one proxy mesh.
pub(crate) struct GpuMesh {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub(crate) fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: data.index_count(),
        }
    }

    pub(crate) fn destroy(&self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

pub(crate) struct SceneResources {
    pipeline: wgpu::RenderPipeline,
    globals: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    draws: wgpu::Buffer,
    draws_bg: wgpu::BindGroup,
    staging: Vec<u8>,
}

impl SceneResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        hdr_format: wgpu::TextureFormat,
    ) -> Self {
        let vis = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_globals_bgl"),
            entries: &[uniform_entry(0, vis, false)],
        });
        let draws_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_draws_bgl"),
            entries: &[uniform_entry(0, vis, true)],
        });
        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draws = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_draws"),
            size: DRAW_UNIFORM_STRIDE * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });
        let draws_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_draws_bg"),
            layout: &draws_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draws,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &draws_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                // deflated and squashed balls expose their inside
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: hdr_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        Self {
            pipeline,
            globals,
            globals_bg,
            draws,
            draws_bg,
            staging: vec![0; (DRAW_UNIFORM_STRIDE as usize) * MAX_DRAWS],
        }
    }

    /// Upload globals and per-draw blocks. Returns how many draws fit.
    pub(crate) fn write(&mut self, queue: &wgpu::Queue, globals: &Globals, draws: &[Drawable]) -> usize {
        queue.write_buffer(&self.globals, 0, bytemuck::bytes_of(globals));
        let n = draws.len().min(MAX_DRAWS);
        if draws.len() > MAX_DRAWS {
            log::warn!("[render] {} draws, only {} fit", draws.len(), MAX_DRAWS);
        }
        let stride = DRAW_UNIFORM_STRIDE as usize;
        for (i, d) in draws.iter().take(n).enumerate() {
            let u = DrawUniform::from(d);
            let bytes = bytemuck::bytes_of(&u);
            self.staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if n > 0 {
            queue.write_buffer(&self.draws, 0, &self.staging[..n * stride]);
        }
        n
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, slot: usize, mesh: &GpuMesh) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bg, &[]);
        pass.set_bind_group(1, &self.draws_bg, &[(slot as u64 * DRAW_UNIFORM_STRIDE) as u32]);
        pass.set_vertex_buffer(0, mesh.vertex.slice(..));
        pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
