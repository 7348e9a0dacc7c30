use hoop_core::PostParams;

use super::helpers::{self, uniform_entry};
use super::targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    // intensity, opacity, luminance threshold, luminance smoothing
    bloom: [f32; 4],
    // offset, darkness, opacity, fxaa on/off
    vignette: [f32; 4],
}

impl PostUniforms {
    pub(crate) fn new(params: &PostParams, resolution: [f32; 2], blur_dir: [f32; 2]) -> Self {
        Self {
            resolution,
            blur_dir,
            bloom: [
                params.bloom_intensity,
                params.bloom_opacity,
                params.luminance_threshold,
                params.luminance_smoothing,
            ],
            vignette: [
                params.vignette_offset,
                params.vignette_darkness,
                params.vignette_opacity,
                if params.fxaa { 1.0 } else { 0.0 },
            ],
        }
    }
}

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    // one uniform block per pass so queued writes don't overwrite each other
    uniforms: [wgpu::Buffer; 4],
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

/// Bind groups that reference the current render targets.
pub(crate) struct PostBindGroups {
    pub(crate) bright: wgpu::BindGroup,
    pub(crate) blur_h: wgpu::BindGroup,
    pub(crate) blur_v: wgpu::BindGroup,
    pub(crate) composite: wgpu::BindGroup,
    pub(crate) bloom_only: wgpu::BindGroup,
}

pub(crate) const PASS_BRIGHT: usize = 0;
pub(crate) const PASS_BLUR_H: usize = 1;
pub(crate) const PASS_BLUR_V: usize = 2;
pub(crate) const PASS_COMPOSITE: usize = 3;

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        bloom_format: wgpu::TextureFormat,
        swap_format: wgpu::TextureFormat,
    ) -> Self {
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT, false),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
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
        let uniforms = ["post_bright", "post_blur_h", "post_blur_v", "post_composite"].map(|label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            "bright_pipeline",
            &pl_single,
            shader,
            "fs_bright",
            bloom_format,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            "blur_pipeline",
            &pl_single,
            shader,
            "fs_blur",
            bloom_format,
            None,
        );
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            "composite_pipeline",
            &pl_composite,
            shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        Self {
            bgl0,
            bgl1,
            sampler,
            uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
        }
    }

    fn source_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        view: &wgpu::TextureView,
        pass: usize,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniforms[pass].as_entire_binding(),
                },
            ],
        })
    }

    /// Rebuild after the render targets changed size.
    pub(crate) fn bind_groups(&self, device: &wgpu::Device, targets: &RenderTargets) -> PostBindGroups {
        PostBindGroups {
            bright: self.source_group(device, "bg_bright", &targets.hdr_view, PASS_BRIGHT),
            blur_h: self.source_group(device, "bg_blur_h", &targets.bloom_a_view, PASS_BLUR_H),
            blur_v: self.source_group(device, "bg_blur_v", &targets.bloom_b_view, PASS_BLUR_V),
            composite: self.source_group(device, "bg_composite", &targets.hdr_view, PASS_COMPOSITE),
            bloom_only: device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("bg_bloom_only"),
                layout: &self.bgl1,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            }),
        }
    }

    /// Upload this frame's parameters for every pass.
    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        params: &PostParams,
        bloom_res: [f32; 2],
        full_res: [f32; 2],
    ) {
        let passes = [
            (PASS_BRIGHT, bloom_res, [0.0, 0.0]),
            (PASS_BLUR_H, bloom_res, [1.0, 0.0]),
            (PASS_BLUR_V, bloom_res, [0.0, 1.0]),
            (PASS_COMPOSITE, full_res, [0.0, 0.0]),
        ];
        for (pass, res, dir) in passes {
            let u = PostUniforms::new(params, res, dir);
            queue.write_buffer(&self.uniforms[pass], 0, bytemuck::bytes_of(&u));
        }
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
