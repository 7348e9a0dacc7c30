pub(crate) mod helpers;
pub mod meshes;
pub(crate) mod post;
pub(crate) mod scene;
pub(crate) mod targets;

use hoop_core::{CameraPose, Drawable, MeshKind, ModelHandle, PostParams, ResourceRelease};
use web_sys as web;

use crate::constants::CLEAR_COLOR;
use post::{PostBindGroups, PostResources};
use scene::{GpuMesh, Globals, SceneResources};
use targets::{RenderTargets, HDR_FORMAT};

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    post: PostResources,
    post_groups: PostBindGroups,
    scene: SceneResources,
    // procedural extras without a model handle
    floor: GpuMesh,
    particle: GpuMesh,
    // proxy geometry per loaded model, uploaded on first draw
    models: Vec<(ModelHandle, GpuMesh)>,
    width: u32,
    height: u32,
    time_accum: f32,
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
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });

        let targets = RenderTargets::new(&device, width, height);
        let post = PostResources::new(&device, &post_shader, HDR_FORMAT, format);
        let post_groups = post.bind_groups(&device, &targets);
        let scene = SceneResources::new(&device, &scene_shader, HDR_FORMAT);
        let floor = GpuMesh::upload(&device, "floor", &meshes::for_kind(MeshKind::Floor));
        let particle = GpuMesh::upload(&device, "particle", &meshes::for_kind(MeshKind::Particle));

        log::info!("[gpu] ready {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            post,
            post_groups,
            scene,
            floor,
            particle,
            models: Vec::new(),
            width,
            height,
            time_accum: 0.0,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets = RenderTargets::new(&self.device, width, height);
            self.post_groups = self.post.bind_groups(&self.device, &self.targets);
        }
    }

    /// Upload proxy geometry for a model the first time it is drawn.
    fn ensure_model(&mut self, handle: ModelHandle, kind: MeshKind) {
        if self.models.iter().any(|(h, _)| *h == handle) {
            return;
        }
        let label = format!("model_{}", handle.0);
        let mesh = GpuMesh::upload(&self.device, &label, &meshes::for_kind(kind));
        log::debug!("[gpu] uploaded {:?} as {:?}", handle, kind);
        self.models.push((handle, mesh));
    }

    fn mesh_for(&self, d: &Drawable) -> Option<&GpuMesh> {
        match (d.handle, d.mesh) {
            (Some(h), _) => self.models.iter().find(|(m, _)| *m == h).map(|(_, mesh)| mesh),
            (None, MeshKind::Floor) => Some(&self.floor),
            (None, MeshKind::Particle) => Some(&self.particle),
            (None, _) => None,
        }
    }

    pub fn render(
        &mut self,
        dt_sec: f32,
        camera: &CameraPose,
        draws: &[Drawable],
        params: &PostParams,
    ) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += dt_sec;
        for d in draws {
            if let Some(h) = d.handle {
                self.ensure_model(h, d.mesh);
            }
        }

        let globals = Globals::new(camera.view_proj(), camera.eye, self.time_accum);
        let count = self.scene.write(&self.queue, &globals, draws);
        let bloom_res = RenderTargets::bloom_resolution(self.width, self.height);
        let full_res = [self.width as f32, self.height as f32];
        self.post.write_uniforms(&self.queue, params, bloom_res, full_res);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let [r, g, b] = CLEAR_COLOR;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for (slot, d) in draws.iter().take(count).enumerate() {
                if let Some(mesh) = self.mesh_for(d) {
                    self.scene.draw(&mut rpass, slot, mesh);
                }
            }
        }

        // bright pass: hdr -> bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            &self.post.bright_pipeline,
            &self.post_groups.bright,
            None,
        );
        // blur horizontal: bloom_a -> bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            &self.post.blur_pipeline,
            &self.post_groups.blur_h,
            None,
        );
        // blur vertical: bloom_b -> bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            &self.post.blur_pipeline,
            &self.post_groups.blur_v,
            None,
        );
        post::blit(
            &mut encoder,
            "composite",
            &view,
            &self.post.composite_pipeline,
            &self.post_groups.composite,
            Some(&self.post_groups.bloom_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl ResourceRelease for GpuState<'_> {
    fn release(&mut self, handle: ModelHandle) {
        if let Some(i) = self.models.iter().position(|(h, _)| *h == handle) {
            let (_, mesh) = self.models.swap_remove(i);
            mesh.destroy();
            log::debug!("[gpu] destroyed {:?}", handle);
        }
    }
}

/// Releaser used when WebGPU never came up; nothing was uploaded.
pub struct NoGpu;

impl ResourceRelease for NoGpu {
    fn release(&mut self, handle: ModelHandle) {
        log::debug!("[gpu] nothing to release for {:?}", handle);
    }
}
