use super::helpers;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen targets: full-resolution HDR scene color with its depth buffer,
/// and two half-resolution bloom ping-pong textures.
///
/// Textures are kept alongside their views so they live as long as the views.
pub(crate) struct RenderTargets {
    #[allow(dead_code)]
    hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    #[allow(dead_code)]
    depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    #[allow(dead_code)]
    bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    #[allow(dead_code)]
    bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_tex, hdr_view) =
            helpers::create_texture(device, "hdr_tex", width, height, HDR_FORMAT, usage);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let (bloom_a, bloom_a_view) =
            helpers::create_texture(device, "bloom_a", bw, bh, HDR_FORMAT, usage);
        let (bloom_b, bloom_b_view) =
            helpers::create_texture(device, "bloom_b", bw, bh, HDR_FORMAT, usage);
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
        }
    }

    /// Half-resolution size of the bloom textures, as floats for uniforms.
    pub(crate) fn bloom_resolution(width: u32, height: u32) -> [f32; 2] {
        [
            (width.max(1) / 2).max(1) as f32,
            (height.max(1) / 2).max(1) as f32,
        ]
    }
}
