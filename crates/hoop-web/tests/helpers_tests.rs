// Host-side tests for the render helpers.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod helpers {
    include!("../src/render/helpers.rs");
}

type TextureFactory = fn(
    &wgpu::Device,
    &str,
    u32,
    u32,
    wgpu::TextureFormat,
    wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView);

#[test]
fn one_texture_factory_serves_color_and_depth() {
    let _: TextureFactory = helpers::create_texture;
    assert!(helpers::DEPTH_FORMAT.has_depth_aspect());
    assert!(!wgpu::TextureFormat::Rgba16Float.has_depth_aspect());
}

#[test]
fn uniform_entry_sets_dynamic_offset_only_when_asked() {
    let vis = wgpu::ShaderStages::VERTEX;
    for dynamic in [false, true] {
        let entry = helpers::uniform_entry(3, vis, dynamic);
        assert_eq!(entry.binding, 3);
        assert_eq!(entry.visibility, vis);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset,
                ..
            } if has_dynamic_offset == dynamic
        ));
    }
}
