// Browser-side tuning constants.
//
// Story timing and thresholds live in `hoop_core::constants`; these only
// cover DOM plumbing and the renderer.

// Canvas the renderer attaches to
pub const CANVAS_ID: &str = "app-canvas";

// Optional overrides read from the canvas element
pub const ATTR_ARENA_EXTRA_ROTATIONS: &str = "data-arena-extra-rotations";
pub const ATTR_ASSET_ROOT: &str = "data-asset-root";
pub const ATTR_SENSITIVITY: &str = "data-sensitivity";

// Glass title overlay
pub const GLASS_TITLE_SELECTOR: &str = ".glass-title";
pub const CRACKS_CONTAINER_ID: &str = "cracks-container";
pub const GLASS_TITLE_MAX_ZOOM: f32 = 5.0; // title scale = 1 + zoom * progress
pub const CRACKS_SHOW_SEC: f32 = 0.2;
pub const CRACKS_HIDE_SEC: f32 = 1.0;
pub const CRACKS_FADE_SEC: f32 = 0.5; // after the break finishes
pub const GLASS_TITLE_HIDE_SEC: f32 = 0.5;
pub const GLASS_TITLE_SHOW_SEC: f32 = 0.8;

// Captions
pub const CAPTIONS_CONTAINER_ID: &str = "captions";
pub const CAPTION_CLASS: &str = "stage-caption";
pub const CAPTION_OPACITY_EPSILON: f32 = 0.002; // skip style writes below this change

// Wheel normalisation (WheelEvent.deltaMode)
pub const LINE_HEIGHT_PX: f32 = 16.0;
pub const FALLBACK_PAGE_PX: f32 = 800.0;

// Frame loop
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp after tab switches

// Renderer
pub const MAX_DRAWS: usize = 64;
pub const DRAW_UNIFORM_STRIDE: u64 = 256; // minUniformBufferOffsetAlignment on the web
pub const CLEAR_COLOR: [f64; 3] = [0.012, 0.012, 0.02];
pub const LIGHT_DIR: [f32; 3] = [0.4, 0.8, 0.45];
