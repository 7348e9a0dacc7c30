// Scroll and choreography tuning constants shared by every stage.

// Wheel input
pub const WHEEL_SENSITIVITY: f32 = 0.0005; // progress per wheel pixel
pub const TITLE_SENSITIVITY: f32 = 0.0001; // glass title zoom spans 5x the range of a stage
pub const EXTRA_ROTATION_RATE: f32 = 0.2; // extra rotations per unit of saturated progress input

// Thresholds
pub const VISIBLE_THRESHOLD: f32 = 0.7;
pub const EFFECTS_ON_THRESHOLD: f32 = 0.95;
pub const EFFECTS_OFF_THRESHOLD: f32 = 0.9;
pub const GLASS_BREAK_THRESHOLD: f32 = 1.0;

// Completion policy
pub const HOOP_EXTRA_ROTATIONS: f32 = 0.0; // hand over as soon as the hoop saturates
pub const ARENA_EXTRA_ROTATIONS: f32 = 1.0;

// Glass title
pub const TITLE_MIN_SCALE: f32 = 1.0;
pub const TITLE_MAX_SCALE: f32 = 6.0;
pub const GLASS_HOLD_SEC: f32 = 2.5; // crack display + fade before the ball drops

// Intro ball timeline (seconds)
pub const BALL_DIVE_SEC: f32 = 1.5;
pub const BALL_RETURN_SEC: f32 = 1.5;
pub const BALL_SHRINK_SEC: f32 = 0.8;
pub const BALL_IDLE_SPIN: f32 = 0.2; // rad/s before the glass breaks
pub const BALL_CAPTION_AT_SEC: f32 = 1.8; // caption fade starts mid-bounce
pub const BALL_DIVE_Z: f32 = -10.0;
pub const BALL_REST: [f32; 3] = [-3.0, 0.0, -0.5];
pub const BALL_LOAD_SCALE: f32 = 3.5;
pub const BALL_SLIDE_X: f32 = -10.0; // off-screen left while the hoop is up
pub const BALL_SLIDE_SCALE: f32 = 0.5;
pub const BALL_SLIDE_SEC: f32 = 0.8;

// Intro rebound loop
pub const BOUNCE_PERIOD_SEC: f32 = 1.5;
pub const BOUNCE_MAX_HEIGHT: f32 = 1.5;
pub const BOUNCE_DECAY_PER_BOUNCE: f32 = 0.1;
pub const BOUNCE_MIN_AMPLITUDE: f32 = 0.05;
pub const FLOOR_FLASH_INTENSITY: f32 = 3.0;
pub const FLOOR_FLASH_DECAY_SEC: f32 = 1.2;
pub const FLOOR_FLASH_CUT_SEC: f32 = 0.3;
pub const FLOOR_Y: f32 = -1.05;

// Hoop
pub const HOOP_SCALE: f32 = 4.5;
pub const HOOP_ENTER_X: f32 = 10.0;
pub const HOOP_REST_X: f32 = 2.0;
pub const HOOP_EXIT_RISE: f32 = 10.0;
pub const HOOP_EXIT_SEC: f32 = 0.8;

// Arena
pub const ARENA_SCALE: f32 = 0.5;
pub const ARENA_BASE_Y: f32 = -10.7;
pub const ARENA_RISE: f32 = 10.0;
pub const ARENA_DEPTH: f32 = -10.0;
pub const ARENA_IDLE_SPIN: f32 = 0.2; // rad/s while visible
pub const ARENA_BOOST_SPIN: f32 = 0.1; // added once effects are active
pub const ARENA_CAMERA_PULL: f32 = 0.05; // fraction of the remaining distance per wheel event
pub const ARENA_CAMERA_FOCUS: [f32; 3] = [0.0, 1.0, 0.0];
pub const ARENA_CAMERA_START: f32 = 0.8; // model progress where the camera starts moving in
pub const ARENA_GLOW: f32 = 2.5; // emissive strength of the court lamps

// Final
pub const FINAL_CAMERA_EYE: [f32; 3] = [0.0, 1.0, 5.0];
pub const FINAL_CAMERA_SEC: f32 = 1.0;
pub const FINAL_BALL_RADIUS: f32 = 0.5; // pick sphere radius at unit scale
pub const FINAL_SPIN_PERIOD_SEC: f32 = 2.5;
pub const WANDER_MIN: [f32; 3] = [-3.5, -1.5, -4.0];
pub const WANDER_MAX: [f32; 3] = [3.5, 2.5, 1.0];
pub const WANDER_STEP: f32 = 2.5; // max offset per leg
pub const WANDER_BIG_JUMP_CHANCE: f64 = 0.2;
pub const WANDER_TILT: f32 = 0.4;
pub const DEFLATE_PARTICLES: usize = 12;
pub const DEFLATE_FIRST: f32 = 0.4;
pub const DEFLATE_FIRST_SEC: f32 = 0.2;
pub const DEFLATE_REST_SEC: f32 = 2.0;
pub const DEFLATE_SHAKE_SEC: f32 = 0.08; // one leg of the shake; six legs in total
pub const DEFLATE_FALL_Y: f32 = -1.0;
pub const DEFLATE_FALL_SEC: f32 = 1.8;
pub const DEFLATE_SQUASH: [f32; 3] = [0.18, 0.05, 0.18];
pub const DEFLATE_SQUASH_SEC: f32 = 0.3;

// Shared camera
pub const CAMERA_FOVY_DEG: f32 = 30.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 50.0;
pub const CAMERA_START_EYE: [f32; 3] = [0.0, 0.0, 12.0];

// Captions
pub const CAPTION_SHOW_SEC: f32 = 0.8;
pub const CAPTION_HIDE_SEC: f32 = 0.5;

// Compositor
pub const BLOOM_REST_INTENSITY: f32 = 1.25;
pub const BLOOM_PEAK_INTENSITY: f32 = 2.0;
pub const EFFECT_REST_OPACITY: f32 = 0.5;
pub const EFFECT_PEAK_OPACITY: f32 = 1.0;
pub const EFFECT_FADE_SEC: f32 = 0.5;
pub const BLOOM_THRESHOLD: f32 = 0.1;
pub const BLOOM_SMOOTHING: f32 = 0.9;
pub const VIGNETTE_OFFSET: f32 = 0.3;
pub const VIGNETTE_DARKNESS: f32 = 0.7;

// Diagnostics
pub const HISTORY_CAPACITY: usize = 64;
