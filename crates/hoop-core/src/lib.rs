//! Platform-independent core of the scroll-driven basketball story.
//!
//! Everything here is plain Rust: stage state machines, the message protocol
//! that chains them, tweening, camera math and GLB container checks. The web
//! frontend feeds it wheel deltas, clicks and frame times, and draws what it
//! reports.

pub mod asset;
pub mod bus;
pub mod camera;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod context;
pub mod message;
pub mod sequencer;
pub mod stage;
pub mod tween;

pub use asset::{AssetError, Material, ModelAsset, ModelHandle, ModelSlot, ResourceRelease};
pub use bus::{EventBus, SubscriptionId};
pub use camera::{CameraPose, Ray, Viewport};
pub use compositor::{Compositor, PostParams};
pub use config::{Completion, CompositorConfig, ExperienceConfig, StageConfig, Visibility};
pub use context::StageContext;
pub use message::{StageId, StageMessage, Topic};
pub use sequencer::Sequencer;
pub use stage::{CaptionRole, Drawable, Lifecycle, MeshKind, Phase, Stage};
