//! One scroll-gated scene segment: scroll track, model slot, pose, captions
//! and a per-kind choreography.

mod arena;
mod finale;
mod hoop;
mod intro;
pub mod track;

pub use arena::ArenaMotion;
pub use finale::FinalMotion;
pub use hoop::HoopMotion;
pub use intro::IntroMotion;
pub use track::{Phase, ScrollTrack, Transition, Transitions};

use crate::asset::{AssetError, LoadedModel, Material, ModelAsset, ModelHandle, ModelSlot, ResourceRelease};
use crate::camera::{Ray, Viewport};
use crate::config::StageConfig;
use crate::constants::{CAPTION_HIDE_SEC, CAPTION_SHOW_SEC};
use crate::context::StageContext;
use crate::message::{StageId, StageMessage};
use crate::tween::{Ease, Tween};
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Per-frame and per-resize hooks shared by stages and the compositor.
pub trait Lifecycle {
    fn update(&mut self, dt_sec: f32, ctx: &mut StageContext);
    fn resize(&mut self, viewport: Viewport);
    /// Release owned resources. Calling it again releases nothing.
    fn dispose(&mut self, releaser: &mut dyn ResourceRelease);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    /// Euler angles (XYZ order), radians.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Pose {
    pub fn matrix(&self) -> Mat4 {
        let r = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, r, self.translation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionRole {
    /// Large stage heading (`<h2>`).
    Title,
    /// Secondary line (`<h3>`).
    Message,
}

#[derive(Clone, Debug)]
pub struct Caption {
    pub text: &'static str,
    pub role: CaptionRole,
    opacity: Tween,
}

impl Caption {
    pub fn new(text: &'static str, role: CaptionRole) -> Self {
        Self {
            text,
            role,
            opacity: Tween::new(0.0),
        }
    }

    pub fn show(&mut self) {
        self.opacity.to(1.0, CAPTION_SHOW_SEC, Ease::Power2Out);
    }

    pub fn hide(&mut self) {
        self.opacity.to(0.0, CAPTION_HIDE_SEC, Ease::Power2In);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    /// Where the opacity is heading; lets callers skip redundant restarts.
    pub fn target(&self) -> f32 {
        self.opacity.target()
    }

    fn advance(&mut self, dt_sec: f32) {
        self.opacity.advance(dt_sec);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Ball,
    Hoop,
    Arena,
    Floor,
    Particle,
}

/// One draw request for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drawable {
    pub mesh: MeshKind,
    /// Set for loaded models; procedural extras (floor, particles) have none.
    pub handle: Option<ModelHandle>,
    pub transform: Mat4,
    pub material: Material,
    pub tint: [f32; 4],
    /// Emissive strength; the floor uses it as flash intensity.
    pub glow: f32,
    pub deflate: f32,
    /// Floor ripple centre in world space.
    pub origin: Vec3,
}

impl Drawable {
    pub fn model(mesh: MeshKind, loaded: &LoadedModel, pose: &Pose, tint: [f32; 4]) -> Self {
        Self {
            mesh,
            handle: Some(loaded.handle),
            transform: pose.matrix(),
            material: loaded.material,
            tint,
            glow: 0.0,
            deflate: 0.0,
            origin: pose.translation,
        }
    }
}

/// Everything a choreography may read or write besides its own fields.
#[derive(Debug)]
pub struct StageState {
    pub id: StageId,
    pub track: ScrollTrack,
    pub model: ModelSlot,
    pub pose: Pose,
    pub captions: SmallVec<[Caption; 2]>,
    pub viewport: Viewport,
}

impl StageState {
    pub fn caption_mut(&mut self, role: CaptionRole) -> Option<&mut Caption> {
        self.captions.iter_mut().find(|c| c.role == role)
    }

    fn show_title(&mut self) {
        if let Some(c) = self.caption_mut(CaptionRole::Title) {
            c.show();
        }
    }

    fn hide_title(&mut self) {
        if let Some(c) = self.caption_mut(CaptionRole::Title) {
            c.hide();
        }
    }
}

/// Per-kind behaviour plugged into a [`Stage`].
pub trait Choreography {
    /// Wheel input already applied to the track.
    fn on_wheel(&mut self, _st: &mut StageState, _ctx: &mut StageContext) {}
    /// An edge of this stage's own track.
    fn on_transition(&mut self, _st: &mut StageState, _tr: Transition, _ctx: &mut StageContext) {}
    /// A message from anywhere in the chain, after routing.
    fn observe(&mut self, _st: &mut StageState, _msg: &StageMessage, _ctx: &mut StageContext) {}
    fn on_loaded(&mut self, _st: &mut StageState) {}
    fn click(&mut self, _st: &mut StageState, _ray: &Ray, _ctx: &mut StageContext) -> bool {
        false
    }
    fn tick(&mut self, st: &mut StageState, dt_sec: f32, ctx: &mut StageContext);
    fn drawables(&self, st: &StageState, out: &mut Vec<Drawable>);
    fn stop(&mut self) {}
}

#[derive(Debug)]
pub enum Motion {
    Intro(IntroMotion),
    Hoop(HoopMotion),
    Arena(ArenaMotion),
    Final(FinalMotion),
}

impl Motion {
    fn for_stage(id: StageId, seed: u64) -> Self {
        match id {
            StageId::Intro => Motion::Intro(IntroMotion::new()),
            StageId::Hoop => Motion::Hoop(HoopMotion::new()),
            StageId::Arena => Motion::Arena(ArenaMotion::new()),
            StageId::Final => Motion::Final(FinalMotion::new(seed)),
        }
    }

    fn get(&self) -> &dyn Choreography {
        match self {
            Motion::Intro(m) => m,
            Motion::Hoop(m) => m,
            Motion::Arena(m) => m,
            Motion::Final(m) => m,
        }
    }

    fn get_mut(&mut self) -> &mut dyn Choreography {
        match self {
            Motion::Intro(m) => m,
            Motion::Hoop(m) => m,
            Motion::Arena(m) => m,
            Motion::Final(m) => m,
        }
    }
}

#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    state: StageState,
    motion: Motion,
}

impl Stage {
    pub fn new(config: StageConfig, seed: u64) -> Self {
        let mut captions = SmallVec::new();
        if let Some(text) = config.caption {
            captions.push(Caption::new(text, CaptionRole::Title));
        }
        if config.id == StageId::Final {
            captions.push(Caption::new(finale::DEFLATED_MESSAGE, CaptionRole::Message));
        }
        let mut motion = Motion::for_stage(config.id, seed);
        let mut state = StageState {
            id: config.id,
            track: ScrollTrack::new(&config),
            model: ModelSlot::Empty,
            pose: Pose::default(),
            captions,
            viewport: Viewport::default(),
        };
        // settle the initial pose
        let mut scratch = StageContext::new();
        motion.get_mut().tick(&mut state, 0.0, &mut scratch);
        Self {
            config,
            state,
            motion,
        }
    }

    #[inline]
    pub fn id(&self) -> StageId {
        self.state.id
    }
    pub fn config(&self) -> &StageConfig {
        &self.config
    }
    pub fn track(&self) -> &ScrollTrack {
        &self.state.track
    }
    pub fn phase(&self) -> Phase {
        self.state.track.phase()
    }
    pub fn model(&self) -> &ModelSlot {
        &self.state.model
    }
    pub fn pose(&self) -> &Pose {
        &self.state.pose
    }
    pub fn captions(&self) -> &[Caption] {
        &self.state.captions
    }
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn wheel(&mut self, delta_px: f32, ctx: &mut StageContext) {
        if !self.state.track.is_armed() {
            return;
        }
        let out = self.state.track.apply_wheel(delta_px);
        self.dispatch(&out, ctx);
        self.motion.get_mut().on_wheel(&mut self.state, ctx);
    }

    pub fn arm(&mut self, ctx: &mut StageContext) {
        let out = self.state.track.arm();
        self.dispatch(&out, ctx);
    }

    pub fn dismiss(&mut self, ctx: &mut StageContext) {
        let out = self.state.track.dismiss();
        for c in self.state.captions.iter_mut() {
            if c.target() > 0.0 {
                c.hide();
            }
        }
        self.dispatch(&out, ctx);
    }

    pub fn observe(&mut self, msg: &StageMessage, ctx: &mut StageContext) {
        self.motion.get_mut().observe(&mut self.state, msg, ctx);
    }

    /// Offer a pick ray. Returns whether the stage consumed it.
    pub fn click(&mut self, ray: &Ray, ctx: &mut StageContext) -> bool {
        if !self.state.track.is_visible() {
            return false;
        }
        self.motion.get_mut().click(&mut self.state, ray, ctx)
    }

    /// Finish an asynchronous load. Failures leave the stage empty but working.
    pub fn attach_model(&mut self, result: Result<ModelAsset, AssetError>, handle: ModelHandle) -> bool {
        match (&self.state.model, result) {
            (ModelSlot::Disposed, _) => {
                log::debug!("[stage] {} load finished after dispose", self.id());
                false
            }
            (_, Ok(asset)) => {
                log::info!(
                    "[stage] {} model {} ready ({} bytes)",
                    self.id(),
                    asset.name,
                    asset.byte_len
                );
                self.state.model = ModelSlot::Loaded(LoadedModel {
                    asset,
                    handle,
                    material: Material::Standard,
                });
                self.motion.get_mut().on_loaded(&mut self.state);
                true
            }
            (_, Err(e)) => {
                log::error!("[stage] {} model load failed: {}", self.id(), e);
                self.state.model = ModelSlot::Failed;
                false
            }
        }
    }

    pub fn drawables(&self, out: &mut Vec<Drawable>) {
        if matches!(self.state.model, ModelSlot::Disposed) {
            return;
        }
        self.motion.get().drawables(&self.state, out);
    }

    fn dispatch(&mut self, transitions: &Transitions, ctx: &mut StageContext) {
        let id = self.state.id;
        for &tr in transitions.iter() {
            match tr {
                Transition::Armed => log::info!("[stage] {} armed", id),
                Transition::Engaged => log::debug!("[stage] {} engaged", id),
                Transition::Visibility(visible) => {
                    log::info!("[stage] {} {}", id, if visible { "visible" } else { "hidden" });
                    ctx.emit(StageMessage::StageVisibility { stage: id, visible });
                }
                Transition::Effects(active) => {
                    log::info!("[stage] {} effects {}", id, if active { "on" } else { "off" });
                    ctx.emit(StageMessage::EffectsChanged { stage: id, active });
                }
                Transition::Completed => {
                    log::info!("[stage] {} completed", id);
                    ctx.emit(StageMessage::StageCompleted { stage: id });
                }
            }
            self.motion.get_mut().on_transition(&mut self.state, tr, ctx);
        }
    }
}

impl Lifecycle for Stage {
    fn update(&mut self, dt_sec: f32, ctx: &mut StageContext) {
        self.motion.get_mut().tick(&mut self.state, dt_sec, ctx);
        for c in self.state.captions.iter_mut() {
            c.advance(dt_sec);
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    fn dispose(&mut self, releaser: &mut dyn ResourceRelease) {
        if matches!(self.state.model, ModelSlot::Disposed) {
            log::debug!("[stage] {} already disposed", self.id());
            return;
        }
        self.motion.get_mut().stop();
        for c in self.state.captions.iter_mut() {
            c.opacity.set(0.0);
        }
        if let Some(handle) = self.state.model.take_for_dispose() {
            log::info!("[stage] {} released {:?}", self.id(), handle);
            releaser.release(handle);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Default)]
    pub struct CountingReleaser {
        pub released: Vec<ModelHandle>,
    }

    impl ResourceRelease for CountingReleaser {
        fn release(&mut self, handle: ModelHandle) {
            self.released.push(handle);
        }
    }

    pub fn asset(name: &str) -> ModelAsset {
        ModelAsset::from_glb_bytes(name, &crate::asset::glb_fixture(b"{}", &[])).unwrap()
    }

    pub fn drain(ctx: &mut StageContext) -> Vec<StageMessage> {
        std::iter::from_fn(|| ctx.next_message()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::StageConfig;

    #[test]
    fn disarmed_stage_ignores_wheel() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::hoop(), 1);
        let before = stage.pose().translation;
        stage.wheel(5_000.0, &mut ctx);
        assert_eq!(ctx.pending(), 0);
        assert_eq!(stage.track().progress(), 0.0);
        assert_eq!(stage.pose().translation, before);
    }

    #[test]
    fn load_failure_leaves_stage_empty_but_working() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::hoop(), 1);
        let accepted = stage.attach_model(Err(AssetError::TooShort(3)), ModelHandle(1));
        assert!(!accepted);
        assert_eq!(*stage.model(), ModelSlot::Failed);
        stage.arm(&mut ctx);
        stage.wheel(1_600.0, &mut ctx);
        assert!(stage.track().is_visible());
        let mut out = Vec::new();
        stage.drawables(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn dispose_twice_releases_once() {
        let mut stage = Stage::new(StageConfig::arena(), 1);
        stage.attach_model(Ok(asset("court")), ModelHandle(4));
        let mut rel = CountingReleaser::default();
        stage.dispose(&mut rel);
        stage.dispose(&mut rel);
        assert_eq!(rel.released, vec![ModelHandle(4)]);
        assert_eq!(*stage.model(), ModelSlot::Disposed);
    }

    #[test]
    fn late_load_after_dispose_is_rejected() {
        let mut stage = Stage::new(StageConfig::hoop(), 1);
        let mut rel = CountingReleaser::default();
        stage.attach_model(Ok(asset("hoop")), ModelHandle(2));
        stage.dispose(&mut rel);
        assert!(!stage.attach_model(Ok(asset("hoop")), ModelHandle(3)));
        assert_eq!(*stage.model(), ModelSlot::Disposed);
    }

    #[test]
    fn transitions_become_messages() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::hoop(), 1);
        stage.arm(&mut ctx);
        stage.wheel(2_000.0, &mut ctx);
        let msgs = drain(&mut ctx);
        assert_eq!(
            msgs,
            vec![
                StageMessage::EffectsChanged {
                    stage: StageId::Hoop,
                    active: true
                },
                StageMessage::StageVisibility {
                    stage: StageId::Hoop,
                    visible: true
                },
                StageMessage::StageCompleted {
                    stage: StageId::Hoop
                },
            ]
        );
    }

    #[test]
    fn pose_matrix_applies_scale_then_translation() {
        let pose = Pose {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: Vec3::splat(2.0),
        };
        let p = pose.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
