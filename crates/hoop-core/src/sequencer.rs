//! Drives the stage chain: feeds input to every stage, then routes whatever
//! they emitted.
//!
//! Routing contract:
//! - `StageCompleted { N }` arms stage N+1 and nothing else.
//! - `StageVisibility { visible: true }` hands the camera to that stage; when
//!   the owner hides, the camera falls back to the latest stage still visible.
//! - `HideStage { N }` dismisses stage N for good.
//!
//! Every routed message is then shown to all stages, the compositor and the
//! bus subscribers, and recorded in a bounded history.

use crate::asset::{AssetError, ModelAsset, ModelHandle, ResourceRelease};
use crate::bus::EventBus;
use crate::camera::{CameraPose, Ray, Viewport};
use crate::compositor::{Compositor, PostParams};
use crate::config::ExperienceConfig;
use crate::constants::HISTORY_CAPACITY;
use crate::context::StageContext;
use crate::message::{StageId, StageMessage, Topic};
use crate::stage::{Drawable, Lifecycle, Stage};
use std::collections::VecDeque;

// a full chain emits a handful of messages per event; anything beyond this is a loop
const MAX_ROUTED_PER_DRAIN: usize = 256;

pub struct Sequencer {
    stages: [Stage; 4],
    ctx: StageContext,
    compositor: Compositor,
    bus: EventBus<Topic, StageMessage>,
    history: VecDeque<StageMessage>,
    next_handle: u32,
}

impl Sequencer {
    pub fn new(config: &ExperienceConfig) -> Self {
        let stages = StageId::ALL.map(|id| Stage::new(config.stage(id).clone(), config.seed));
        let mut ctx = StageContext::new();
        let first_visible = stages.iter().find(|s| s.track().is_visible()).map(Stage::id);
        ctx.set_camera_owner(first_visible);
        log::info!("[seq] ready, {} stages", stages.len());
        Self {
            stages,
            ctx,
            compositor: Compositor::new(config.compositor.clone()),
            bus: EventBus::new(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            next_handle: 1,
        }
    }

    /// One normalised wheel event, in pixels.
    pub fn wheel(&mut self, delta_px: f32) {
        for stage in self.stages.iter_mut() {
            stage.wheel(delta_px, &mut self.ctx);
        }
        self.drain();
    }

    /// Offer a world-space pick ray to visible stages, latest first.
    pub fn click(&mut self, ray: &Ray) -> bool {
        let mut hit = false;
        for stage in self.stages.iter_mut().rev() {
            if stage.click(ray, &mut self.ctx) {
                hit = true;
                break;
            }
        }
        self.drain();
        hit
    }

    pub fn update(&mut self, dt_sec: f32) {
        for stage in self.stages.iter_mut() {
            stage.update(dt_sec, &mut self.ctx);
        }
        self.compositor.update(dt_sec, &mut self.ctx);
        self.drain();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.ctx.set_viewport(viewport);
        for stage in self.stages.iter_mut() {
            stage.resize(viewport);
        }
        self.compositor.resize(viewport);
    }

    /// Complete an asynchronous load. Returns the handle bound to the model
    /// when the stage accepted it.
    pub fn attach_model(
        &mut self,
        id: StageId,
        result: Result<ModelAsset, AssetError>,
    ) -> Option<ModelHandle> {
        let handle = ModelHandle(self.next_handle);
        self.next_handle += 1;
        self.stages[id.index()]
            .attach_model(result, handle)
            .then_some(handle)
    }

    pub fn dispose(&mut self, releaser: &mut dyn ResourceRelease) {
        for stage in self.stages.iter_mut() {
            stage.dispose(releaser);
        }
        self.compositor.dispose(releaser);
    }

    fn drain(&mut self) {
        let mut routed = 0;
        while let Some(msg) = self.ctx.next_message() {
            routed += 1;
            if routed > MAX_ROUTED_PER_DRAIN {
                log::error!("[seq] message storm, dropping {:?} and the rest", msg);
                while self.ctx.next_message().is_some() {}
                return;
            }
            self.route(msg);
        }
    }

    fn route(&mut self, msg: StageMessage) {
        log::debug!("[seq] route {:?}", msg);
        match msg {
            StageMessage::StageCompleted { stage } => {
                if let Some(next) = stage.successor() {
                    self.stages[next.index()].arm(&mut self.ctx);
                }
            }
            StageMessage::StageVisibility {
                stage,
                visible: true,
            } => self.ctx.set_camera_owner(Some(stage)),
            StageMessage::StageVisibility {
                stage,
                visible: false,
            } => {
                if self.ctx.camera_owner() == Some(stage) {
                    let fallback = self
                        .stages
                        .iter()
                        .rev()
                        .find(|s| s.id() != stage && s.track().is_visible())
                        .map(Stage::id);
                    self.ctx.set_camera_owner(fallback);
                }
            }
            StageMessage::HideStage { stage } => self.stages[stage.index()].dismiss(&mut self.ctx),
            StageMessage::EffectsChanged { .. } | StageMessage::GlassBreakComplete => {}
        }

        for stage in self.stages.iter_mut() {
            stage.observe(&msg, &mut self.ctx);
        }
        self.compositor.observe(&msg);
        self.bus.publish(msg.topic(), &msg);

        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(msg);
    }

    pub fn stage(&self, id: StageId) -> &Stage {
        &self.stages[id.index()]
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    pub fn is_visible(&self, id: StageId) -> bool {
        self.stage(id).track().is_visible()
    }

    pub fn camera(&self) -> &CameraPose {
        self.ctx.camera()
    }

    pub fn camera_owner(&self) -> Option<StageId> {
        self.ctx.camera_owner()
    }

    pub fn bus_mut(&mut self) -> &mut EventBus<Topic, StageMessage> {
        &mut self.bus
    }

    pub fn history(&self) -> impl Iterator<Item = &StageMessage> {
        self.history.iter()
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn post_params(&self) -> PostParams {
        self.compositor.frame_params()
    }

    /// Everything to draw this frame, in stage order.
    pub fn drawables(&self, out: &mut Vec<Drawable>) {
        out.clear();
        for stage in &self.stages {
            stage.drawables(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_with_only_the_intro_armed() {
        let seq = Sequencer::new(&ExperienceConfig::default());
        assert!(seq.stage(StageId::Intro).track().is_armed());
        for id in [StageId::Hoop, StageId::Arena, StageId::Final] {
            assert!(!seq.stage(id).track().is_armed());
        }
        assert_eq!(seq.camera_owner(), Some(StageId::Intro));
        assert_eq!(seq.history().count(), 0);
    }

    #[test]
    fn bus_sees_routed_messages() {
        let mut seq = Sequencer::new(&ExperienceConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        seq.bus_mut()
            .subscribe(Topic::EffectsChanged, move |m: &StageMessage| s.borrow_mut().push(*m));
        for _ in 0..20 {
            seq.wheel(600.0);
        }
        assert_eq!(
            *seen.borrow(),
            vec![StageMessage::EffectsChanged {
                stage: StageId::Intro,
                active: true
            }]
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut seq = Sequencer::new(&ExperienceConfig::default());
        for i in 0..(HISTORY_CAPACITY * 3) {
            // toggle the glass in and out of its broken band
            seq.wheel(if i % 2 == 0 { 10_000.0 } else { -2_000.0 });
        }
        assert_eq!(seq.history().count(), HISTORY_CAPACITY);
    }
}
