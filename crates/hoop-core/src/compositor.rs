//! Post-processing parameters shared by the whole frame.
//!
//! Bloom strength and effect opacity rest low and rise while the driving
//! stage is in its effects band.

use crate::asset::ResourceRelease;
use crate::camera::Viewport;
use crate::config::CompositorConfig;
use crate::context::StageContext;
use crate::message::StageMessage;
use crate::stage::Lifecycle;
use crate::tween::{Ease, Tween};

/// Values consumed by the post pass each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostParams {
    pub bloom_intensity: f32,
    pub bloom_opacity: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub vignette_opacity: f32,
    pub fxaa: bool,
}

#[derive(Debug)]
pub struct Compositor {
    config: CompositorConfig,
    intensity: Tween,
    opacity: Tween,
    active: bool,
    viewport: Viewport,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            intensity: Tween::new(config.rest_intensity),
            opacity: Tween::new(config.rest_opacity),
            active: false,
            viewport: Viewport::default(),
            config,
        }
    }

    /// React to a routed message. Returns whether it changed the target state.
    pub fn observe(&mut self, msg: &StageMessage) -> bool {
        let StageMessage::EffectsChanged { stage, active } = *msg else {
            return false;
        };
        if stage != self.config.driver || active == self.active {
            return false;
        }
        self.active = active;
        let c = &self.config;
        if active {
            self.intensity.to(c.peak_intensity, c.fade_sec, Ease::Power2Out);
            self.opacity.to(c.peak_opacity, c.fade_sec, Ease::Power2Out);
        } else {
            self.intensity.to(c.rest_intensity, c.fade_sec, Ease::Power2In);
            self.opacity.to(c.rest_opacity, c.fade_sec, Ease::Power2In);
        }
        log::debug!("[post] effects {}", if active { "up" } else { "down" });
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_params(&self) -> PostParams {
        PostParams {
            bloom_intensity: self.intensity.value(),
            bloom_opacity: self.opacity.value(),
            luminance_threshold: self.config.luminance_threshold,
            luminance_smoothing: self.config.luminance_smoothing,
            vignette_offset: self.config.vignette_offset,
            vignette_darkness: self.config.vignette_darkness,
            vignette_opacity: self.opacity.value(),
            fxaa: self.config.fxaa,
        }
    }
}

impl Lifecycle for Compositor {
    fn update(&mut self, dt_sec: f32, _ctx: &mut StageContext) {
        self.intensity.advance(dt_sec);
        self.opacity.advance(dt_sec);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn dispose(&mut self, _releaser: &mut dyn ResourceRelease) {
        self.intensity.kill();
        self.opacity.kill();
    }
}
