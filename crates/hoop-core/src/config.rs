//! Stage presets and experience-wide settings built from `constants`.

use crate::constants::*;
use crate::message::StageId;

/// How a stage decides it is visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visibility {
    /// Visible while progress is strictly above the threshold.
    Threshold(f32),
    /// On screen from construction; progress never toggles it.
    Always,
    /// Revealed the moment the stage is armed.
    OnArm,
}

/// What it takes for a stage to hand over to its successor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Completion {
    /// Keep scrolling past saturation until `required` extra turns accumulate.
    ExtraRotations { required: f32, rate: f32 },
    /// The stage's own animation decides when it is done.
    Timeline,
    Never,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    pub id: StageId,
    pub sensitivity: f32,
    pub visibility: Visibility,
    pub effects_on: f32,
    pub effects_off: f32,
    pub completion: Completion,
    pub armed_at_start: bool,
    pub asset: Option<&'static str>,
    pub caption: Option<&'static str>,
}

impl StageConfig {
    pub fn intro() -> Self {
        Self {
            id: StageId::Intro,
            sensitivity: TITLE_SENSITIVITY,
            visibility: Visibility::Always,
            effects_on: GLASS_BREAK_THRESHOLD,
            effects_off: EFFECTS_OFF_THRESHOLD,
            completion: Completion::Timeline,
            armed_at_start: true,
            asset: Some("basketball.glb"),
            caption: Some("YOU JUST NEED A BALL"),
        }
    }

    pub fn hoop() -> Self {
        Self {
            id: StageId::Hoop,
            sensitivity: WHEEL_SENSITIVITY,
            visibility: Visibility::Threshold(VISIBLE_THRESHOLD),
            effects_on: EFFECTS_ON_THRESHOLD,
            effects_off: EFFECTS_OFF_THRESHOLD,
            completion: Completion::ExtraRotations {
                required: HOOP_EXTRA_ROTATIONS,
                rate: EXTRA_ROTATION_RATE,
            },
            armed_at_start: false,
            asset: Some("basketBallHoop.glb"),
            caption: Some("PLAY BASKET ON THE STREET"),
        }
    }

    pub fn arena() -> Self {
        Self {
            id: StageId::Arena,
            completion: Completion::ExtraRotations {
                required: ARENA_EXTRA_ROTATIONS,
                rate: EXTRA_ROTATION_RATE,
            },
            asset: Some("basketballCourt.glb"),
            caption: Some("EXPERIENCE THE BIGGEST ARENA"),
            ..Self::hoop()
        }
    }

    pub fn finale() -> Self {
        Self {
            id: StageId::Final,
            sensitivity: 0.0,
            visibility: Visibility::OnArm,
            effects_on: f32::INFINITY,
            effects_off: f32::NEG_INFINITY,
            completion: Completion::Never,
            armed_at_start: false,
            asset: Some("basketball.glb"),
            caption: Some("SHOW ME YOUR SKILLS"),
        }
    }

    pub fn for_stage(id: StageId) -> Self {
        match id {
            StageId::Intro => Self::intro(),
            StageId::Hoop => Self::hoop(),
            StageId::Arena => Self::arena(),
            StageId::Final => Self::finale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositorConfig {
    /// Only this stage's effects messages drive the post chain.
    pub driver: StageId,
    pub rest_intensity: f32,
    pub peak_intensity: f32,
    pub rest_opacity: f32,
    pub peak_opacity: f32,
    pub fade_sec: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
    pub fxaa: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            driver: StageId::Hoop,
            rest_intensity: BLOOM_REST_INTENSITY,
            peak_intensity: BLOOM_PEAK_INTENSITY,
            rest_opacity: EFFECT_REST_OPACITY,
            peak_opacity: EFFECT_PEAK_OPACITY,
            fade_sec: EFFECT_FADE_SEC,
            luminance_threshold: BLOOM_THRESHOLD,
            luminance_smoothing: BLOOM_SMOOTHING,
            vignette_offset: VIGNETTE_OFFSET,
            vignette_darkness: VIGNETTE_DARKNESS,
            fxaa: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceConfig {
    pub stages: [StageConfig; 4],
    pub compositor: CompositorConfig,
    pub asset_root: String,
    /// Seed for the final ball's wander path.
    pub seed: u64,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            stages: StageId::ALL.map(StageConfig::for_stage),
            compositor: CompositorConfig::default(),
            asset_root: "assets/models".to_string(),
            seed: 0x0b5e_55ed,
        }
    }
}

impl ExperienceConfig {
    pub fn stage(&self, id: StageId) -> &StageConfig {
        &self.stages[id.index()]
    }

    pub fn stage_mut(&mut self, id: StageId) -> &mut StageConfig {
        &mut self.stages[id.index()]
    }

    /// Override how many extra turns the arena needs before the finale.
    pub fn set_arena_extra_rotations(&mut self, required: f32) {
        let arena = self.stage_mut(StageId::Arena);
        if let Completion::ExtraRotations { rate, .. } = arena.completion {
            arena.completion = Completion::ExtraRotations {
                required: required.max(0.0),
                rate,
            };
        }
    }

    /// Override wheel sensitivity of the scroll-through stages.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            log::warn!("[config] ignoring sensitivity {}", sensitivity);
            return;
        }
        for id in [StageId::Hoop, StageId::Arena] {
            self.stage_mut(id).sensitivity = sensitivity;
        }
    }

    pub fn asset_url(&self, id: StageId) -> Option<String> {
        let file = self.stage(id).asset?;
        Some(format!("{}/{}", self.asset_root.trim_end_matches('/'), file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_story_order() {
        let cfg = ExperienceConfig::default();
        for id in StageId::ALL {
            assert_eq!(cfg.stage(id).id, id);
        }
        assert!(cfg.stage(StageId::Intro).armed_at_start);
        assert!(!cfg.stage(StageId::Hoop).armed_at_start);
    }

    #[test]
    fn asset_urls_use_the_root() {
        let mut cfg = ExperienceConfig::default();
        assert_eq!(
            cfg.asset_url(StageId::Arena).as_deref(),
            Some("assets/models/basketballCourt.glb")
        );
        cfg.asset_root = "/cdn/".to_string();
        assert_eq!(
            cfg.asset_url(StageId::Hoop).as_deref(),
            Some("/cdn/basketBallHoop.glb")
        );
    }

    #[test]
    fn overrides_apply_to_the_right_stages() {
        let mut cfg = ExperienceConfig::default();
        cfg.set_arena_extra_rotations(3.0);
        assert_eq!(
            cfg.stage(StageId::Arena).completion,
            Completion::ExtraRotations {
                required: 3.0,
                rate: EXTRA_ROTATION_RATE
            }
        );
        cfg.set_sensitivity(-1.0);
        assert_eq!(cfg.stage(StageId::Hoop).sensitivity, WHEEL_SENSITIVITY);
        cfg.set_sensitivity(0.001);
        assert_eq!(cfg.stage(StageId::Arena).sensitivity, 0.001);
        assert_eq!(cfg.stage(StageId::Intro).sensitivity, TITLE_SENSITIVITY);
    }
}
