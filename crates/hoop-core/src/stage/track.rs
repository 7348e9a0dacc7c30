//! Scroll progress accumulator shared by every stage.

use crate::config::{Completion, StageConfig, Visibility};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the predecessor to complete.
    Dormant,
    /// Armed, no wheel input seen yet.
    Arming,
    Active,
    Visible,
    Saturated,
    Completed,
}

/// Edge produced by a single input or command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Armed,
    Engaged,
    Visibility(bool),
    Effects(bool),
    Completed,
}

pub type Transitions = SmallVec<[Transition; 4]>;

#[derive(Clone, Debug)]
pub struct ScrollTrack {
    sensitivity: f32,
    visibility: Visibility,
    effects_on: f32,
    effects_off: f32,
    completion: Completion,

    progress: f32,
    armed: bool,
    engaged: bool,
    visible: bool,
    effects_active: bool,
    extra_rotations: f32,
    completed: bool,
    dismissed: bool,
}

impl ScrollTrack {
    pub fn new(cfg: &StageConfig) -> Self {
        Self {
            sensitivity: cfg.sensitivity,
            visibility: cfg.visibility,
            effects_on: cfg.effects_on,
            effects_off: cfg.effects_off,
            completion: cfg.completion,
            progress: 0.0,
            armed: cfg.armed_at_start,
            engaged: false,
            visible: matches!(cfg.visibility, Visibility::Always),
            effects_active: false,
            extra_rotations: 0.0,
            completed: false,
            dismissed: false,
        }
    }

    /// Feed one wheel event. A disarmed track ignores input entirely.
    ///
    /// Below saturation the scaled delta moves `progress`. On stages that
    /// complete through extra rotations, once `progress == 1` input in either
    /// direction feeds `extra_rotations` instead and progress stays pinned.
    pub fn apply_wheel(&mut self, delta_px: f32) -> Transitions {
        let mut out = Transitions::new();
        if !self.armed || !delta_px.is_finite() {
            return out;
        }
        if !self.engaged {
            self.engaged = true;
            out.push(Transition::Engaged);
        }

        let step = delta_px * self.sensitivity;
        match self.completion {
            Completion::ExtraRotations { rate, .. } if self.progress >= 1.0 => {
                self.extra_rotations += step.abs() * rate;
            }
            _ => self.progress = (self.progress + step).clamp(0.0, 1.0),
        }

        self.evaluate(&mut out);
        out
    }

    fn evaluate(&mut self, out: &mut Transitions) {
        if self.progress >= self.effects_on && !self.effects_active {
            self.effects_active = true;
            out.push(Transition::Effects(true));
        } else if self.progress < self.effects_off && self.effects_active {
            self.effects_active = false;
            out.push(Transition::Effects(false));
        }

        if let Visibility::Threshold(threshold) = self.visibility {
            let visible = self.progress > threshold;
            if visible != self.visible {
                self.visible = visible;
                out.push(Transition::Visibility(visible));
            }
        }

        if let Completion::ExtraRotations { required, .. } = self.completion {
            if self.progress >= 1.0 && self.extra_rotations >= required {
                self.completed = true;
                self.armed = false;
                out.push(Transition::Completed);
            }
        }
    }

    /// Accept wheel input from now on. No-op once armed, completed or dismissed.
    pub fn arm(&mut self) -> Transitions {
        let mut out = Transitions::new();
        if self.armed || self.completed || self.dismissed {
            return out;
        }
        self.armed = true;
        out.push(Transition::Armed);
        if matches!(self.visibility, Visibility::OnArm) && !self.visible {
            self.visible = true;
            out.push(Transition::Visibility(true));
        }
        out
    }

    /// Stop consuming wheel input without completing.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Complete a timeline-driven stage. Returns `true` only the first time.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.armed = false;
        true
    }

    /// Force the stage out of view for good.
    pub fn dismiss(&mut self) -> Transitions {
        let mut out = Transitions::new();
        if self.dismissed {
            return out;
        }
        self.dismissed = true;
        self.armed = false;
        if self.visible {
            self.visible = false;
            out.push(Transition::Visibility(false));
        }
        out
    }

    pub fn phase(&self) -> Phase {
        if self.completed {
            Phase::Completed
        } else if !self.engaged {
            if self.armed {
                Phase::Arming
            } else {
                Phase::Dormant
            }
        } else if self.progress >= 1.0 {
            Phase::Saturated
        } else if self.visible {
            Phase::Visible
        } else {
            Phase::Active
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Progress remapped so 0 is the visibility threshold and 1 is saturation.
    pub fn model_progress(&self) -> f32 {
        let threshold = match self.visibility {
            Visibility::Threshold(t) => t,
            _ => 0.0,
        };
        if self.progress <= threshold {
            0.0
        } else {
            ((self.progress - threshold) / (1.0 - threshold).max(f32::EPSILON)).min(1.0)
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    #[inline]
    pub fn effects_active(&self) -> bool {
        self.effects_active
    }
    #[inline]
    pub fn extra_rotations(&self) -> f32 {
        self.extra_rotations
    }
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }
    #[inline]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WHEEL_SENSITIVITY;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn armed(cfg: StageConfig) -> ScrollTrack {
        let mut t = ScrollTrack::new(&cfg);
        t.arm();
        t
    }

    // delta in pixels that moves progress by `p`
    fn px(p: f32) -> f32 {
        p / WHEEL_SENSITIVITY
    }

    #[test]
    fn progress_stays_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut t = armed(StageConfig::arena());
        for _ in 0..5_000 {
            t.apply_wheel(rng.gen_range(-900.0..900.0));
            assert!((0.0..=1.0).contains(&t.progress()));
        }
    }

    #[test]
    fn disarmed_track_ignores_input() {
        let mut t = ScrollTrack::new(&StageConfig::hoop());
        assert_eq!(t.phase(), Phase::Dormant);
        assert!(t.apply_wheel(px(0.9)).is_empty());
        assert_eq!(t.progress(), 0.0);
        assert_eq!(t.phase(), Phase::Dormant);
        assert!(!t.is_visible());
    }

    #[test]
    fn first_wheel_engages() {
        let mut t = armed(StageConfig::hoop());
        assert_eq!(t.phase(), Phase::Arming);
        let out = t.apply_wheel(px(0.1));
        assert_eq!(out.as_slice(), &[Transition::Engaged]);
        assert_eq!(t.phase(), Phase::Active);
    }

    #[test]
    fn visibility_tracks_threshold_without_hysteresis() {
        let mut t = armed(StageConfig::hoop());
        t.apply_wheel(px(0.69));
        assert!(!t.is_visible());
        let out = t.apply_wheel(px(0.02));
        assert!(out.contains(&Transition::Visibility(true)));
        assert_eq!(t.phase(), Phase::Visible);
        let out = t.apply_wheel(-px(0.03));
        assert!(out.contains(&Transition::Visibility(false)));
        assert!(!t.is_visible());
    }

    #[test]
    fn effects_band_has_hysteresis() {
        let mut t = armed(StageConfig::arena());
        t.apply_wheel(px(0.94));
        assert!(!t.effects_active());
        let out = t.apply_wheel(px(0.02));
        assert!(out.contains(&Transition::Effects(true)));
        // inside the band: stays on
        let out = t.apply_wheel(-px(0.05));
        assert!(t.effects_active());
        assert!(!out.iter().any(|tr| matches!(tr, Transition::Effects(_))));
        let out = t.apply_wheel(-px(0.03));
        assert!(out.contains(&Transition::Effects(false)));
        assert!(!t.effects_active());
    }

    #[test]
    fn saturation_requires_extra_rotations() {
        let mut t = armed(StageConfig::arena());
        for _ in 0..30 {
            t.apply_wheel(100.0);
        }
        assert_eq!(t.progress(), 1.0);
        assert!(t.is_visible());
        assert!(!t.is_completed());
        assert_eq!(t.phase(), Phase::Saturated);
        assert!(t.extra_rotations() > 0.0);

        // 1 extra turn at rate 0.2 needs 5 units of progress worth of input
        let mut completions = 0;
        for _ in 0..20_000 {
            let out = t.apply_wheel(100.0);
            completions += out.iter().filter(|tr| **tr == Transition::Completed).count();
        }
        assert_eq!(completions, 1);
        assert!(t.is_completed());
        assert!(!t.is_armed());
        let frozen = t.extra_rotations();
        t.apply_wheel(100.0);
        assert_eq!(t.extra_rotations(), frozen);
    }

    #[test]
    fn reverse_input_at_saturation_still_counts_rotations() {
        let mut t = armed(StageConfig::arena());
        t.apply_wheel(px(1.5));
        assert_eq!(t.progress(), 1.0);
        let extra = t.extra_rotations();
        t.apply_wheel(-px(0.1));
        assert_eq!(t.progress(), 1.0);
        assert!((t.extra_rotations() - extra - 0.1 * 0.2).abs() < 1e-5);
        assert_eq!(t.phase(), Phase::Saturated);
    }

    #[test]
    fn zero_requirement_completes_on_saturation() {
        let mut t = armed(StageConfig::hoop());
        let out = t.apply_wheel(px(1.2));
        assert!(out.contains(&Transition::Completed));
        assert_eq!(t.phase(), Phase::Completed);
    }

    #[test]
    fn arm_on_reveal_stage_becomes_visible() {
        let mut t = ScrollTrack::new(&StageConfig::finale());
        let out = t.arm();
        assert_eq!(
            out.as_slice(),
            &[Transition::Armed, Transition::Visibility(true)]
        );
        assert!(t.arm().is_empty());
    }

    #[test]
    fn dismissed_stage_cannot_rearm() {
        let mut t = armed(StageConfig::hoop());
        t.apply_wheel(px(0.8));
        let out = t.dismiss();
        assert_eq!(out.as_slice(), &[Transition::Visibility(false)]);
        assert!(t.arm().is_empty());
        assert!(t.apply_wheel(px(0.5)).is_empty());
        assert!(t.dismiss().is_empty());
    }

    #[test]
    fn timeline_completion_fires_once() {
        let mut t = ScrollTrack::new(&StageConfig::intro());
        assert!(t.is_visible());
        assert!(t.complete());
        assert!(!t.complete());
    }

    #[test]
    fn model_progress_maps_threshold_to_zero() {
        let mut t = armed(StageConfig::hoop());
        t.apply_wheel(px(0.6));
        assert_eq!(t.model_progress(), 0.0);
        t.apply_wheel(px(0.25));
        assert!((t.model_progress() - 0.5).abs() < 1e-3);
    }
}
