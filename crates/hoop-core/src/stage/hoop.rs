//! Street hoop stage: slides in from the side and rises away on hand-over.

use super::{Choreography, Drawable, MeshKind, StageState, Transition};
use crate::constants::{HOOP_ENTER_X, HOOP_EXIT_RISE, HOOP_EXIT_SEC, HOOP_REST_X, HOOP_SCALE};
use crate::context::StageContext;
use crate::message::{StageId, StageMessage};
use crate::tween::{Ease, Tween};
use glam::Vec3;
use std::f32::consts::TAU;

const HOOP_TINT: [f32; 4] = [0.85, 0.85, 0.9, 1.0];

/// Street hoop sliding in from the right; lifts away once the arena shows.
#[derive(Clone, Debug)]
pub struct HoopMotion {
    lift: Tween,
    scale: Tween,
    arena_visible: bool,
}

impl HoopMotion {
    pub fn new() -> Self {
        Self {
            lift: Tween::new(0.0),
            scale: Tween::new(HOOP_SCALE),
            arena_visible: false,
        }
    }
}

impl Default for HoopMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl Choreography for HoopMotion {
    fn on_transition(&mut self, st: &mut StageState, tr: Transition, _ctx: &mut StageContext) {
        match tr {
            Transition::Visibility(true) if !self.arena_visible => st.show_title(),
            Transition::Visibility(false) => st.hide_title(),
            _ => {}
        }
    }

    fn observe(&mut self, st: &mut StageState, msg: &StageMessage, _ctx: &mut StageContext) {
        let StageMessage::StageVisibility {
            stage: StageId::Arena,
            visible,
        } = *msg
        else {
            return;
        };
        self.arena_visible = visible;
        if visible {
            self.lift.to(HOOP_EXIT_RISE, HOOP_EXIT_SEC, Ease::Power2In);
            self.scale.to(0.0, HOOP_EXIT_SEC, Ease::Power2In);
            st.hide_title();
        } else {
            self.lift.to(0.0, HOOP_EXIT_SEC, Ease::Power2Out);
            self.scale.to(HOOP_SCALE, HOOP_EXIT_SEC, Ease::Power2Out);
            if st.track.is_visible() {
                st.show_title();
            }
        }
    }

    fn tick(&mut self, st: &mut StageState, dt_sec: f32, _ctx: &mut StageContext) {
        let mp = st.track.model_progress();
        let y = self.lift.advance(dt_sec);
        let s = self.scale.advance(dt_sec);
        st.pose.translation = Vec3::new(HOOP_ENTER_X * (1.0 - mp) + HOOP_REST_X * mp, y, 0.0);
        st.pose.rotation.y = TAU * mp;
        st.pose.scale = Vec3::splat(s);
    }

    fn drawables(&self, st: &StageState, out: &mut Vec<Drawable>) {
        if !st.track.is_visible() || st.pose.scale.x <= 1e-3 {
            return;
        }
        if let Some(loaded) = st.model.loaded() {
            out.push(Drawable::model(MeshKind::Hoop, loaded, &st.pose, HOOP_TINT));
        }
    }

    fn stop(&mut self) {
        self.lift.kill();
        self.scale.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use crate::stage::{Lifecycle, Stage};

    fn shown_hoop(ctx: &mut StageContext) -> Stage {
        let mut stage = Stage::new(StageConfig::hoop(), 1);
        stage.arm(ctx);
        stage.wheel(1_700.0, ctx); // progress 0.85
        stage.update(0.0, ctx);
        stage
    }

    #[test]
    fn model_slides_from_right_to_rest() {
        let mut ctx = StageContext::new();
        let stage = Stage::new(StageConfig::hoop(), 1);
        assert_eq!(stage.pose().translation.x, HOOP_ENTER_X);

        let mut stage = shown_hoop(&mut ctx);
        let x = stage.pose().translation.x;
        assert!((x - 6.0).abs() < 1e-2, "halfway between 10 and 2, got {x}");
        assert!((stage.pose().rotation.y - std::f32::consts::PI).abs() < 1e-2);

        stage.wheel(1_000.0, &mut ctx);
        stage.update(0.0, &mut ctx);
        assert_eq!(stage.pose().translation.x, HOOP_REST_X);
        assert_eq!(stage.pose().scale, Vec3::splat(HOOP_SCALE));
    }

    #[test]
    fn arena_visibility_lifts_the_hoop_away() {
        let mut ctx = StageContext::new();
        let mut stage = shown_hoop(&mut ctx);
        stage.update(1.0, &mut ctx);
        assert!((stage.captions()[0].opacity() - 1.0).abs() < 1e-3);

        let arena = StageMessage::StageVisibility {
            stage: StageId::Arena,
            visible: true,
        };
        stage.observe(&arena, &mut ctx);
        stage.update(HOOP_EXIT_SEC, &mut ctx);
        assert_eq!(stage.pose().translation.y, HOOP_EXIT_RISE);
        assert_eq!(stage.pose().scale, Vec3::ZERO);
        assert!(stage.captions()[0].opacity() < 1e-3);
        let mut out = Vec::new();
        stage.drawables(&mut out);
        assert!(out.is_empty());

        let gone = StageMessage::StageVisibility {
            stage: StageId::Arena,
            visible: false,
        };
        stage.observe(&gone, &mut ctx);
        stage.update(HOOP_EXIT_SEC, &mut ctx);
        assert_eq!(stage.pose().translation.y, 0.0);
        assert_eq!(stage.pose().scale, Vec3::splat(HOOP_SCALE));
    }
}
