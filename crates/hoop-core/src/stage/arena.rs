//! Arena stage: the court turns with scroll and needs extra spins to finish.

use super::{Choreography, Drawable, MeshKind, StageState, Transition};
use crate::constants::*;
use crate::context::StageContext;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

const ARENA_TINT: [f32; 4] = [0.55, 0.35, 0.22, 1.0];

/// Court rising from below; pulls the camera inside near the end of its range.
#[derive(Clone, Debug, Default)]
pub struct ArenaMotion {
    spin: f32,
    /// Camera pitch when the arena armed; the pull aims a quarter turn above it.
    base_pitch: Option<f32>,
}

impl ArenaMotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }
}

impl Choreography for ArenaMotion {
    fn on_wheel(&mut self, st: &mut StageState, ctx: &mut StageContext) {
        let mp = st.track.model_progress();
        if mp <= ARENA_CAMERA_START {
            return;
        }
        let base = *self.base_pitch.get_or_insert(ctx.camera().pitch);
        let Some(cam) = ctx.camera_mut(st.id) else {
            return;
        };
        let k = (mp - ARENA_CAMERA_START) / (1.0 - ARENA_CAMERA_START) * ARENA_CAMERA_PULL;
        let focus = Vec3::from_array(ARENA_CAMERA_FOCUS);
        cam.eye += (focus - cam.eye) * k;
        let pitch = cam.pitch + (base + FRAC_PI_4 - cam.pitch) * k;
        cam.set_pitch(pitch);
    }

    fn on_transition(&mut self, st: &mut StageState, tr: Transition, _ctx: &mut StageContext) {
        match tr {
            Transition::Visibility(true) => st.show_title(),
            Transition::Visibility(false) => st.hide_title(),
            _ => {}
        }
    }

    fn tick(&mut self, st: &mut StageState, dt_sec: f32, _ctx: &mut StageContext) {
        if st.track.is_visible() {
            self.spin += ARENA_IDLE_SPIN * dt_sec;
            if st.track.progress() >= EFFECTS_ON_THRESHOLD {
                self.spin += ARENA_BOOST_SPIN * dt_sec;
            }
        }
        let mp = st.track.model_progress();
        st.pose.translation = Vec3::new(0.0, ARENA_BASE_Y + ARENA_RISE * mp, ARENA_DEPTH);
        st.pose.rotation.y = FRAC_PI_2 * mp + TAU * st.track.extra_rotations() + self.spin;
        st.pose.scale = Vec3::splat(ARENA_SCALE);
    }

    fn drawables(&self, st: &StageState, out: &mut Vec<Drawable>) {
        if !st.track.is_visible() {
            return;
        }
        if let Some(loaded) = st.model.loaded() {
            let mut d = Drawable::model(MeshKind::Arena, loaded, &st.pose, ARENA_TINT);
            d.glow = ARENA_GLOW;
            out.push(d);
        }
    }
}
