//! Opening stage: glass title zoom, ball dive, rebound loop.

use super::{Choreography, Drawable, MeshKind, StageState, Transition};
use crate::constants::*;
use crate::context::StageContext;
use crate::message::{StageId, StageMessage};
use crate::tween::{Ease, Tween};
use glam::Vec3;
use std::f32::consts::PI;

const BALL_TINT: [f32; 4] = [0.93, 0.42, 0.12, 1.0];
const FLOOR_TINT: [f32; 4] = [0.62, 0.22, 0.05, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    Dive,
    Return,
    Caption,
    Handover,
    Done,
}

#[derive(Clone, Debug)]
struct Rebound {
    rest: Vec3,
    elapsed: f32,
    bounces: u32,
}

#[derive(Clone, Debug)]
pub struct IntroMotion {
    /// Seconds since the glass first broke. Healing does not reset it.
    glass_hold: Option<f32>,
    broken: bool,
    /// Seconds since the ball timeline started.
    timeline: Option<f32>,
    cue: Cue,
    x: Tween,
    z: Tween,
    scale: Tween,
    spin: f32,
    rebound: Option<Rebound>,
    paused: bool,
    flash: Tween,
    flash_origin: Vec3,
}

impl IntroMotion {
    pub fn new() -> Self {
        Self {
            glass_hold: None,
            broken: false,
            timeline: None,
            cue: Cue::Dive,
            x: Tween::new(0.0),
            z: Tween::new(0.0),
            scale: Tween::new(BALL_LOAD_SCALE),
            spin: 0.0,
            rebound: None,
            paused: false,
            flash: Tween::new(0.0),
            flash_origin: Vec3::ZERO,
        }
    }

    pub fn glass_broken(&self) -> bool {
        self.broken || self.timeline.is_some()
    }

    pub fn timeline_started(&self) -> bool {
        self.timeline.is_some()
    }

    pub fn is_rebounding(&self) -> bool {
        self.rebound.is_some() && !self.paused
    }

    pub fn floor_flash(&self) -> f32 {
        self.flash.value()
    }

    fn start_timeline(&mut self, st: &mut StageState, ctx: &mut StageContext) {
        log::info!("[intro] glass break complete, ball drops");
        ctx.emit(StageMessage::GlassBreakComplete);
        st.track.disarm();
        self.glass_hold = None;
        self.timeline = Some(0.0);
        self.cue = Cue::Dive;
    }

    fn run_cues(&mut self, st: &mut StageState, t: f32, ctx: &mut StageContext) {
        let rest = Vec3::from_array(BALL_REST);
        loop {
            match self.cue {
                Cue::Dive => {
                    self.z.to(BALL_DIVE_Z, BALL_DIVE_SEC, Ease::Power2In);
                    self.cue = Cue::Return;
                }
                Cue::Return if t >= BALL_DIVE_SEC => {
                    self.z.to(rest.z, BALL_RETURN_SEC, Ease::BounceOut);
                    self.x.to(rest.x, BALL_RETURN_SEC, Ease::BounceOut);
                    self.scale.to(1.0, BALL_SHRINK_SEC, Ease::Power2Out);
                    self.cue = Cue::Caption;
                }
                Cue::Caption if t >= BALL_CAPTION_AT_SEC => {
                    st.show_title();
                    self.cue = Cue::Handover;
                }
                Cue::Handover if t >= BALL_DIVE_SEC + BALL_RETURN_SEC => {
                    if st.track.complete() {
                        log::info!("[stage] intro completed");
                        ctx.emit(StageMessage::StageCompleted {
                            stage: StageId::Intro,
                        });
                    }
                    self.rebound = Some(Rebound {
                        rest,
                        elapsed: 0.0,
                        bounces: 0,
                    });
                    self.flash.set(0.0);
                    self.cue = Cue::Done;
                }
                _ => break,
            }
        }
    }

    fn slide_out(&mut self, st: &mut StageState) {
        self.x.to(BALL_SLIDE_X, BALL_SLIDE_SEC, Ease::Power2In);
        self.scale.to(BALL_SLIDE_SCALE, BALL_SLIDE_SEC, Ease::Power2In);
        self.flash.to(0.0, FLOOR_FLASH_CUT_SEC, Ease::Linear);
        self.paused = true;
        st.hide_title();
    }

    fn slide_in(&mut self, st: &mut StageState) {
        self.x.to(BALL_REST[0], BALL_SLIDE_SEC, Ease::Power2Out);
        self.scale.to(1.0, BALL_SLIDE_SEC, Ease::Power2Out);
        self.paused = false;
        if !st.track.is_dismissed() {
            st.show_title();
        }
    }
}

impl Default for IntroMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl Choreography for IntroMotion {
    fn on_transition(&mut self, _st: &mut StageState, tr: Transition, _ctx: &mut StageContext) {
        if self.timeline.is_some() {
            return;
        }
        match tr {
            Transition::Effects(true) => {
                log::info!("[intro] glass broken");
                self.broken = true;
                self.glass_hold.get_or_insert(0.0);
            }
            Transition::Effects(false) => {
                log::info!("[intro] glass healed");
                self.broken = false;
            }
            _ => {}
        }
    }

    fn observe(&mut self, st: &mut StageState, msg: &StageMessage, _ctx: &mut StageContext) {
        if let StageMessage::StageVisibility {
            stage: StageId::Hoop,
            visible,
        } = *msg
        {
            if visible {
                self.slide_out(st);
            } else {
                self.slide_in(st);
            }
        }
    }

    fn tick(&mut self, st: &mut StageState, dt_sec: f32, ctx: &mut StageContext) {
        if let Some(held) = self.glass_hold.as_mut() {
            *held += dt_sec;
            if *held >= GLASS_HOLD_SEC {
                self.start_timeline(st, ctx);
            }
        }

        if let Some(t) = self.timeline.as_mut() {
            *t += dt_sec;
            let t = *t;
            self.run_cues(st, t, ctx);
        } else {
            self.spin += BALL_IDLE_SPIN * dt_sec;
        }

        let x = self.x.advance(dt_sec);
        let z = self.z.advance(dt_sec);
        let scale = self.scale.advance(dt_sec);
        self.flash.advance(dt_sec);

        let mut y = 0.0;
        if let Some(r) = self.rebound.as_mut() {
            y = r.rest.y;
            if !self.paused {
                r.elapsed += dt_sec;
                let bounce = (r.elapsed / BOUNCE_PERIOD_SEC).floor() as u32;
                if bounce > r.bounces {
                    r.bounces = bounce;
                    self.flash.set(FLOOR_FLASH_INTENSITY);
                    self.flash.to(0.0, FLOOR_FLASH_DECAY_SEC, Ease::Power1Out);
                    self.flash_origin = Vec3::new(x, FLOOR_Y, z);
                }
                let phase = (r.elapsed % BOUNCE_PERIOD_SEC) / BOUNCE_PERIOD_SEC;
                let amplitude = (1.0 - bounce as f32 * BOUNCE_DECAY_PER_BOUNCE).max(BOUNCE_MIN_AMPLITUDE);
                y += (phase * PI).sin().abs() * BOUNCE_MAX_HEIGHT * amplitude;
            }
        }

        st.pose.translation = Vec3::new(x, y, z);
        st.pose.rotation.y = self.spin;
        st.pose.scale = Vec3::splat(scale);
    }

    fn drawables(&self, st: &StageState, out: &mut Vec<Drawable>) {
        if !st.track.is_visible() {
            return;
        }
        if let Some(loaded) = st.model.loaded() {
            out.push(Drawable::model(MeshKind::Ball, loaded, &st.pose, BALL_TINT));
        }
        if self.timeline.is_some() {
            let floor = super::Pose {
                translation: Vec3::new(-1.0, FLOOR_Y, st.pose.translation.z),
                rotation: Vec3::ZERO,
                scale: Vec3::new(30.0, 1.0, 30.0),
            };
            out.push(Drawable {
                mesh: MeshKind::Floor,
                handle: None,
                transform: floor.matrix(),
                material: crate::asset::Material::Emissive,
                tint: FLOOR_TINT,
                glow: self.flash.value(),
                deflate: 0.0,
                origin: self.flash_origin,
            });
        }
    }

    fn stop(&mut self) {
        self.x.kill();
        self.z.kill();
        self.scale.kill();
        self.flash.set(0.0);
        self.rebound = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use crate::stage::testing::drain;
    use crate::stage::{Lifecycle, Stage};

    fn step(stage: &mut Stage, ctx: &mut StageContext, secs: f32) {
        let frames = (secs * 60.0).round() as usize;
        for _ in 0..frames {
            stage.update(1.0 / 60.0, ctx);
        }
    }

    fn intro(stage: &Stage) -> &IntroMotion {
        match stage.motion() {
            crate::stage::Motion::Intro(m) => m,
            _ => unreachable!(),
        }
    }

    fn break_glass(stage: &mut Stage, ctx: &mut StageContext) {
        for _ in 0..20 {
            stage.wheel(600.0, ctx);
        }
    }

    #[test]
    fn ball_idles_before_the_glass_breaks() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::intro(), 1);
        step(&mut stage, &mut ctx, 1.0);
        assert!((stage.pose().rotation.y - BALL_IDLE_SPIN).abs() < 1e-3);
        assert_eq!(stage.pose().scale, Vec3::splat(BALL_LOAD_SCALE));
        assert!(drain(&mut ctx).is_empty());
    }

    #[test]
    fn healing_the_glass_keeps_the_drop_on_schedule() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::intro(), 1);
        break_glass(&mut stage, &mut ctx);
        assert!(intro(&stage).glass_broken());
        drain(&mut ctx);
        step(&mut stage, &mut ctx, 1.0);
        stage.wheel(-2_000.0, &mut ctx);
        assert!(!intro(&stage).glass_broken());

        // breaking again does not restart the clock
        break_glass(&mut stage, &mut ctx);
        step(&mut stage, &mut ctx, GLASS_HOLD_SEC - 1.0 + 0.05);
        assert!(drain(&mut ctx).contains(&StageMessage::GlassBreakComplete));
        assert!(intro(&stage).timeline_started());
        assert!(!stage.track().is_armed());
    }

    #[test]
    fn timeline_hands_over_after_the_bounce_back() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::intro(), 1);
        break_glass(&mut stage, &mut ctx);
        drain(&mut ctx);

        step(&mut stage, &mut ctx, GLASS_HOLD_SEC + 0.05);
        assert_eq!(drain(&mut ctx), vec![StageMessage::GlassBreakComplete]);
        assert!(!stage.track().is_armed());

        step(&mut stage, &mut ctx, 1.0);
        assert!(stage.pose().translation.z < -1.0, "ball is diving");

        step(&mut stage, &mut ctx, 2.2);
        assert_eq!(
            drain(&mut ctx),
            vec![StageMessage::StageCompleted {
                stage: StageId::Intro
            }]
        );
        assert!(stage.track().is_completed());
        assert!((stage.captions()[0].opacity() - 1.0).abs() < 1e-3);
        assert!(intro(&stage).is_rebounding());
    }

    #[test]
    fn every_bounce_flashes_the_floor() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::intro(), 1);
        break_glass(&mut stage, &mut ctx);
        step(&mut stage, &mut ctx, GLASS_HOLD_SEC + BALL_DIVE_SEC + BALL_RETURN_SEC + 0.1);
        assert!(intro(&stage).floor_flash() < 1e-3);
        step(&mut stage, &mut ctx, BOUNCE_PERIOD_SEC);
        assert!(intro(&stage).floor_flash() > 1.0);
    }

    #[test]
    fn hoop_visibility_slides_the_ball_out_and_back() {
        let mut ctx = StageContext::new();
        let mut stage = Stage::new(StageConfig::intro(), 1);
        break_glass(&mut stage, &mut ctx);
        step(&mut stage, &mut ctx, 6.0);
        let shown = StageMessage::StageVisibility {
            stage: StageId::Hoop,
            visible: true,
        };
        stage.observe(&shown, &mut ctx);
        step(&mut stage, &mut ctx, 1.0);
        assert!((stage.pose().translation.x - BALL_SLIDE_X).abs() < 1e-3);
        assert!(!intro(&stage).is_rebounding());
        assert!(stage.captions()[0].opacity() < 1e-3);

        let hidden = StageMessage::StageVisibility {
            stage: StageId::Hoop,
            visible: false,
        };
        stage.observe(&hidden, &mut ctx);
        step(&mut stage, &mut ctx, 1.0);
        assert!((stage.pose().translation.x - BALL_REST[0]).abs() < 1e-3);
        assert!(intro(&stage).is_rebounding());
    }
}
