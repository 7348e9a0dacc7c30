//! Closing stage: the interactive ball that wanders until it gets popped.

use super::{CaptionRole, Choreography, Drawable, MeshKind, StageState, Transition};
use crate::asset::Material;
use crate::camera::{ray_sphere, Ray};
use crate::constants::*;
use crate::context::StageContext;
use crate::message::{StageId, StageMessage};
use crate::tween::{Ease, Tween};
use glam::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const DEFLATED_MESSAGE: &str = "What did this beautiful ball ever do to you...";

const BALL_TINT: [f32; 4] = [0.93, 0.42, 0.12, 1.0];
const PARTICLE_TINT: [f32; 4] = [1.0, 0.55, 0.2, 1.0];
const WANDER_EASES: [Ease; 5] = [
    Ease::Power1InOut,
    Ease::Power2Out,
    Ease::BackOut(1.2),
    Ease::CircOut,
    Ease::SineInOut,
];
const REFERENCE_ASPECT: f32 = 16.0 / 9.0;
const SHAKE_LEGS: u32 = 6;
const SHAKE_OFFSET: Vec3 = Vec3::new(0.25, 0.15, 0.0);
const LANDING_BOUNCE_Y: f32 = -0.92;
const LANDING_BOUNCE_SEC: f32 = 0.3;
const WOBBLE_ABOVE_Y: f32 = -0.7;

#[derive(Clone, Debug)]
struct Leg {
    to: Vec3,
    duration: f32,
    ease: Ease,
    tilt: Vec2,
}

#[derive(Clone, Debug)]
struct Flight {
    from: Vec3,
    to: Vec3,
    t: Tween,
}

#[derive(Clone, Debug)]
struct Particle {
    origin: Vec3,
    target: Vec3,
    size: f32,
    age: f32,
    span: f32,
}

impl Particle {
    fn progress(&self) -> f32 {
        (self.age / self.span).min(1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landing {
    Falling,
    Rebounding,
    Settling,
    Rested,
}

#[derive(Clone, Debug)]
struct Deflation {
    elapsed: f32,
    anchor: Vec3,
    jitter: Vec3,
    amount: Tween,
    collapsing: bool,
    height: Tween,
    landing: Landing,
    squash: Option<Tween>,
    message_shown: bool,
}

#[derive(Debug)]
pub struct FinalMotion {
    rng: StdRng,
    revealed: bool,
    flight: Option<Flight>,
    legs: VecDeque<Leg>,
    leg_from: Vec3,
    leg_to: Vec3,
    leg_t: Tween,
    position: Vec3,
    tilt_x: Tween,
    tilt_z: Tween,
    spin: f32,
    deflation: Option<Deflation>,
    particles: Vec<Particle>,
}

impl FinalMotion {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            revealed: false,
            flight: None,
            legs: VecDeque::new(),
            leg_from: Vec3::ZERO,
            leg_to: Vec3::ZERO,
            leg_t: Tween::new(1.0),
            position: Vec3::ZERO,
            tilt_x: Tween::new(0.0),
            tilt_z: Tween::new(0.0),
            spin: 0.0,
            deflation: None,
            particles: Vec::new(),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_deflated(&self) -> bool {
        self.deflation.is_some()
    }

    pub fn deflate_amount(&self) -> f32 {
        self.deflation.as_ref().map(|d| d.amount.value()).unwrap_or(0.0)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn reveal(&mut self, st: &mut StageState, ctx: &mut StageContext) {
        if self.revealed {
            return;
        }
        self.revealed = true;
        for stage in [StageId::Intro, StageId::Hoop, StageId::Arena] {
            ctx.emit(StageMessage::HideStage { stage });
        }
        let mut t = Tween::new(0.0);
        t.to(1.0, FINAL_CAMERA_SEC, Ease::Power2InOut);
        self.flight = Some(Flight {
            from: ctx.camera().eye,
            to: Vec3::from_array(FINAL_CAMERA_EYE),
            t,
        });
        st.show_title();
        self.position = Vec3::ZERO;
        self.leg_to = Vec3::ZERO;
        self.legs.clear();
        self.leg_t.set(1.0);
    }

    fn limits(aspect: f32) -> (Vec3, Vec3) {
        let narrow = (aspect / REFERENCE_ASPECT).clamp(0.5, 1.0);
        let mut min = Vec3::from_array(WANDER_MIN);
        let mut max = Vec3::from_array(WANDER_MAX);
        min.x *= narrow;
        max.x *= narrow;
        (min, max)
    }

    fn plan_sequence(&mut self, aspect: f32) {
        let (min, max) = Self::limits(aspect);
        let steps: u32 = self.rng.gen_range(2..=3);
        let total: f32 = self.rng.gen_range(1.5..3.0);
        let duration = total / steps as f32;
        let mut cursor = self.position;
        for _ in 0..steps {
            let (spread_xy, spread_z) = if self.rng.gen_bool(WANDER_BIG_JUMP_CHANCE) {
                (1.5, 0.8)
            } else {
                (1.0, 0.7)
            };
            let d = Vec3::new(
                self.rng.gen_range(-1.0f32..1.0) * WANDER_STEP * spread_xy,
                self.rng.gen_range(-1.0f32..1.0) * WANDER_STEP * spread_xy,
                self.rng.gen_range(-1.0f32..1.0) * WANDER_STEP * spread_z,
            );
            cursor = (cursor + d).clamp(min, max);
            let ease = WANDER_EASES[self.rng.gen_range(0..WANDER_EASES.len())];
            let tilt = Vec2::new(
                self.rng.gen_range(-WANDER_TILT..WANDER_TILT),
                self.rng.gen_range(-WANDER_TILT..WANDER_TILT),
            );
            self.legs.push_back(Leg {
                to: cursor,
                duration,
                ease,
                tilt,
            });
        }
    }

    fn advance_wander(&mut self, dt_sec: f32, aspect: f32) {
        if !self.leg_t.is_running() {
            self.position = self.leg_to;
            if self.legs.is_empty() {
                self.plan_sequence(aspect);
            }
            if let Some(leg) = self.legs.pop_front() {
                self.leg_from = self.position;
                self.leg_to = leg.to;
                self.leg_t.set(0.0);
                self.leg_t.to(1.0, leg.duration, leg.ease);
                self.tilt_x.to(leg.tilt.x, leg.duration * 0.7, Ease::SineInOut);
                self.tilt_z.to(leg.tilt.y, leg.duration * 0.7, Ease::SineInOut);
            }
        }
        let k = self.leg_t.advance(dt_sec);
        self.position = self.leg_from.lerp(self.leg_to, k);
    }

    /// The ball must wear the deflating material before it can collapse.
    fn verify_material(st: &mut StageState) -> bool {
        let Some(model) = st.model.loaded_mut() else {
            return false;
        };
        if model.material == Material::Deflatable {
            log::debug!("[final] deflate material in place");
            return true;
        }
        log::error!(
            "[final] deflate material missing on {}, reapplying",
            model.asset.name
        );
        model.material = Material::Deflatable;
        false
    }

    fn burst(&mut self, at: Vec3) {
        for i in 0..DEFLATE_PARTICLES {
            let angle = i as f32 / DEFLATE_PARTICLES as f32 * TAU;
            let radius: f32 = self.rng.gen_range(0.5..1.0);
            let depth: f32 = self.rng.gen_range(-0.5f32..0.5) * radius;
            self.particles.push(Particle {
                origin: at,
                target: at + Vec3::new(angle.cos() * radius, angle.sin() * radius, depth),
                size: self.rng.gen_range(0.05..0.2),
                age: 0.0,
                span: self.rng.gen_range(0.5..1.5),
            });
        }
    }

    fn deflate(&mut self, st: &mut StageState) {
        Self::verify_material(st);
        log::info!("[final] ball popped");
        let at = st.pose.translation;
        self.burst(at);
        self.legs.clear();
        self.leg_t.kill();

        let flip = |rng: &mut StdRng| if rng.gen_bool(0.5) { FRAC_PI_2 } else { -FRAC_PI_2 };
        let (rx, rz) = (flip(&mut self.rng), flip(&mut self.rng));
        self.tilt_x.to(rx, 1.0, Ease::Power2InOut);
        self.tilt_z.to(rz, 1.0, Ease::Power2InOut);

        let mut amount = Tween::new(0.0);
        amount.to(DEFLATE_FIRST, DEFLATE_FIRST_SEC, Ease::Power1In);
        let mut height = Tween::new(self.position.y);
        height.to(DEFLATE_FALL_Y, DEFLATE_FALL_SEC, Ease::Power3In);
        self.deflation = Some(Deflation {
            elapsed: 0.0,
            anchor: self.position,
            jitter: Vec3::ZERO,
            amount,
            collapsing: false,
            height,
            landing: Landing::Falling,
            squash: None,
            message_shown: false,
        });
    }

    fn tick_deflation(&mut self, st: &mut StageState, dt_sec: f32) {
        let Some(d) = self.deflation.as_mut() else {
            return;
        };
        d.elapsed += dt_sec;

        d.amount.advance(dt_sec);
        if !d.amount.is_running() {
            if !d.collapsing {
                d.collapsing = true;
                d.amount.to(1.0, DEFLATE_REST_SEC, Ease::Power2Out);
            } else if !d.message_shown {
                d.message_shown = true;
                if let Some(c) = st.caption_mut(CaptionRole::Message) {
                    c.show();
                }
            }
        }
        if d.collapsing && d.amount.is_running() && self.rng.gen_bool(0.5) {
            d.jitter.x += self.rng.gen_range(-0.025f32..0.025);
            d.jitter.z += self.rng.gen_range(-0.025f32..0.025);
        }

        let y = d.height.advance(dt_sec);
        if !d.height.is_running() {
            d.landing = match d.landing {
                Landing::Falling => {
                    d.height.to(LANDING_BOUNCE_Y, LANDING_BOUNCE_SEC, Ease::Power2Out);
                    Landing::Rebounding
                }
                Landing::Rebounding => {
                    d.height.to(DEFLATE_FALL_Y, LANDING_BOUNCE_SEC, Ease::Power2In);
                    Landing::Settling
                }
                _ => Landing::Rested,
            };
        }
        if y > WOBBLE_ABOVE_Y {
            d.jitter.x += (d.elapsed * 20.0).sin() * 0.006;
            d.jitter.z += (d.elapsed * 18.0).cos() * 0.005;
        }

        if d.squash.is_none() && d.elapsed >= DEFLATE_FALL_SEC {
            let mut s = Tween::new(0.0);
            s.to(1.0, DEFLATE_SQUASH_SEC, Ease::BounceOut);
            d.squash = Some(s);
        }
        let squash = d.squash.as_mut().map(|s| s.advance(dt_sec)).unwrap_or(0.0);

        let shake_leg = (d.elapsed / DEFLATE_SHAKE_SEC) as u32;
        let shake = if shake_leg < SHAKE_LEGS {
            let frac = (d.elapsed % DEFLATE_SHAKE_SEC) / DEFLATE_SHAKE_SEC;
            let k = Ease::Power2Out.apply(frac);
            SHAKE_OFFSET * if shake_leg % 2 == 0 { k } else { 1.0 - k }
        } else {
            Vec3::ZERO
        };

        st.pose.translation = Vec3::new(d.anchor.x + d.jitter.x, y, d.anchor.z + d.jitter.z) + shake;
        st.pose.scale = Vec3::ONE.lerp(Vec3::from_array(DEFLATE_SQUASH), squash);
    }
}

impl Choreography for FinalMotion {
    fn on_transition(&mut self, st: &mut StageState, tr: Transition, ctx: &mut StageContext) {
        match tr {
            Transition::Visibility(true) => self.reveal(st, ctx),
            Transition::Visibility(false) => self.flight = None,
            _ => {}
        }
    }

    fn on_loaded(&mut self, st: &mut StageState) {
        if let Some(model) = st.model.loaded_mut() {
            model.material = Material::Deflatable;
        }
    }

    fn click(&mut self, st: &mut StageState, ray: &Ray, _ctx: &mut StageContext) -> bool {
        if !self.revealed || self.deflation.is_some() || st.model.loaded().is_none() {
            return false;
        }
        let radius = FINAL_BALL_RADIUS * st.pose.scale.max_element();
        if ray_sphere(ray, st.pose.translation, radius).is_none() {
            return false;
        }
        self.deflate(st);
        true
    }

    fn tick(&mut self, st: &mut StageState, dt_sec: f32, ctx: &mut StageContext) {
        if let Some(f) = self.flight.as_mut() {
            let k = f.t.advance(dt_sec);
            if let Some(cam) = ctx.camera_mut(st.id) {
                cam.eye = f.from.lerp(f.to, k);
                cam.look_at(Vec3::ZERO);
            }
            if !f.t.is_running() {
                self.flight = None;
            }
        }

        self.particles.retain_mut(|p| {
            p.age += dt_sec;
            p.age < p.span
        });

        if !self.revealed {
            return;
        }
        let tilt = Vec2::new(self.tilt_x.advance(dt_sec), self.tilt_z.advance(dt_sec));
        if self.deflation.is_some() {
            self.tick_deflation(st, dt_sec);
        } else {
            self.spin += TAU / FINAL_SPIN_PERIOD_SEC * dt_sec;
            self.advance_wander(dt_sec, st.viewport.aspect());
            st.pose.translation = self.position;
            st.pose.scale = Vec3::ONE;
        }
        st.pose.rotation = Vec3::new(tilt.x, self.spin, tilt.y);
    }

    fn drawables(&self, st: &StageState, out: &mut Vec<Drawable>) {
        if !st.track.is_visible() {
            return;
        }
        if let Some(loaded) = st.model.loaded() {
            let mut d = Drawable::model(MeshKind::Ball, loaded, &st.pose, BALL_TINT);
            d.deflate = self.deflate_amount();
            out.push(d);
        }
        for p in &self.particles {
            let k = p.progress();
            let fade = 1.0 - Ease::Power1In.apply(k);
            let pose = super::Pose {
                translation: p.origin.lerp(p.target, Ease::Power2Out.apply(k)),
                rotation: Vec3::ZERO,
                scale: Vec3::splat(p.size * fade),
            };
            let [r, g, b, _] = PARTICLE_TINT;
            out.push(Drawable {
                mesh: MeshKind::Particle,
                handle: None,
                transform: pose.matrix(),
                material: Material::Emissive,
                tint: [r, g, b, fade],
                glow: 1.0,
                deflate: 0.0,
                origin: pose.translation,
            });
        }
    }

    fn stop(&mut self) {
        self.flight = None;
        self.legs.clear();
        self.leg_t.kill();
        self.tilt_x.kill();
        self.tilt_z.kill();
        self.particles.clear();
    }
}
