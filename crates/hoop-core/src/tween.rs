//! Time-based interpolation with named easing curves.
//!
//! A [`Tween`] always animates from its current value, so retargeting mid-way
//! never jumps. `kill()` freezes it in place.

use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    SineInOut,
    CircOut,
    BackOut(f32),
    BounceOut,
}

impl Ease {
    /// Map normalised time `t` in [0,1] to eased progress. Endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => in_out(t, 2),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => in_out(t, 3),
            Ease::Power3In => t.powi(4),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Ease::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).max(0.0).sqrt(),
            Ease::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Ease::BounceOut => bounce_out(t),
        }
    }
}

fn in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        0.5 * (2.0 * t).powi(power)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - t)).powi(power)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    value: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
    running: bool,
}

impl Tween {
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            value,
            elapsed: 0.0,
            duration: 0.0,
            ease: Ease::Linear,
            running: false,
        }
    }

    /// Start animating from the current value toward `to`.
    pub fn to(&mut self, to: f32, duration: f32, ease: Ease) {
        self.from = self.value;
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.ease = ease;
        self.running = true;
        if self.duration == 0.0 {
            self.finish();
        }
    }

    /// Jump to `value` and stop.
    pub fn set(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.value = value;
        self.running = false;
    }

    pub fn kill(&mut self) {
        self.running = false;
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        if self.running {
            self.elapsed += dt_sec.max(0.0);
            if self.elapsed >= self.duration {
                self.finish();
            } else {
                let k = self.ease.apply(self.elapsed / self.duration);
                self.value = self.from + (self.to - self.from) * k;
            }
        }
        self.value
    }

    fn finish(&mut self) {
        self.value = self.to;
        self.running = false;
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 12] = [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2In,
        Ease::Power2Out,
        Ease::Power2InOut,
        Ease::Power3In,
        Ease::SineInOut,
        Ease::CircOut,
        Ease::BackOut(1.2),
        Ease::BounceOut,
    ];

    #[test]
    fn eases_hit_both_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-5, "{:?} at 0", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", e);
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut(1.2).apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn tween_reaches_target_and_stops() {
        let mut t = Tween::new(0.0);
        t.to(2.0, 0.5, Ease::Power2Out);
        assert!(t.is_running());
        let mid = t.advance(0.25);
        assert!(mid > 0.0 && mid < 2.0);
        assert_eq!(t.advance(1.0), 2.0);
        assert!(!t.is_running());
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut t = Tween::new(0.0);
        t.to(1.0, 1.0, Ease::Linear);
        t.advance(0.5);
        t.to(0.0, 1.0, Ease::Linear);
        assert!((t.advance(0.0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn killed_tween_freezes() {
        let mut t = Tween::new(0.0);
        t.to(1.0, 1.0, Ease::Linear);
        let v = t.advance(0.3);
        t.kill();
        assert_eq!(t.advance(5.0), v);
    }
}
