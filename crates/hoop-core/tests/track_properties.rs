// Randomised checks of the scroll track rules against every stage preset.

use hoop_core::stage::track::{ScrollTrack, Transition};
use hoop_core::{EventBus, StageConfig, StageId, StageMessage, Topic, Visibility};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn armed(id: StageId) -> ScrollTrack {
    let mut t = ScrollTrack::new(&StageConfig::for_stage(id));
    t.arm();
    t
}

#[test]
fn progress_never_leaves_unit_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for id in StageId::ALL {
        let mut t = armed(id);
        for _ in 0..5_000 {
            let delta: f32 = rng.gen_range(-4_000.0f32..4_000.0f32);
            t.apply_wheel(delta);
            assert!((0.0..=1.0).contains(&t.progress()), "{id}: {}", t.progress());
            assert!(t.extra_rotations() >= 0.0);
        }
    }
}

#[test]
fn threshold_visibility_tracks_progress() {
    let mut rng = StdRng::seed_from_u64(11);
    for id in [StageId::Hoop, StageId::Arena] {
        let cfg = StageConfig::for_stage(id);
        let Visibility::Threshold(limit) = cfg.visibility else {
            panic!("{id} should use a threshold");
        };
        let mut t = armed(id);
        for _ in 0..2_000 {
            if t.is_completed() {
                break;
            }
            t.apply_wheel(rng.gen_range(-300.0f32..320.0f32));
            assert_eq!(t.is_visible(), t.progress() > limit, "{id} at {}", t.progress());
        }
    }
}

#[test]
fn effects_flag_only_flips_across_the_band_edges() {
    let cfg = StageConfig::for_stage(StageId::Hoop);
    let mut t = armed(StageId::Hoop);
    let mut rng = StdRng::seed_from_u64(3);
    let mut was = t.effects_active();
    for _ in 0..3_000 {
        if t.is_completed() {
            break;
        }
        let before = t.progress();
        let out = t.apply_wheel(rng.gen_range(-200.0f32..199.0f32));
        let now = t.effects_active();
        if now != was {
            assert!(out.contains(&Transition::Effects(now)));
            if now {
                assert!(t.progress() >= cfg.effects_on);
            } else {
                assert!(t.progress() < cfg.effects_off, "{before} -> {}", t.progress());
            }
        }
        was = now;
    }
}

#[test]
fn disarmed_tracks_ignore_input() {
    for id in StageId::ALL {
        let mut t = ScrollTrack::new(&StageConfig::for_stage(id));
        if t.is_armed() {
            t.disarm();
        }
        let progress = t.progress();
        for d in [500.0, -500.0, 10_000.0, f32::NAN] {
            assert!(t.apply_wheel(d).is_empty());
        }
        assert_eq!(t.progress(), progress);
    }
}

#[test]
fn completion_is_reported_once() {
    let mut t = armed(StageId::Arena);
    let mut completed = 0;
    for _ in 0..5_000 {
        let out = t.apply_wheel(250.0);
        completed += out.iter().filter(|tr| **tr == Transition::Completed).count();
    }
    assert_eq!(completed, 1);
    assert!(t.is_completed());
    assert!(!t.is_armed());
    assert!(!t.complete());
}

#[test]
fn saturated_arena_turns_every_scroll_into_rotation() {
    let mut t = armed(StageId::Arena);
    while t.progress() < 1.0 {
        t.apply_wheel(200.0);
        assert_eq!(t.extra_rotations(), 0.0);
    }
    let mut last = t.extra_rotations();
    for delta in [200.0, -200.0, -50.0, 120.0] {
        t.apply_wheel(delta);
        assert_eq!(t.progress(), 1.0);
        assert!(t.extra_rotations() > last, "{delta} did not spin");
        last = t.extra_rotations();
    }
}

#[test]
fn publishing_without_subscribers_is_harmless() {
    let mut bus: EventBus<Topic, StageMessage> = EventBus::new();
    assert_eq!(bus.publish(Topic::GlassBreakComplete, &StageMessage::GlassBreakComplete), 0);
    assert_eq!(bus.topic_count(), 0);
}
