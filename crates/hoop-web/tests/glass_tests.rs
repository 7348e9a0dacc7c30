// Host-side tests for the glass-title overlay state.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod glass {
    include!("../src/glass.rs");
}

use glass::GlassOverlay;
use hoop_core::{StageId, StageMessage};

fn effects(stage: StageId, active: bool) -> StageMessage {
    StageMessage::EffectsChanged { stage, active }
}

fn run(g: &mut GlassOverlay, secs: f32, progress: f32) -> glass::GlassStyle {
    let mut style = g.advance(0.0, progress);
    let mut t = 0.0;
    while t < secs {
        style = g.advance(1.0 / 60.0, progress);
        t += 1.0 / 60.0;
    }
    style
}

#[test]
fn title_scales_with_intro_progress() {
    let mut g = GlassOverlay::default();
    assert_eq!(g.advance(0.0, 0.0).title_scale, 1.0);
    let s = g.advance(0.0, 0.5).title_scale;
    assert!((s - (1.0 + constants::GLASS_TITLE_MAX_ZOOM * 0.5)).abs() < 1e-6);
    assert_eq!(g.advance(0.0, 3.0).title_scale, 1.0 + constants::GLASS_TITLE_MAX_ZOOM);
}

#[test]
fn entering_the_band_breaks_the_glass() {
    let mut g = GlassOverlay::default();
    g.on_message(&effects(StageId::Intro, true));
    assert!(g.is_broken());
    let style = run(&mut g, 0.6, 0.95);
    assert!(style.cracks_opacity > 0.99);
    assert!(style.title_opacity < 0.01);
}

#[test]
fn leaving_the_band_heals_it() {
    let mut g = GlassOverlay::default();
    g.on_message(&effects(StageId::Intro, true));
    run(&mut g, 0.6, 0.95);
    g.on_message(&effects(StageId::Intro, false));
    assert!(!g.is_broken());
    let style = run(&mut g, 1.1, 0.5);
    assert!(style.cracks_opacity < 0.01);
    assert!(style.title_opacity > 0.99);
}

#[test]
fn other_stages_do_not_touch_the_glass() {
    let mut g = GlassOverlay::default();
    g.on_message(&effects(StageId::Hoop, true));
    assert!(!g.is_broken());
    let style = run(&mut g, 0.5, 0.0);
    assert_eq!(style.cracks_opacity, 0.0);
    assert_eq!(style.title_opacity, 1.0);
}

#[test]
fn break_complete_clears_cracks_for_good() {
    let mut g = GlassOverlay::default();
    g.on_message(&effects(StageId::Intro, true));
    run(&mut g, 0.3, 0.95);
    g.on_message(&StageMessage::GlassBreakComplete);
    assert!(g.is_finished());
    let style = run(&mut g, 0.6, 0.95);
    assert!(style.cracks_opacity < 0.01);

    // late band changes are ignored once finished
    g.on_message(&effects(StageId::Intro, false));
    let style = run(&mut g, 1.0, 0.2);
    assert!(style.title_opacity < 0.01);
    assert!(style.cracks_opacity < 0.01);
}
