// Host-side tests for canvas data-attribute overrides.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod settings {
    include!("../src/settings.rs");
}

use hoop_core::{Completion, ExperienceConfig, StageId};
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn arena_required(cfg: &ExperienceConfig) -> f32 {
    match cfg.stage(StageId::Arena).completion {
        Completion::ExtraRotations { required, .. } => required,
        other => panic!("arena completion changed: {:?}", other),
    }
}

#[test]
fn no_attributes_leaves_defaults() {
    let mut cfg = ExperienceConfig::default();
    let applied = settings::apply_overrides(&mut cfg, lookup(&[]));
    assert_eq!(applied, 0);
    assert_eq!(cfg, ExperienceConfig::default());
}

#[test]
fn valid_attributes_are_applied() {
    let mut cfg = ExperienceConfig::default();
    let applied = settings::apply_overrides(
        &mut cfg,
        lookup(&[
            (constants::ATTR_ARENA_EXTRA_ROTATIONS, " 2.5 "),
            (constants::ATTR_ASSET_ROOT, "/cdn/models/"),
            (constants::ATTR_SENSITIVITY, "0.002"),
        ]),
    );
    assert_eq!(applied, 3);
    assert_eq!(arena_required(&cfg), 2.5);
    assert_eq!(cfg.asset_root, "/cdn/models/");
    assert_eq!(cfg.stage(StageId::Hoop).sensitivity, 0.002);
    assert_eq!(cfg.stage(StageId::Arena).sensitivity, 0.002);
    let url = cfg.asset_url(StageId::Hoop).unwrap();
    assert!(url.starts_with("/cdn/models/") && !url.contains("//"));
}

#[test]
fn bad_values_are_skipped() {
    let mut cfg = ExperienceConfig::default();
    let before = arena_required(&cfg);
    let applied = settings::apply_overrides(
        &mut cfg,
        lookup(&[
            (constants::ATTR_ARENA_EXTRA_ROTATIONS, "-1"),
            (constants::ATTR_ASSET_ROOT, "   "),
            (constants::ATTR_SENSITIVITY, "fast"),
        ]),
    );
    assert_eq!(applied, 0);
    assert_eq!(arena_required(&cfg), before);
    assert_eq!(cfg, ExperienceConfig::default());
}

#[test]
fn zero_extra_rotations_is_allowed() {
    let mut cfg = ExperienceConfig::default();
    settings::apply_overrides(&mut cfg, lookup(&[(constants::ATTR_ARENA_EXTRA_ROTATIONS, "0")]));
    assert_eq!(arena_required(&cfg), 0.0);
}
