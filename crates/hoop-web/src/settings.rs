use hoop_core::ExperienceConfig;

use crate::constants::{ATTR_ARENA_EXTRA_ROTATIONS, ATTR_ASSET_ROOT, ATTR_SENSITIVITY};

/// Apply `data-*` overrides found through `lookup` (usually
/// `Element::get_attribute`). Unparseable values are logged and skipped.
/// Returns how many overrides were applied.
pub fn apply_overrides(cfg: &mut ExperienceConfig, lookup: impl Fn(&str) -> Option<String>) -> usize {
    let mut applied = 0;

    if let Some(raw) = lookup(ATTR_ARENA_EXTRA_ROTATIONS) {
        match raw.trim().parse::<f32>() {
            Ok(n) if n.is_finite() && n >= 0.0 => {
                cfg.set_arena_extra_rotations(n);
                applied += 1;
            }
            _ => log::warn!("[config] bad {}={:?}", ATTR_ARENA_EXTRA_ROTATIONS, raw),
        }
    }

    if let Some(raw) = lookup(ATTR_ASSET_ROOT) {
        let root = raw.trim();
        if root.is_empty() {
            log::warn!("[config] empty {}", ATTR_ASSET_ROOT);
        } else {
            cfg.asset_root = root.to_string();
            applied += 1;
        }
    }

    if let Some(raw) = lookup(ATTR_SENSITIVITY) {
        match raw.trim().parse::<f32>() {
            Ok(s) if s.is_finite() && s > 0.0 => {
                cfg.set_sensitivity(s);
                applied += 1;
            }
            _ => log::warn!("[config] bad {}={:?}", ATTR_SENSITIVITY, raw),
        }
    }

    if applied > 0 {
        log::info!("[config] {} canvas override(s) applied", applied);
    }
    applied
}
