use hoop_core::tween::{Ease, Tween};
use hoop_core::{StageId, StageMessage};

use crate::constants::{
    CRACKS_FADE_SEC, CRACKS_HIDE_SEC, CRACKS_SHOW_SEC, GLASS_TITLE_HIDE_SEC, GLASS_TITLE_MAX_ZOOM,
    GLASS_TITLE_SHOW_SEC,
};

/// Style values for the glass title and its crack overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassStyle {
    pub title_scale: f32,
    pub title_opacity: f32,
    pub cracks_opacity: f32,
}

/// Drives the glass-title overlay from intro progress and routed messages.
///
/// The intro's effects band is the broken state: cracks appear and the title
/// fades. Leaving the band early heals it; `GlassBreakComplete` clears the
/// cracks for good.
#[derive(Debug)]
pub struct GlassOverlay {
    title_opacity: Tween,
    cracks_opacity: Tween,
    broken: bool,
    finished: bool,
}

impl Default for GlassOverlay {
    fn default() -> Self {
        Self {
            title_opacity: Tween::new(1.0),
            cracks_opacity: Tween::new(0.0),
            broken: false,
            finished: false,
        }
    }
}

impl GlassOverlay {
    pub fn on_message(&mut self, msg: &StageMessage) {
        match *msg {
            StageMessage::EffectsChanged {
                stage: StageId::Intro,
                active,
            } if !self.finished && active != self.broken => {
                self.broken = active;
                if active {
                    log::info!("[glass] broken");
                    self.cracks_opacity.to(1.0, CRACKS_SHOW_SEC, Ease::Linear);
                    self.title_opacity.to(0.0, GLASS_TITLE_HIDE_SEC, Ease::Power2In);
                } else {
                    log::info!("[glass] healed");
                    self.cracks_opacity.to(0.0, CRACKS_HIDE_SEC, Ease::Linear);
                    self.title_opacity.to(1.0, GLASS_TITLE_SHOW_SEC, Ease::Power2Out);
                }
            }
            StageMessage::GlassBreakComplete if !self.finished => {
                self.finished = true;
                self.cracks_opacity.to(0.0, CRACKS_FADE_SEC, Ease::Linear);
            }
            _ => {}
        }
    }

    /// Advance fades and compute styles for the current intro progress.
    pub fn advance(&mut self, dt_sec: f32, intro_progress: f32) -> GlassStyle {
        GlassStyle {
            title_scale: 1.0 + GLASS_TITLE_MAX_ZOOM * intro_progress.clamp(0.0, 1.0),
            title_opacity: self.title_opacity.advance(dt_sec),
            cracks_opacity: self.cracks_opacity.advance(dt_sec),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
