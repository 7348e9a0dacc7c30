//! Stage-transition protocol.
//!
//! Every cross-stage signal is one variant of [`StageMessage`]. Stages only
//! arm on `StageCompleted` of their direct predecessor.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    Intro,
    Hoop,
    Arena,
    Final,
}

impl StageId {
    pub const ALL: [StageId; 4] = [StageId::Intro, StageId::Hoop, StageId::Arena, StageId::Final];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn predecessor(self) -> Option<StageId> {
        match self {
            StageId::Intro => None,
            StageId::Hoop => Some(StageId::Intro),
            StageId::Arena => Some(StageId::Hoop),
            StageId::Final => Some(StageId::Arena),
        }
    }

    pub fn successor(self) -> Option<StageId> {
        match self {
            StageId::Intro => Some(StageId::Hoop),
            StageId::Hoop => Some(StageId::Arena),
            StageId::Arena => Some(StageId::Final),
            StageId::Final => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StageId::Intro => "intro",
            StageId::Hoop => "hoop",
            StageId::Arena => "arena",
            StageId::Final => "final",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageMessage {
    /// Progress entered (`true`) or left (`false`) the effects band.
    EffectsChanged { stage: StageId, active: bool },
    /// Progress crossed the visibility threshold, or the stage was dismissed.
    StageVisibility { stage: StageId, visible: bool },
    /// Terminal for the sender; arms the successor.
    StageCompleted { stage: StageId },
    /// Force a stage out of view for good.
    HideStage { stage: StageId },
    /// The shattered title finished playing; the intro ball drops.
    GlassBreakComplete,
}

/// Bus key for [`StageMessage`]; one topic per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    EffectsChanged,
    StageVisibility,
    StageCompleted,
    HideStage,
    GlassBreakComplete,
}

impl StageMessage {
    pub fn topic(&self) -> Topic {
        match self {
            StageMessage::EffectsChanged { .. } => Topic::EffectsChanged,
            StageMessage::StageVisibility { .. } => Topic::StageVisibility,
            StageMessage::StageCompleted { .. } => Topic::StageCompleted,
            StageMessage::HideStage { .. } => Topic::HideStage,
            StageMessage::GlassBreakComplete => Topic::GlassBreakComplete,
        }
    }

    /// The stage a message is about, if any.
    pub fn stage(&self) -> Option<StageId> {
        match *self {
            StageMessage::EffectsChanged { stage, .. }
            | StageMessage::StageVisibility { stage, .. }
            | StageMessage::StageCompleted { stage }
            | StageMessage::HideStage { stage } => Some(stage),
            StageMessage::GlassBreakComplete => None,
        }
    }
}
