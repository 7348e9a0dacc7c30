//! State every stage may touch during a tick: the camera (behind an ownership
//! check) and the outgoing message queue.

use crate::camera::{CameraPose, Viewport};
use crate::message::{StageId, StageMessage};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct StageContext {
    camera: CameraPose,
    camera_owner: Option<StageId>,
    outbox: VecDeque<StageMessage>,
}

impl StageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    /// Mutable camera access, granted only to the current owner.
    pub fn camera_mut(&mut self, stage: StageId) -> Option<&mut CameraPose> {
        (self.camera_owner == Some(stage)).then_some(&mut self.camera)
    }

    pub fn camera_owner(&self) -> Option<StageId> {
        self.camera_owner
    }

    pub(crate) fn set_camera_owner(&mut self, owner: Option<StageId>) {
        if self.camera_owner != owner {
            log::debug!("[ctx] camera owner {:?} -> {:?}", self.camera_owner, owner);
            self.camera_owner = owner;
        }
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }

    pub fn emit(&mut self, msg: StageMessage) {
        self.outbox.push_back(msg);
    }

    pub(crate) fn next_message(&mut self) -> Option<StageMessage> {
        self.outbox.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }
}
