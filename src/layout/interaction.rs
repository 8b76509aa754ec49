use std::collections::HashMap;

use eframe::egui::Vec2;
use tracing::trace;

use super::LayoutSession;

pub type PointerId = u64;

/// Maps pointer drags onto node pins. Each pointer is either free or holding one node.
#[derive(Debug, Default)]
pub struct DragController {
    active: HashMap<PointerId, usize>,
}

impl DragController {
    pub fn is_dragging(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn dragged_node(&self, pointer: PointerId) -> Option<usize> {
        self.active.get(&pointer).copied()
    }

    /// Forget every drag; used when the session is replaced.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    pub fn drag_start(
        &mut self,
        session: &mut LayoutSession,
        pointer: PointerId,
        node: usize,
    ) -> bool {
        let Some(position) = session.nodes().get(node).map(|node| node.position) else {
            return false;
        };

        if let Some(previous) = self.active.remove(&pointer) {
            self.release_pin(session, previous);
        }
        if self.active.is_empty() {
            session.set_alpha_target(session.config().reheat_alpha);
            session.restart();
        }

        session.pin(node, position);
        self.active.insert(pointer, node);
        trace!(pointer, node, "drag started");
        true
    }

    pub fn drag_move(&mut self, session: &mut LayoutSession, pointer: PointerId, position: Vec2) {
        if let Some(&node) = self.active.get(&pointer) {
            session.pin(node, position);
        }
    }

    pub fn drag_end(&mut self, session: &mut LayoutSession, pointer: PointerId) {
        let Some(node) = self.active.remove(&pointer) else {
            return;
        };
        if self.active.is_empty() {
            session.set_alpha_target(0.0);
        }
        self.release_pin(session, node);
        trace!(pointer, node, "drag ended");
    }

    fn release_pin(&self, session: &mut LayoutSession, node: usize) {
        if !self.active.values().any(|&held| held == node) {
            session.unpin(node);
        }
    }
}
