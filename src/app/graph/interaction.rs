use eframe::egui::{self, PointerButton, Rect, Ui};
use tracing::debug;

use crate::layout::interaction::PointerId;
use crate::network::Canvas;

use super::super::ViewModel;
use super::super::render_utils::screen_to_canvas;

/// egui merges mouse and primary touch into one pointer.
const PRIMARY_POINTER: PointerId = 0;

impl ViewModel {
    /// Runs queued regenerations against the current graph area, otherwise
    /// recenters the run when the area changes size.
    pub(in crate::app) fn sync_canvas(&mut self, rect: Rect) {
        let canvas = Canvas::new(rect.width(), rect.height());
        if !canvas.is_valid() {
            return;
        }

        if self.pending_regeneration.is_some() {
            self.apply_pending(canvas);
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let current = session.canvas();
        if (current.width - canvas.width).abs() < 0.5 && (current.height - canvas.height).abs() < 0.5
        {
            return;
        }

        debug!(width = canvas.width, height = canvas.height, "graph area resized");
        session.resize(canvas);
        self.scene.sync(session);
    }

    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if response.drag_started_by(PointerButton::Primary) {
            let press = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(press) = press
                && let Some(node) = session.node_at(screen_to_canvas(rect, press))
            {
                self.drags.drag_start(session, PRIMARY_POINTER, node);
            }
        }

        if self.drags.dragged_node(PRIMARY_POINTER).is_some()
            && response.dragged()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.drags
                .drag_move(session, PRIMARY_POINTER, screen_to_canvas(rect, pointer));
        }

        if response.drag_stopped() {
            self.drags.drag_end(session, PRIMARY_POINTER);
        }
    }

    pub(in crate::app) fn hovered_node(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let session = self.session.as_ref()?;
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        session.node_at(screen_to_canvas(rect, pointer))
    }
}
