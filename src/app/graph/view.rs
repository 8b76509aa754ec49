use eframe::egui::{self, Align2, FontId, Sense, Stroke, Ui};

use super::super::ViewModel;
use super::super::render_utils::{canvas_to_screen, color, draw_background, edge_shapes};

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let style = self.style();

        draw_background(&painter, rect, color(style.background));

        self.sync_canvas(rect);
        self.handle_node_drag(ui, rect, &response);

        if self.drags.is_dragging() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.hovered_node(ui, rect).is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grab);
        }

        if let Some(session) = self.session.as_mut()
            && session.tick(&mut self.scene)
        {
            ui.ctx().request_repaint();
        }

        if self.session.is_none() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No graph yet. Adjust the parameters and regenerate.",
                FontId::proportional(14.0),
                color(style.stroke),
            );
            return;
        }

        let stroke = Stroke::new(style.stroke_width, color(style.stroke));
        let dash = style.dashed.then_some(style.dash);
        for path in &self.scene.paths {
            painter.extend(edge_shapes(rect, path, stroke, dash));
        }

        let fill = color(style.node_fill);
        for circle in &self.scene.circles {
            painter.circle(
                canvas_to_screen(rect, circle.center),
                circle.radius,
                fill,
                stroke,
            );
        }
    }
}
