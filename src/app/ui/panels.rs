use std::time::Instant;

use eframe::egui::{self, Align, Context, Id, Layout};

use super::super::{Regeneration, ViewModel};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let now = Instant::now();
        if self.regenerate_debounce.poll(now) {
            self.schedule(Regeneration::SameSeed);
        } else if let Some(remaining) = self.regenerate_debounce.remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("nodeweave");
                    ui.separator();
                    if let Some(session) = &self.session {
                        ui.label(format!("nodes: {}", session.nodes().len()));
                        ui.label(format!("links: {}", session.links().len()));
                        ui.label(format!("alpha: {:.3}", session.alpha()));
                        ui.label(format!("ticks: {}", session.ticks()));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("seed: {}", self.seed));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_controls(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        self.draw_validation_modal(ctx);
    }

    fn draw_validation_modal(&mut self, ctx: &Context) {
        let Some(message) = self.validation_error.clone() else {
            return;
        };

        let modal = egui::Modal::new(Id::new("validation_error")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading("Invalid parameters");
            ui.add_space(6.0);
            ui.label(message);
            ui.add_space(10.0);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| ui.button("OK").clicked())
                .inner
        });

        if modal.inner || modal.should_close() {
            self.validation_error = None;
        }
    }
}
