use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};

use crate::network::{Placement, RadiusDistribution, Topology};

use super::super::{Regeneration, ViewModel};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    held_secs: f32,
    direction: i8,
    integer_carry: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Signed, accelerating step count for a focused slider whose arrow keys are held.
/// The hold state lives in egui temp data keyed by the slider id.
fn arrow_key_steps(ui: &Ui, response: &Response, integer: bool) -> Option<f32> {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut state = ui
        .ctx()
        .data(|data| data.get_temp::<SliderKeyHoldState>(state_id))
        .unwrap_or_default();

    let (delta_time, increase, decrease) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });
    let direction = if response.has_focus() {
        (increase as i8) - (decrease as i8)
    } else {
        0
    };

    if direction == 0 {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return None;
    }

    if state.direction != direction {
        state = SliderKeyHoldState {
            direction,
            ..SliderKeyHoldState::default()
        };
    }
    state.held_secs += delta_time;

    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(state.held_secs);
    let mut steps = direction as f32 * speed * delta_time;
    if integer {
        state.integer_carry += steps;
        steps = state.integer_carry.trunc();
        state.integer_carry -= steps;
    }

    ui.ctx().request_repaint();
    ui.ctx().data_mut(|data| data.insert_temp(state_id, state));
    (steps != 0.0).then_some(steps)
}

fn float_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    label: &str,
    hover: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let response = ui
        .add(
            egui::Slider::new(value, range)
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }

    let mut changed = response.changed();
    if let Some(steps) = arrow_key_steps(ui, &response, false) {
        let step = ((max - min) / 200.0).max(0.0005);
        let previous = *value;
        *value = (*value + steps * step).clamp(min, max);
        changed |= (*value - previous).abs() > f32::EPSILON;
    }
    changed
}

fn count_slider(
    ui: &mut Ui,
    value: &mut usize,
    range: RangeInclusive<usize>,
    label: &str,
    hover: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let response = ui
        .add(egui::Slider::new(value, range).text(label))
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }

    let mut changed = response.changed();
    if let Some(steps) = arrow_key_steps(ui, &response, true) {
        let previous = *value;
        *value = (*value as isize + steps as isize).clamp(min as isize, max as isize) as usize;
        changed |= *value != previous;
    }
    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Generator");
        ui.separator();
        ui.add_space(4.0);

        let mut regenerate_now = false;
        let mut debounced = false;

        ui.horizontal_wrapped(|ui| {
            ui.label("Topology");
            for topology in [Topology::Mesh, Topology::Hub] {
                regenerate_now |= ui
                    .selectable_value(&mut self.params.topology, topology, topology.label())
                    .changed();
            }
        });

        egui::ComboBox::from_label("Placement")
            .selected_text(self.params.placement.label())
            .show_ui(ui, |ui| {
                for placement in [Placement::Uniform, Placement::Radial, Placement::Polygon] {
                    regenerate_now |= ui
                        .selectable_value(&mut self.params.placement, placement, placement.label())
                        .changed();
                }
            });

        egui::ComboBox::from_label("Radius distribution")
            .selected_text(self.params.radius_distribution.label())
            .show_ui(ui, |ui| {
                for distribution in [RadiusDistribution::Skewed, RadiusDistribution::Uniform] {
                    regenerate_now |= ui
                        .selectable_value(
                            &mut self.params.radius_distribution,
                            distribution,
                            distribution.label(),
                        )
                        .changed();
                }
            });

        ui.checkbox(&mut self.params.dashed_lines, "Dashed lines")
            .on_hover_text("Draw links as 5/5 dashes. Does not regenerate the graph.");

        ui.separator();

        let params = &mut self.params;
        debounced |= count_slider(
            ui,
            &mut params.node_count,
            0..=300,
            "Nodes",
            "Number of nodes to sample.",
        );
        debounced |= count_slider(
            ui,
            &mut params.min_connections,
            0..=12,
            "Min connections",
            "Fewest links each node tries to make in a mesh.",
        );
        debounced |= count_slider(
            ui,
            &mut params.max_connections,
            0..=12,
            "Max connections",
            "Most links each node tries to make in a mesh.",
        );
        debounced |= float_slider(
            ui,
            &mut params.min_node_radius,
            1.0..=80.0,
            "Min node radius",
            "Smallest sampled circle radius.",
        );
        debounced |= float_slider(
            ui,
            &mut params.max_node_radius,
            1.0..=80.0,
            "Max node radius",
            "Largest sampled circle radius.",
        );
        debounced |= float_slider(
            ui,
            &mut params.min_distance,
            0.0..=400.0,
            "Min distance",
            "Closest spacing the many-body force acts at, and the inner placement band.",
        );
        debounced |= float_slider(
            ui,
            &mut params.max_distance,
            0.0..=400.0,
            "Max distance",
            "Farthest spacing the many-body force reaches, and the outer placement band.",
        );

        let mut limit_reach = params.connection_radius.is_some();
        if ui
            .checkbox(&mut limit_reach, "Limit connection radius")
            .on_hover_text("Only link nodes whose seed positions are this close.")
            .changed()
        {
            params.connection_radius = limit_reach.then_some(180.0);
            debounced = true;
        }
        if let Some(radius) = params.connection_radius.as_mut() {
            debounced |= float_slider(
                ui,
                radius,
                0.0..=1000.0,
                "Connection radius",
                "Maximum seed distance between linked nodes.",
            );
        }

        ui.add_enabled_ui(params.topology == Topology::Hub, |ui| {
            debounced |= float_slider(
                ui,
                &mut params.central_node_size,
                4.0..=120.0,
                "Central node size",
                "Radius of the hub node.",
            );
            debounced |= float_slider(
                ui,
                &mut params.min_line_length,
                10.0..=600.0,
                "Min line length",
                "Shortest hub spoke.",
            );
            debounced |= float_slider(
                ui,
                &mut params.max_line_length,
                10.0..=600.0,
                "Max line length",
                "Longest hub spoke.",
            );
        });

        ui.add_enabled_ui(params.placement == Placement::Polygon, |ui| {
            debounced |= count_slider(
                ui,
                &mut params.polygon_edges,
                3..=12,
                "Polygon edges",
                "Sides of the polygon nodes are seeded along.",
            );
        });

        ui.collapsing("Layout tuning", |ui| {
            let layout = &mut self.layout_config;
            debounced |= float_slider(
                ui,
                &mut layout.alpha_decay,
                0.005..=0.2,
                "Cooling rate",
                "How quickly the simulation loses energy.",
            );
            debounced |= float_slider(
                ui,
                &mut layout.velocity_decay,
                0.05..=0.95,
                "Velocity decay",
                "Fraction of speed removed every tick.",
            );
            debounced |= float_slider(
                ui,
                &mut layout.charge_strength,
                -400.0..=0.0,
                "Charge",
                "Repulsion between every pair of nodes.",
            );
            debounced |= float_slider(
                ui,
                &mut layout.axis_strength,
                0.0..=1.0,
                "Centering",
                "Pull toward the canvas center, scaled per node by size.",
            );
            debounced |= float_slider(
                ui,
                &mut layout.curve_pull,
                -1.0..=1.0,
                "Curve pull",
                "Bow of each link toward (positive) or away from the center.",
            );
        });

        ui.separator();

        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Regenerate")
                .on_hover_text("Sample a new graph with a fresh seed.")
                .clicked()
            {
                self.schedule(Regeneration::NewSeed);
            }
            if ui
                .button("Export SVG")
                .on_hover_text("Write network.svg to the output directory.")
                .clicked()
            {
                self.export_current();
            }
            if ui
                .button("Save preset")
                .on_hover_text("Write preset.json to the output directory.")
                .clicked()
            {
                self.save_preset();
            }
        });

        if let Some(status) = &self.status {
            ui.add_space(4.0);
            ui.label(status.as_str());
        }

        if regenerate_now {
            self.schedule(Regeneration::SameSeed);
        } else if debounced {
            self.request_regenerate();
        }
    }
}
