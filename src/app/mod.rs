use std::path::PathBuf;
use std::time::Instant;

use eframe::egui::{Context, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::export::{DiagramStyle, EXPORT_FILE_NAME, export_svg};
use crate::layout::interaction::DragController;
use crate::layout::{EdgePath, LayoutConfig, LayoutSession, Spacing, TickObserver, edge_paths};
use crate::network::{Canvas, GenerationParams, Link, Node, generate};
use crate::preset::{PRESET_FILE_NAME, Preset};
use crate::util::Debouncer;

mod graph;
mod render_utils;
mod ui;

pub struct NetworkApp {
    model: ViewModel,
}

impl NetworkApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        preset: Preset,
        seed: u64,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            model: ViewModel::new(preset, seed, output_dir),
        }
    }
}

impl eframe::App for NetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.show(ctx);
    }
}

struct ViewModel {
    params: GenerationParams,
    layout_config: LayoutConfig,
    session: Option<LayoutSession>,
    drags: DragController,
    regenerate_debounce: Debouncer,
    /// Source of fresh seeds for the Regenerate button.
    seed_source: StdRng,
    seed: u64,
    /// Applied on the next frame, once the graph area size is known.
    pending_regeneration: Option<Regeneration>,
    validation_error: Option<String>,
    status: Option<String>,
    output_dir: PathBuf,
    scene: SceneCache,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Regeneration {
    SameSeed,
    NewSeed,
}

/// Drawable snapshot refreshed by the layout after every tick.
#[derive(Default)]
struct SceneCache {
    center: Vec2,
    curve_pull: f32,
    circles: Vec<SceneCircle>,
    paths: Vec<EdgePath>,
}

#[derive(Clone, Copy)]
struct SceneCircle {
    center: Vec2,
    radius: f32,
}

impl SceneCache {
    fn sync(&mut self, session: &LayoutSession) {
        self.center = session.canvas().center();
        self.curve_pull = session.config().curve_pull;
        self.on_tick(session.nodes(), session.links());
    }
}

impl TickObserver for SceneCache {
    fn on_tick(&mut self, nodes: &[Node], links: &[Link]) {
        self.circles.clear();
        self.circles.extend(nodes.iter().map(|node| SceneCircle {
            center: node.position,
            radius: node.radius,
        }));
        self.paths = edge_paths(nodes, links, self.center, self.curve_pull);
    }
}

impl ViewModel {
    fn new(preset: Preset, seed: u64, output_dir: PathBuf) -> Self {
        Self {
            params: preset.generation,
            layout_config: preset.layout,
            session: None,
            drags: DragController::default(),
            regenerate_debounce: Debouncer::default(),
            seed_source: StdRng::seed_from_u64(seed),
            seed,
            pending_regeneration: Some(Regeneration::SameSeed),
            validation_error: None,
            status: None,
            output_dir,
            scene: SceneCache::default(),
        }
    }

    fn style(&self) -> DiagramStyle {
        DiagramStyle::default().with_dashed(self.params.dashed_lines)
    }

    /// Slider edits arrive in bursts; only the last one regenerates.
    fn request_regenerate(&mut self) {
        self.regenerate_debounce.trigger(Instant::now());
    }

    fn schedule(&mut self, request: Regeneration) {
        self.regenerate_debounce.cancel();
        if self.pending_regeneration != Some(Regeneration::NewSeed) {
            self.pending_regeneration = Some(request);
        }
    }

    fn apply_pending(&mut self, canvas: Canvas) {
        match self.pending_regeneration.take() {
            Some(Regeneration::SameSeed) => self.regenerate(canvas),
            Some(Regeneration::NewSeed) => self.regenerate_with_new_seed(canvas),
            None => {}
        }
    }

    fn regenerate_with_new_seed(&mut self, canvas: Canvas) {
        self.seed = self.seed_source.r#gen();
        self.regenerate(canvas);
    }

    /// Builds a fresh graph and layout run. Invalid parameters leave the current
    /// session untouched and surface the error in the modal.
    fn regenerate(&mut self, canvas: Canvas) {
        self.regenerate_debounce.cancel();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let graph = match generate(&self.params, canvas, &mut rng) {
            Ok(graph) => graph,
            Err(error) => {
                debug!(%error, "generation rejected");
                self.validation_error = Some(error.to_string());
                return;
            }
        };

        info!(
            seed = self.seed,
            nodes = graph.node_count(),
            links = graph.link_count(),
            "generated network"
        );
        let session = LayoutSession::new(
            graph,
            canvas,
            self.layout_config.clone(),
            Spacing::from_params(&self.params),
        );
        self.drags.reset();
        self.scene.sync(&session);
        self.session = Some(session);
        self.validation_error = None;
    }

    fn export_current(&mut self) {
        let Some(session) = &self.session else {
            self.status = Some("Nothing to export yet".to_owned());
            return;
        };

        let path = self.output_dir.join(EXPORT_FILE_NAME);
        self.status = Some(match export_svg(session, &self.style(), &path) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(export_error) => {
                error!(error = %format!("{export_error:#}"), "svg export failed");
                format!("{export_error:#}")
            }
        });
    }

    fn save_preset(&mut self) {
        let preset = Preset {
            generation: self.params.clone(),
            layout: self.layout_config.clone(),
        };
        let path = self.output_dir.join(PRESET_FILE_NAME);
        self.status = Some(match preset.save(&path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(save_error) => {
                error!(error = %format!("{save_error:#}"), "saving preset failed");
                format!("{save_error:#}")
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ViewModel {
        ViewModel::new(Preset::default(), 11, std::env::temp_dir())
    }

    #[test]
    fn invalid_parameters_keep_current_session() {
        let mut model = model();
        let canvas = Canvas::new(600.0, 400.0);
        model.regenerate(canvas);
        let before = model.session.as_ref().unwrap().nodes().len();

        model.params.min_connections = 5;
        model.params.max_connections = 2;
        model.params.node_count = 3;
        model.regenerate(canvas);

        assert_eq!(
            model.validation_error.as_deref(),
            Some("min connections > max")
        );
        assert_eq!(model.session.as_ref().unwrap().nodes().len(), before);
    }

    #[test]
    fn same_seed_regenerates_same_graph() {
        let canvas = Canvas::new(600.0, 400.0);
        let mut first = model();
        let mut second = model();
        first.regenerate(canvas);
        second.regenerate(canvas);

        let positions = |model: &ViewModel| {
            model
                .session
                .as_ref()
                .unwrap()
                .nodes()
                .iter()
                .map(|node| node.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn scene_follows_ticks() {
        let mut model = model();
        model.regenerate(Canvas::new(600.0, 400.0));
        let session = model.session.as_mut().unwrap();
        assert_eq!(model.scene.circles.len(), session.nodes().len());

        session.tick(&mut model.scene);
        let node = &session.nodes()[0];
        assert_eq!(model.scene.circles[0].center, node.position);
        assert_eq!(model.scene.paths.len(), session.links().len());
    }

    #[test]
    fn new_seed_request_wins_over_same_seed() {
        let mut model = model();
        model.apply_pending(Canvas::new(600.0, 400.0));
        assert_eq!(model.seed, 11);
        assert!(model.pending_regeneration.is_none());

        model.schedule(Regeneration::NewSeed);
        model.schedule(Regeneration::SameSeed);
        assert_eq!(model.pending_regeneration, Some(Regeneration::NewSeed));
        model.apply_pending(Canvas::new(600.0, 400.0));
        assert_ne!(model.seed, 11);
    }

    #[test]
    fn new_seed_changes_seed() {
        let mut model = model();
        model.regenerate_with_new_seed(Canvas::new(600.0, 400.0));
        assert_ne!(model.seed, 11);
    }
}
