mod app;
mod export;
mod layout;
mod network;
mod preset;
mod util;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::export::{DiagramStyle, EXPORT_FILE_NAME, export_svg};
use crate::layout::{LayoutSession, Spacing};
use crate::network::{Canvas, Link, Node, generate};
use crate::preset::Preset;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON preset with generation and layout parameters.
    #[arg(long)]
    preset: Option<PathBuf>,
    /// Seed for the first generated graph; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 960.0)]
    width: f32,
    #[arg(long, default_value_t = 640.0)]
    height: f32,
    /// Directory for exported SVGs and saved presets.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Generate, settle and write an SVG to this path without opening a window.
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    max_ticks: u64,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodeweave=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let preset = match &args.preset {
        Some(path) => Preset::load(path)?,
        None => Preset::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "starting");

    if let Some(path) = &args.export {
        let canvas = Canvas::new(args.width, args.height);
        return run_headless(&preset, canvas, seed, args.max_ticks, path);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width + 340.0, args.height + 40.0]),
        ..Default::default()
    };

    let output_dir = args.output_dir;
    eframe::run_native(
        "nodeweave",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::NetworkApp::new(
                cc,
                preset,
                seed,
                output_dir,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the window: {error}"))
}

fn run_headless(
    preset: &Preset,
    canvas: Canvas,
    seed: u64,
    max_ticks: u64,
    path: &Path,
) -> Result<()> {
    let params = &preset.generation;
    let graph = generate(params, canvas, &mut StdRng::seed_from_u64(seed))
        .context("invalid generation parameters")?;
    let mut session = LayoutSession::new(
        graph,
        canvas,
        preset.layout.clone(),
        Spacing::from_params(params),
    );

    let ticks = session.run_until_settled(max_ticks, &mut |_: &[Node], _: &[Link]| {});
    if session.is_running() {
        warn!(ticks, alpha = session.alpha(), "layout did not settle before the tick limit");
    } else {
        info!(ticks, "layout settled");
    }

    let target = if path.is_dir() {
        path.join(EXPORT_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let style = DiagramStyle::default().with_dashed(params.dashed_lines);
    export_svg(&session, &style, &target)
}
