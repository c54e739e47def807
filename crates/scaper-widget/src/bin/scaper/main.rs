//! Render widget specifications with the headless engine

mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scaper_core::{BridgeSettings, Container};
use scaper_data::coerce;
use scaper_widget::{HeadlessEngine, Specification, Widget};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "scaper",
    version,
    about = "Check and render widget specifications without a browser"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bridge settings JSON file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a specification and print the resulting scene
    Render {
        /// Path to specification JSON file
        spec: PathBuf,
        /// Container id to render into
        #[arg(long, default_value = "scaper-0")]
        container: String,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    },
    /// Coerce a specification's columns and print their types
    Check {
        /// Path to specification JSON file
        spec: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let settings = match &cli.settings {
        Some(path) => BridgeSettings::from_path(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => BridgeSettings::default(),
    };

    match cli.command {
        Commands::Render {
            spec,
            container,
            width,
            height,
        } => render(&spec, settings, Container::new(container, width, height)),
        Commands::Check { spec } => check(&spec, &settings),
    }
}

fn load_spec(path: &Path) -> Result<Specification> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read specification: {}", path.display()))?;
    Specification::from_json_str(&json)
        .with_context(|| format!("Failed to parse specification: {}", path.display()))
}

fn render(path: &Path, settings: BridgeSettings, container: Container) -> Result<()> {
    let spec = load_spec(path)?;
    info!("Rendering {} ({:?})", path.display(), spec.shape());

    let mut widget = Widget::new(Arc::new(HeadlessEngine::new()), container).with_settings(settings);
    let report = widget.render_value(&spec)?;

    let failures: Vec<_> = report
        .plots
        .failures
        .iter()
        .map(|f| json!({ "index": f.index, "type": f.kind, "error": f.error.to_string() }))
        .collect();
    let replay = report.replay.as_ref().map(|r| {
        json!({
            "applied": r.applied,
            "skipped": r.skipped,
            "failures": r.failures.iter()
                .map(|f| json!({ "index": f.index, "type": f.kind, "error": f.error.to_string() }))
                .collect::<Vec<_>>(),
        })
    });
    let scene = widget
        .scene()
        .map(|handle| {
            let scene = handle.lock();
            scene.snapshot()
        })
        .unwrap_or_default();

    let summary = json!({
        "shape": report.shape,
        "plot_failures": failures,
        "replay": replay,
        "layout_error": report.layout_error.as_ref().map(|e| e.to_string()),
        "scene": scene,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn check(path: &Path, settings: &BridgeSettings) -> Result<()> {
    let spec = load_spec(path)?;
    let data = coerce(&spec.data, &spec.types, &settings.null_config)
        .with_context(|| format!("Invalid columns in {}", path.display()))?;

    println!("Shape:   {:?}", spec.shape());
    println!("Rows:    {}", data.num_rows());
    for name in data.column_names() {
        let tag = data
            .type_tag(name)
            .map(|tag| tag.to_string())
            .unwrap_or_default();
        println!("{:18} {}", format!("{}:", name), tag);
    }
    println!("Plots:   {}", spec.plots().len());
    println!("Queue:   {}", spec.queue().len());
    Ok(())
}
