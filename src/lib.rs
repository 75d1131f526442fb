//! # plotkit
//!
//! Procedural drawings for pen plotters. A configuration names a canvas, a
//! seed and an ordered list of generator and modifier steps; the pipeline
//! folds them into one nested geometry model, which is then written as an
//! SVG preview and as G-code for the configured machine.
//!
//! ## Architecture
//!
//! The workspace is split into crates:
//!
//! 1. **plotkit-core** - Geometry model, paths, transforms, masks, step types, errors
//! 2. **plotkit-designer** - Generators, modifiers, chains, fills, pipeline, SVG
//! 3. **plotkit-camtools** - Toolpath traversal, ordering, arc fitting, G-code dialects
//! 4. **plotkit-settings** - JSON/TOML configuration files
//! 5. **plotkit** - This facade and the command-line driver

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use plotkit_camtools::{
    emit, emit_with_stats, MachineConfig, PostProcessor, ToolpathError, ToolpathStats,
};
pub use plotkit_core::{
    Canvas, GeometryModel, MaskConfig, MaskKind, ParamValue, Params, Path as GeometryPath,
    PipelineError, PipelineStep, Point,
};
pub use plotkit_designer::{
    find_chains, render_svg, Diagnostic, Pipeline, PipelineOutput, StepContext,
};
pub use plotkit_settings::{Config, ConfigFormat, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// File name of the SVG preview written by [`run_config_file`].
pub const SVG_FILE_NAME: &str = "drawing.svg";
/// File name of the G-code program written by [`run_config_file`].
pub const GCODE_FILE_NAME: &str = "drawing.gcode";

/// Initialize logging with the default configuration
///
/// Human-readable output on stderr at `info`, overridden by `RUST_LOG`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

/// Everything produced from one configuration.
#[derive(Debug)]
pub struct Drawing {
    pub output: PipelineOutput,
    pub svg: String,
    pub gcode: String,
    pub stats: ToolpathStats,
}

/// Runs the pipeline for `config` and renders both outputs. Skipped steps
/// are logged and kept in [`Drawing::output`]; only machine settings the
/// emitter cannot use make this fail.
pub fn render(config: &Config) -> anyhow::Result<Drawing> {
    let output = Pipeline::new(config.canvas, config.seed)
        .with_chain_tolerance(config.chain_tolerance)
        .run(&config.steps);
    for diagnostic in &output.diagnostics {
        warn!("{diagnostic}");
    }

    let svg = render_svg(&output.model, &config.canvas);
    let (gcode, stats) =
        emit_with_stats(&output.model, &config.machine).context("Failed to emit G-code")?;

    Ok(Drawing {
        output,
        svg,
        gcode,
        stats,
    })
}

/// Paths of the files written by [`run_config_file`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub svg_path: PathBuf,
    pub gcode_path: PathBuf,
    pub skipped_steps: usize,
    pub stats: ToolpathStats,
}

/// Loads `config_path`, renders it, and writes [`SVG_FILE_NAME`] and
/// [`GCODE_FILE_NAME`] into `out_dir`, creating the directory if needed.
pub fn run_config_file(config_path: &Path, out_dir: &Path) -> anyhow::Result<RunSummary> {
    let config = Config::load_from_file(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let drawing = render(&config)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let svg_path = out_dir.join(SVG_FILE_NAME);
    let gcode_path = out_dir.join(GCODE_FILE_NAME);
    std::fs::write(&svg_path, &drawing.svg)
        .with_context(|| format!("Failed to write {}", svg_path.display()))?;
    std::fs::write(&gcode_path, &drawing.gcode)
        .with_context(|| format!("Failed to write {}", gcode_path.display()))?;

    info!(
        "Wrote {} and {} ({} paths, {} pen lifts, {:.0}s estimated)",
        svg_path.display(),
        gcode_path.display(),
        drawing.output.model.total_path_count(),
        drawing.stats.pen_lifts,
        drawing.stats.estimated_seconds
    );

    Ok(RunSummary {
        svg_path,
        gcode_path,
        skipped_steps: drawing.output.diagnostics.len(),
        stats: drawing.stats,
    })
}
