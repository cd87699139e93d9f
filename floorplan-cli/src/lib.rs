//! # Floorplan CLI
//!
//! Command-line host for the floor-plan core.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a project file and summarize its shapes
//! floorplan-cli check plan.json
//!
//! # Drag a shape to a stage position and report where it snaps
//! floorplan-cli snap plan.json --shape 8f2c... --x 202 --y 0
//!
//! # Replay a JSON array of editor events against a project
//! floorplan-cli replay plan.json script.json --output edited.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Editor configuration layered from file, then flags
//! - `commands` - The check, snap and replay commands

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

pub use commands::{CheckReport, CommandError, ReplayReport, SnapReport};

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use floorplan_core::EditorConfig;

/// Command-line arguments for floorplan-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "floorplan-cli")]
#[command(about = "Floor-plan editor core: validate projects, probe snapping, replay edits")]
#[command(version)]
pub struct CliArgs {
    /// Editor configuration file (JSON)
    #[arg(long, env = "FLOORPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapping distance in screen pixels
    #[arg(long, env = "FLOORPLAN_SNAP_TOLERANCE")]
    pub tolerance: Option<f64>,

    /// Maximum number of undoable edits
    #[arg(long, env = "FLOORPLAN_HISTORY_LIMIT")]
    pub history_limit: Option<usize>,

    /// Stroke width of shape outlines
    #[arg(long)]
    pub stroke_width: Option<f64>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of floorplan-cli.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a project file and summarize its shapes.
    Check {
        /// Project file (JSON array of shapes)
        project: PathBuf,
    },
    /// Drag one shape to a stage position and report the snapped result.
    Snap {
        /// Project file (JSON array of shapes)
        project: PathBuf,
        /// Id of the dragged shape
        #[arg(long)]
        shape: String,
        /// Target stage X
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Target stage Y
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Stage zoom factor
        #[arg(long, default_value = "1.0")]
        zoom: f64,
    },
    /// Replay editor events against a project.
    Replay {
        /// Project file (JSON array of shapes)
        project: PathBuf,
        /// Event script (JSON array of editor events)
        script: PathBuf,
        /// Write the resulting project here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Resolved configuration of a CLI run.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Editor tunables.
    pub editor: EditorConfig,
}

impl CliConfig {
    /// Build the configuration from parsed arguments.
    ///
    /// The configuration file is read first; flags override its values.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let mut editor = match &args.config {
            Some(path) => load_editor_config(path)?,
            None => EditorConfig::default(),
        };

        if let Some(tolerance) = args.tolerance {
            editor = editor.with_snap_tolerance(tolerance);
        }
        if let Some(limit) = args.history_limit {
            editor = editor.with_history_max_length(limit);
        }
        if let Some(stroke) = args.stroke_width {
            editor = editor.with_stroke_width(stroke);
        }

        Ok(Self { editor })
    }
}

/// Read an editor configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid
/// configuration.
pub fn load_editor_config(path: &Path) -> anyhow::Result<EditorConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = EditorConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!("Loaded editor config from {}", path.display());
    Ok(config)
}

/// Run a command and return the text to print.
///
/// # Errors
///
/// Returns the error of the command.
pub fn run(config: &CliConfig, command: &Command) -> anyhow::Result<String> {
    match command {
        Command::Check { project } => {
            let report = commands::check_project(project, &config.editor)?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Command::Snap {
            project,
            shape,
            x,
            y,
            zoom,
        } => {
            let report = commands::snap_probe(project, shape, *x, *y, *zoom, &config.editor)?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Command::Replay {
            project,
            script,
            output,
        } => {
            let report = commands::replay_script(project, script, &config.editor)?;
            match output {
                Some(path) => {
                    std::fs::write(path, &report.project)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("Wrote {} shapes to {}", report.shapes, path.display());
                    Ok(serde_json::to_string_pretty(&report.summary())?)
                }
                None => Ok(report.project),
            }
        }
    }
}
