//! The check, snap and replay commands.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use floorplan_core::{
    EditorConfig, EditorEvent, EditorState, LineGuides, PlanError, Point, ShapeId, Viewport,
};
use serde::Serialize;
use thiserror::Error;

/// Failures specific to CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The requested shape is not part of the project.
    #[error("shape not in project: {0}")]
    UnknownShape(String),

    /// An event of a replay script failed.
    #[error("event {index} ({kind}) failed: {source}")]
    EventFailed {
        /// Position of the event in the script.
        index: usize,
        /// Short description of the event.
        kind: String,
        /// Underlying editor error.
        #[source]
        source: PlanError,
    },

    /// The zoom factor is not a positive number.
    #[error("zoom must be positive, got {0}")]
    InvalidZoom(f64),
}

/// Summary of a validated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Number of shapes.
    pub shapes: usize,
    /// Number of shapes that cannot be dragged or selected.
    pub locked: usize,
    /// Shape count per type name.
    pub by_type: BTreeMap<&'static str, usize>,
}

/// Outcome of a snap probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapReport {
    /// Stage position that was requested.
    pub requested: Point,
    /// Stage position after snapping.
    pub snapped: Point,
    /// Guide lines shown for the snap.
    pub guides: LineGuides,
}

/// Outcome of a replayed script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Number of events applied.
    pub events: usize,
    /// Number of shapes after the replay.
    pub shapes: usize,
    /// Whether an undo would still be possible.
    pub can_undo: bool,
    /// Whether a redo would still be possible.
    pub can_redo: bool,
    /// Selected shape after the replay.
    pub selected: Option<ShapeId>,
    /// Resulting project as pretty JSON.
    #[serde(skip)]
    pub project: String,
}

impl ReplayReport {
    /// The report without the project text.
    #[must_use]
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "events": self.events,
            "shapes": self.shapes,
            "canUndo": self.can_undo,
            "canRedo": self.can_redo,
            "selected": self.selected,
        })
    }
}

fn load_editor(project: &Path, config: &EditorConfig) -> anyhow::Result<EditorState> {
    let json = std::fs::read_to_string(project)
        .with_context(|| format!("reading project {}", project.display()))?;
    let mut editor = EditorState::new(config.clone());
    editor
        .load_project(&json)
        .with_context(|| format!("loading project {}", project.display()))?;
    Ok(editor)
}

/// Validate a project file and count its shapes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid project.
pub fn check_project(project: &Path, config: &EditorConfig) -> anyhow::Result<CheckReport> {
    let editor = load_editor(project, config)?;

    let mut by_type = BTreeMap::new();
    for shape in editor.shapes() {
        *by_type.entry(shape.name().as_str()).or_insert(0) += 1;
    }
    let locked = editor.shapes().iter().filter(|s| !s.draggable).count();

    tracing::info!(
        "Project {} is valid: {} shapes",
        project.display(),
        editor.shapes().len()
    );
    Ok(CheckReport {
        shapes: editor.shapes().len(),
        locked,
        by_type,
    })
}

/// Drag a shape to a stage position and report where it snaps.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded, the zoom is not
/// positive, or the shape is not part of the project.
pub fn snap_probe(
    project: &Path,
    shape: &str,
    x: f64,
    y: f64,
    zoom: f64,
    config: &EditorConfig,
) -> anyhow::Result<SnapReport> {
    if zoom.is_nan() || zoom <= 0.0 {
        return Err(CommandError::InvalidZoom(zoom).into());
    }
    let mut editor = load_editor(project, config)?;
    if !editor.collection().contains(&ShapeId::from(shape)) {
        return Err(CommandError::UnknownShape(shape.to_string()).into());
    }
    editor.viewport = Viewport::new(zoom, 0.0, 0.0);

    let requested = Point::new(x, y);
    let absolute = editor.viewport.to_absolute(requested);
    let snapped = editor.drag_move(shape, absolute)?;

    Ok(SnapReport {
        requested,
        snapped: editor.viewport.to_stage_relative(snapped),
        guides: *editor.guides(),
    })
}

/// Short name of an event for error messages.
fn event_kind(event: &EditorEvent) -> String {
    serde_json::to_value(event)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Apply every event of a script to a project.
///
/// Replay stops at the first failing event.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded or an event fails.
pub fn replay_script(
    project: &Path,
    script: &Path,
    config: &EditorConfig,
) -> anyhow::Result<ReplayReport> {
    let mut editor = load_editor(project, config)?;
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("reading script {}", script.display()))?;
    let events: Vec<EditorEvent> = serde_json::from_str(&text)
        .with_context(|| format!("parsing script {}", script.display()))?;

    for (index, event) in events.iter().enumerate() {
        editor
            .process_event(event)
            .map_err(|source| CommandError::EventFailed {
                index,
                kind: event_kind(event),
                source,
            })?;
    }

    let collection = editor.collection();
    tracing::info!(
        "Replayed {} events, {} shapes remain",
        events.len(),
        collection.len()
    );
    Ok(ReplayReport {
        events: events.len(),
        shapes: collection.len(),
        can_undo: collection.can_undo(),
        can_redo: collection.can_redo(),
        selected: editor.selected().cloned(),
        project: collection.to_json_pretty()?,
    })
}
