//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::PlanResult;

/// Default maximum number of entries in the edit history.
pub const DEFAULT_HISTORY_MAX_LENGTH: usize = 100;

/// Default snapping distance in screen pixels.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 5.0;

/// Default stroke width of shape outlines in pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Default distance moved by one arrow key press, in pixels.
pub const DEFAULT_NUDGE_STEP: f64 = 1.0;

/// Tunables of the editor core.
///
/// Every field is optional when deserializing; missing fields take their
/// default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undoable edits kept. The oldest edit is dropped
    /// when the limit is reached.
    pub history_max_length: usize,
    /// Maximum distance between an edge and a guide line for a snap.
    pub snap_tolerance: f64,
    /// Stroke width of shape outlines.
    pub stroke_width: f64,
    /// Distance moved by one arrow key press.
    pub nudge_step: f64,
    /// Reject L-shaped houses whose wings are wider than the exterior.
    pub validate_wing_widths: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_max_length: DEFAULT_HISTORY_MAX_LENGTH,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            nudge_step: DEFAULT_NUDGE_STEP,
            validate_wing_widths: false,
        }
    }
}

impl EditorConfig {
    /// Load a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the maximum history length.
    #[must_use]
    pub fn with_history_max_length(mut self, max_length: usize) -> Self {
        self.history_max_length = max_length;
        self
    }

    /// Set the snapping tolerance.
    #[must_use]
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_max_length, 100);
        assert!((config.snap_tolerance - 5.0).abs() < f64::EPSILON);
        assert!(!config.validate_wing_widths);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"historyMaxLength": 50}"#).expect("parse");
        assert_eq!(config.history_max_length, 50);
        assert!((config.stroke_width - DEFAULT_STROKE_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(EditorConfig::from_json("{historyMaxLength}").is_err());
    }
}
