//! Editor input events.
//!
//! Gesture positions are absolute (screen) coordinates, as reported by the
//! rendering layer. Events serialize with a `type` tag so that edit scripts
//! can be replayed from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Point;
use crate::shape::{Shape, ShapeId};
use crate::snapping::TransformerBox;

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards negative Y.
    Up,
    /// Towards positive Y.
    Down,
    /// Towards negative X.
    Left,
    /// Towards positive X.
    Right,
}

impl Direction {
    /// Unit vector of this direction on the stage.
    #[must_use]
    pub const fn delta(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// One frame of a resize anchor drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeGesture {
    /// Id of the resized node (shape or its transformer handle).
    pub node_id: String,
    /// Absolute position of the node origin in this frame.
    pub node_position: Point,
    /// Horizontal scale applied by the transformer.
    pub scale_x: f64,
    /// Vertical scale applied by the transformer.
    pub scale_y: f64,
    /// Anchor position before this frame.
    pub previous_anchor: Point,
    /// Anchor position the transformer proposes.
    pub proposed_anchor: Point,
    /// Pointer position.
    pub pointer: Point,
    /// Whether the rotation handle is dragged instead of a resize anchor.
    #[serde(default)]
    pub rotating: bool,
}

/// Final node attributes when a transform gesture ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformEnd {
    /// Id of the transformed node (shape or its transformer handle).
    pub node_id: String,
    /// Absolute position of the node origin.
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Horizontal scale to fold into the shape size.
    pub scale_x: f64,
    /// Vertical scale to fold into the shape size.
    pub scale_y: f64,
}

/// An input the editor reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum EditorEvent {
    /// Add a shape.
    Add {
        /// The new shape.
        shape: Shape,
    },
    /// Delete a shape.
    Delete {
        /// Id of the shape.
        id: ShapeId,
    },
    /// Merge partial attributes into a shape.
    Update {
        /// Id of the shape.
        id: ShapeId,
        /// Attributes to merge, as a JSON object.
        attrs: Value,
    },
    /// Revert the last edit.
    Undo,
    /// Re-apply the last undone edit.
    Redo,
    /// Select a shape, or clear the selection.
    Select {
        /// Shape to select.
        id: Option<ShapeId>,
    },
    /// A node moved during a drag.
    DragMove {
        /// Id of the dragged node.
        node_id: String,
        /// Proposed absolute position.
        position: Point,
    },
    /// A drag finished.
    DragEnd {
        /// Id of the dragged node.
        node_id: String,
        /// Final absolute position.
        position: Point,
    },
    /// A resize anchor moved.
    ResizeMove(ResizeGesture),
    /// The transformer proposes a new box for a door.
    DoorResize {
        /// Id of the resized node.
        node_id: String,
        /// Proposed box.
        proposed: TransformerBox,
    },
    /// A resize or rotate gesture finished.
    TransformEnd(TransformEnd),
    /// An arrow key was pressed.
    Nudge {
        /// Arrow direction.
        direction: Direction,
    },
}

impl EditorEvent {
    /// Whether the event can change the shape collection.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Delete { .. }
                | Self::Update { .. }
                | Self::Undo
                | Self::Redo
                | Self::DragEnd { .. }
                | Self::TransformEnd(_)
                | Self::Nudge { .. }
        )
    }
}
