//! # Floorplan Core
//!
//! Core logic of the floor-plan editor: the shape model, edge snapping
//! during drag and resize gestures, and the undo/redo history of the shape
//! collection. Rendering and UI live elsewhere; this crate only consumes
//! shape records and gesture events and produces corrected positions,
//! guide lines and new collection states.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                EditorState                  │
//! │  - Selection     - Guide lines              │
//! │  - Viewport      - Gesture commit path      │
//! ├──────────────────────┬──────────────────────┤
//! │  Snapping Engine     │  ShapeCollection     │
//! │  - Edge candidates   │  - Id-keyed edits    │
//! │  - Guide resolution  │  - Edit history      │
//! │  - Resize snapping   │  - Import/export     │
//! ├──────────────────────┴──────────────────────┤
//! │  Shapes  │  Geometry  │  Coordinates        │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod coords;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod schema;
pub mod shape;
pub mod snapping;

pub use canvas::ShapeCollection;
pub use config::EditorConfig;
pub use coords::Viewport;
pub use editor::EditorState;
pub use error::{PlanError, PlanResult};
pub use event::{Direction, EditorEvent, ResizeGesture, TransformEnd};
pub use geometry::{Point, QuarterTurn, Rect};
pub use history::{History, HistoryEntry};
pub use schema::ImportError;
pub use shape::{DoorKind, OpeningDirection, Shape, ShapeId, ShapeKind, ShapeName};
pub use snapping::{
    EdgeCandidate, EdgeCandidates, Guide, LineGuide, LineGuides, NodeGeometry, Orientation,
    OwnEdge, OwnEdges, SnapEdge, TransformerBox,
};

/// Floorplan core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
