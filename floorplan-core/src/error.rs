//! Error types for floor-plan operations.

use thiserror::Error;

use crate::schema::ImportError;

/// Result type for floor-plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur in floor-plan operations.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Shape not found in the collection.
    #[error("Shape not found: {0}")]
    ShapeNotFound(String),

    /// A moved or resized node could not be matched to any shape, not even
    /// after stripping the transformer handle suffix. This is a caller
    /// contract breach (stale node reference).
    #[error("Moved node does not belong to any shape: {0}")]
    UnresolvedNode(String),

    /// A gesture targeted a shape with `draggable = false`.
    #[error("Shape is locked: {0}")]
    Locked(String),

    /// An update attempted to change an attribute that is fixed at creation.
    #[error("Attribute cannot be changed after creation: {0}")]
    ImmutableField(&'static str),

    /// Partial attributes could not be merged into a valid shape record.
    #[error("Invalid shape attributes: {0}")]
    InvalidPatch(String),

    /// A shape with the same id already exists in the collection.
    #[error("Duplicate shape id: {0}")]
    DuplicateId(String),

    /// A project file failed validation.
    #[error(transparent)]
    MalformedProject(#[from] ImportError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
