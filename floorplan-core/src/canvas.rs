//! Shape collection store.
//!
//! [`ShapeCollection`] owns the ordered list of shapes and the edit
//! [`History`]. Its public surface is keyed by [`ShapeId`]; positions are
//! resolved internally right before an edit is recorded, so callers never
//! see the index-based history entries.

use serde_json::Value;

use crate::config::EditorConfig;
use crate::error::{PlanError, PlanResult};
use crate::history::History;
use crate::schema;
use crate::shape::{Shape, ShapeId};

/// Fields that are fixed once a shape exists.
const IMMUTABLE_FIELDS: [&str; 2] = ["id", "shapeName"];

/// The authoritative list of shapes on the floor plan.
#[derive(Debug, Clone)]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
    history: History,
    check_wings: bool,
}

impl Default for ShapeCollection {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default())
    }
}

impl ShapeCollection {
    /// Create an empty collection with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection using the history bound and validation
    /// rules of `config`.
    #[must_use]
    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            shapes: Vec::new(),
            history: History::with_max_length(config.history_max_length),
            check_wings: config.validate_wing_widths,
        }
    }

    /// All shapes, in drawing order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get a shape by id.
    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    /// Check if a shape with the given id exists.
    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// The edit history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    fn require_index(&self, id: &ShapeId) -> PlanResult<usize> {
        self.index_of(id)
            .ok_or_else(|| PlanError::ShapeNotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Append a shape and record the addition.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DuplicateId`] if the id is already taken and
    /// [`PlanError::InvalidPatch`] if the shape violates its constraints.
    pub fn add(&mut self, shape: Shape) -> PlanResult<()> {
        if self.contains(&shape.id) {
            return Err(PlanError::DuplicateId(shape.id.to_string()));
        }
        shape
            .validate(self.check_wings)
            .map_err(PlanError::InvalidPatch)?;

        let index = self.shapes.len();
        tracing::debug!("Adding {} {} at index {index}", shape.name(), shape.id);
        self.shapes.push(shape.clone());
        self.history.record_add(shape, index);
        Ok(())
    }

    /// Remove a shape and record the deletion.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ShapeNotFound`] if no shape has this id.
    pub fn delete(&mut self, id: &ShapeId) -> PlanResult<Shape> {
        let index = self.require_index(id)?;
        let removed = self.shapes.remove(index);
        tracing::debug!("Deleted {} {id} from index {index}", removed.name());
        self.history.record_delete(removed.clone(), index);
        Ok(removed)
    }

    /// Merge partial attributes into a shape and record the update.
    ///
    /// `attrs` is a JSON object using the project file field names, legacy
    /// aliases included. Keys override the existing values, unknown keys
    /// are ignored. The merged
    /// record must still be valid for its variant.
    ///
    /// # Errors
    ///
    /// - [`PlanError::ShapeNotFound`] if no shape has this id.
    /// - [`PlanError::ImmutableField`] if `attrs` changes `id` or `shapeName`.
    /// - [`PlanError::InvalidPatch`] if `attrs` is not an object or the
    ///   merged record is invalid.
    pub fn update(&mut self, id: &ShapeId, attrs: &Value) -> PlanResult<&Shape> {
        let index = self.require_index(id)?;
        let Value::Object(patch) = attrs else {
            return Err(PlanError::InvalidPatch(
                "attributes must be a JSON object".to_string(),
            ));
        };

        let name = self.shapes[index].name();
        let Value::Object(mut record) = serde_json::to_value(&self.shapes[index])? else {
            return Err(PlanError::InvalidPatch(
                "shape did not serialize to an object".to_string(),
            ));
        };
        for (key, value) in patch {
            let key = name.canonical_field(key);
            if let Some(field) = IMMUTABLE_FIELDS.iter().find(|f| **f == key) {
                if record.get(key) != Some(value) {
                    return Err(PlanError::ImmutableField(*field));
                }
            }
            record.insert(key.to_string(), value.clone());
        }

        let current: Shape = serde_json::from_value(Value::Object(record))
            .map_err(|e| PlanError::InvalidPatch(e.to_string()))?;
        self.commit_update(index, current)
    }

    /// Edit a shape in place through a closure and record the update.
    ///
    /// # Errors
    ///
    /// - [`PlanError::ShapeNotFound`] if no shape has this id.
    /// - [`PlanError::ImmutableField`] if the closure changes the id or the
    ///   variant.
    /// - [`PlanError::InvalidPatch`] if the edited shape is invalid.
    pub fn update_with<F>(&mut self, id: &ShapeId, f: F) -> PlanResult<&Shape>
    where
        F: FnOnce(&mut Shape),
    {
        let index = self.require_index(id)?;
        let mut current = self.shapes[index].clone();
        f(&mut current);
        self.commit_update(index, current)
    }

    fn commit_update(&mut self, index: usize, current: Shape) -> PlanResult<&Shape> {
        let previous = &self.shapes[index];
        if current.id != previous.id {
            return Err(PlanError::ImmutableField("id"));
        }
        if current.name() != previous.name() {
            return Err(PlanError::ImmutableField("shapeName"));
        }
        current
            .validate(self.check_wings)
            .map_err(PlanError::InvalidPatch)?;

        let previous = std::mem::replace(&mut self.shapes[index], current.clone());
        tracing::debug!("Updated {} at index {index}", current.id);
        self.history.record_update(previous, current, index);
        Ok(&self.shapes[index])
    }

    /// Replace every shape and reset the history.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DuplicateId`] if two shapes share an id, in
    /// which case nothing changes.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) -> PlanResult<()> {
        let mut seen = std::collections::HashSet::with_capacity(shapes.len());
        if let Some(dup) = shapes.iter().find(|s| !seen.insert(&s.id)) {
            return Err(PlanError::DuplicateId(dup.id.to_string()));
        }

        tracing::info!("Replacing collection with {} shapes", shapes.len());
        self.shapes = shapes;
        self.history.clear();
        Ok(())
    }

    /// Validate a project file and replace the collection with its shapes.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::MalformedProject`] if the file is rejected; the
    /// collection and its history are left untouched.
    pub fn load_project(&mut self, json: &str) -> PlanResult<()> {
        let shapes = schema::parse_project(json, self.check_wings).inspect_err(|e| {
            tracing::warn!("Rejected project: {e}");
        })?;
        self.replace_all(shapes)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Revert the most recent edit. Returns `false` at the start of history.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.shapes)
    }

    /// Re-apply the most recently undone edit. Returns `false` at the end
    /// of history.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.shapes)
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Serialize the collection as a project file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PlanResult<String> {
        Ok(schema::to_json(&self.shapes)?)
    }

    /// Serialize the collection as an indented project file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> PlanResult<String> {
        Ok(schema::to_json_pretty(&self.shapes)?)
    }
}
