//! # Edit History
//!
//! A bounded, linear log of shape mutations with a cursor pointing at the
//! most recently applied entry.
//!
//! ```text
//!   entries:  [ add | update | update | delete ]
//!                                 ^ cursor
//!   undo  -> apply the inverse of entries[cursor], move cursor left
//!   redo  -> move cursor right, re-apply entries[cursor]
//!   record -> drop everything right of the cursor, append, cursor = last
//! ```
//!
//! Entries address shapes by their position in the collection at the time
//! of the edit. Positions stay valid because entries are always undone and
//! redone in order relative to the cursor.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HISTORY_MAX_LENGTH;
use crate::shape::Shape;

/// One recorded mutation of the shape collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HistoryEntry {
    /// A shape was inserted at `index`.
    Add {
        /// The inserted shape.
        current: Shape,
        /// Position of the inserted shape.
        index: usize,
    },
    /// The shape at `index` was removed.
    Delete {
        /// The removed shape.
        previous: Shape,
        /// Position the shape was removed from.
        index: usize,
    },
    /// The shape at `index` was replaced.
    Update {
        /// The shape before the edit.
        previous: Shape,
        /// The shape after the edit.
        current: Shape,
        /// Position of the edited shape.
        index: usize,
    },
}

impl HistoryEntry {
    /// Position in the collection this entry applies to.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Add { index, .. } | Self::Delete { index, .. } | Self::Update { index, .. } => {
                *index
            }
        }
    }
}

/// Undo/redo log with a bounded number of entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// Recorded entries, oldest first.
    entries: VecDeque<HistoryEntry>,
    /// Index of the most recently applied entry, `None` when nothing can
    /// be undone.
    cursor: Option<usize>,
    /// Maximum number of entries (oldest entries dropped when exceeded).
    max_length: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_HISTORY_MAX_LENGTH)
    }

    /// Create an empty history keeping at most `max_length` entries.
    ///
    /// A bound of zero is raised to one.
    #[must_use]
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_length: max_length.max(1),
        }
    }

    /// Record that `shape` was inserted at `index`.
    pub fn record_add(&mut self, shape: Shape, index: usize) {
        self.record(HistoryEntry::Add {
            current: shape,
            index,
        });
    }

    /// Record that `shape` was removed from `index`.
    pub fn record_delete(&mut self, shape: Shape, index: usize) {
        self.record(HistoryEntry::Delete {
            previous: shape,
            index,
        });
    }

    /// Record that the shape at `index` changed from `previous` to `current`.
    pub fn record_update(&mut self, previous: Shape, current: Shape, index: usize) {
        self.record(HistoryEntry::Update {
            previous,
            current,
            index,
        });
    }

    /// Append an entry, discarding any undone entries first.
    pub fn record(&mut self, entry: HistoryEntry) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        if keep < self.entries.len() {
            tracing::debug!(
                "Discarding {} undone history entries",
                self.entries.len() - keep
            );
            self.entries.truncate(keep);
        }

        if self.entries.len() >= self.max_length {
            self.entries.pop_front();
        }

        tracing::debug!("Recording history entry at index {}", entry.index());
        self.entries.push_back(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Revert the entry under the cursor on `shapes`.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// undo.
    pub fn undo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };

        match &self.entries[cursor] {
            HistoryEntry::Update {
                previous, index, ..
            } => replace_at(shapes, *index, previous.clone()),
            HistoryEntry::Add { index, .. } => remove_at(shapes, *index),
            HistoryEntry::Delete { previous, index } => insert_at(shapes, *index, previous.clone()),
        }

        self.cursor = cursor.checked_sub(1);
        tracing::debug!("Undo applied, cursor now {:?}", self.cursor);
        true
    }

    /// Re-apply the entry after the cursor on `shapes`.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// redo.
    pub fn redo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        let Some(entry) = self.entries.get(next) else {
            return false;
        };

        match entry {
            HistoryEntry::Update { current, index, .. } => {
                replace_at(shapes, *index, current.clone());
            }
            HistoryEntry::Add { current, index } => insert_at(shapes, *index, current.clone()),
            HistoryEntry::Delete { index, .. } => remove_at(shapes, *index),
        }

        self.cursor = Some(next);
        tracing::debug!("Redo applied, cursor now {next}");
        true
    }

    /// Drop every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |cursor| cursor + 1) < self.entries.len()
    }

    /// Index of the most recently applied entry.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of recorded entries, including undone ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

fn replace_at(shapes: &mut [Shape], index: usize, shape: Shape) {
    if let Some(slot) = shapes.get_mut(index) {
        *slot = shape;
    } else {
        tracing::warn!("History index {index} out of range for update");
    }
}

fn remove_at(shapes: &mut Vec<Shape>, index: usize) {
    if index < shapes.len() {
        shapes.remove(index);
    } else {
        tracing::warn!("History index {index} out of range for removal");
    }
}

fn insert_at(shapes: &mut Vec<Shape>, index: usize, shape: Shape) {
    if index > shapes.len() {
        tracing::warn!("History index {index} out of range for insertion, appending");
        shapes.push(shape);
    } else {
        shapes.insert(index, shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeKind, ShapeName};

    fn wall(id: &str, width: f64) -> Shape {
        Shape::new(
            ShapeKind::Wall {
                width,
                wall_thickness: 10.0,
            },
            0.0,
            0.0,
        )
        .with_id(id)
    }

    /// Add a shape the way the collection does: mutate, then record.
    fn add(history: &mut History, shapes: &mut Vec<Shape>, shape: Shape) {
        shapes.push(shape.clone());
        history.record_add(shape, shapes.len() - 1);
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        let mut shapes = Vec::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.cursor(), None);
        assert!(!history.undo(&mut shapes));
        assert!(!history.redo(&mut shapes));
    }

    #[test]
    fn test_undo_redo_add() {
        let mut history = History::new();
        let mut shapes = Vec::new();
        add(&mut history, &mut shapes, wall("a", 100.0));

        assert!(history.undo(&mut shapes));
        assert!(shapes.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(history.can_redo());

        assert!(history.redo(&mut shapes));
        assert_eq!(shapes, vec![wall("a", 100.0)]);
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_update() {
        let mut history = History::new();
        let mut shapes = vec![wall("a", 100.0)];
        shapes[0] = wall("a", 200.0);
        history.record_update(wall("a", 100.0), wall("a", 200.0), 0);

        history.undo(&mut shapes);
        assert_eq!(shapes, vec![wall("a", 100.0)]);
        history.redo(&mut shapes);
        assert_eq!(shapes, vec![wall("a", 200.0)]);
    }

    #[test]
    fn test_undo_redo_delete_restores_position() {
        let mut history = History::new();
        let mut shapes = vec![wall("a", 1.0), wall("b", 2.0), wall("c", 3.0)];
        let removed = shapes.remove(1);
        history.record_delete(removed, 1);

        history.undo(&mut shapes);
        assert_eq!(shapes[1].id.as_str(), "b");
        assert_eq!(shapes.len(), 3);

        history.redo(&mut shapes);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].id.as_str(), "c");
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let mut history = History::new();
        let mut shapes = Vec::new();
        for id in ["a", "b", "c"] {
            add(&mut history, &mut shapes, wall(id, 1.0));
        }
        history.undo(&mut shapes);
        history.undo(&mut shapes);
        assert_eq!(history.cursor(), Some(0));

        add(&mut history, &mut shapes, wall("d", 1.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());
        assert!(!history.redo(&mut shapes));

        let ids: Vec<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_record_after_full_rewind() {
        let mut history = History::new();
        let mut shapes = Vec::new();
        add(&mut history, &mut shapes, wall("a", 1.0));
        history.undo(&mut shapes);

        add(&mut history, &mut shapes, wall("b", 1.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_bounded_length_drops_oldest() {
        let mut history = History::with_max_length(3);
        let mut shapes = Vec::new();
        for i in 0..5 {
            add(&mut history, &mut shapes, wall(&format!("s{i}"), 1.0));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        let indices: Vec<_> = history.entries().map(HistoryEntry::index).collect();
        assert_eq!(indices, vec![2, 3, 4]);

        // Only the three newest additions can be undone
        while history.undo(&mut shapes) {}
        let ids: Vec<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1"]);
    }

    #[test]
    fn test_zero_bound_keeps_one_entry() {
        let mut history = History::with_max_length(0);
        let mut shapes = Vec::new();
        add(&mut history, &mut shapes, wall("a", 1.0));
        add(&mut history, &mut shapes, wall("b", 1.0));
        assert_eq!(history.max_length(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        let mut shapes = Vec::new();
        add(
            &mut history,
            &mut shapes,
            Shape::with_defaults(ShapeName::Box, 0.0, 0.0),
        );
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = HistoryEntry::Delete {
            previous: wall("a", 1.0),
            index: 4,
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["action"], "delete");
        assert_eq!(json["index"], 4);
        assert_eq!(json["previous"]["shapeName"], "wall");
    }
}
