//! Edit History Integration Tests
//!
//! Tests the undo/redo behaviour of the shape collection end to end:
//! - Undo/redo round trips over random edit sequences
//! - Bounded history length
//! - Discarding undone edits on a new edit
//! - Resetting history on project import
//! - Selection after history moves

use floorplan_core::{
    EditorConfig, EditorState, PlanError, Shape, ShapeCollection, ShapeId, ShapeName,
};
use proptest::prelude::*;
use serde_json::json;

/// Create a sink with a fixed id.
fn sink(id: &str, x: f64) -> Shape {
    Shape::with_defaults(ShapeName::Sink, x, 0.0).with_id(id)
}

/// Ids of the collection, in order.
fn ids(collection: &ShapeCollection) -> Vec<String> {
    collection
        .shapes()
        .iter()
        .map(|s| s.id.to_string())
        .collect()
}

/// Number of edits that can currently be undone.
fn undoable(collection: &ShapeCollection) -> usize {
    collection.history().cursor().map_or(0, |c| c + 1)
}

// ============================================================================
// Random Edit Sequences
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(f64),
    Delete(usize),
    Update(usize, f64),
    Undo,
    Redo,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-500.0f64..500.0).prop_map(Op::Add),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), -500.0f64..500.0).prop_map(|(i, x)| Op::Update(i, x)),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn apply(collection: &mut ShapeCollection, op: &Op) {
    match op {
        Op::Add(x) => {
            collection
                .add(Shape::with_defaults(ShapeName::Box, *x, 0.0))
                .expect("fresh ids never collide");
        }
        Op::Delete(i) => {
            if !collection.is_empty() {
                let id = collection.shapes()[i % collection.len()].id.clone();
                collection.delete(&id).expect("shape exists");
            }
        }
        Op::Update(i, x) => {
            if !collection.is_empty() {
                let id = collection.shapes()[i % collection.len()].id.clone();
                collection
                    .update_with(&id, |shape| shape.x = *x)
                    .expect("shape exists");
            }
        }
        Op::Undo => {
            collection.undo();
        }
        Op::Redo => {
            collection.redo();
        }
    }
}

fn build(ops: &[Op], max_length: usize) -> ShapeCollection {
    let config = EditorConfig::default().with_history_max_length(max_length);
    let mut collection = ShapeCollection::with_config(&config);
    for op in ops {
        apply(&mut collection, op);
    }
    collection
}

proptest! {
    #[test]
    fn prop_undo_then_redo_restores_state(
        ops in prop::collection::vec(arb_op(), 0..40),
        max_length in 1usize..12,
        k in 0usize..16,
    ) {
        let mut collection = build(&ops, max_length);
        let k = k.min(undoable(&collection));
        let before = collection.shapes().to_vec();

        for _ in 0..k {
            prop_assert!(collection.undo());
        }
        for _ in 0..k {
            prop_assert!(collection.redo());
        }
        prop_assert_eq!(collection.shapes(), before.as_slice());
    }

    #[test]
    fn prop_redo_then_undo_restores_state(
        ops in prop::collection::vec(arb_op(), 0..40),
        max_length in 1usize..12,
        k in 0usize..16,
    ) {
        let mut collection = build(&ops, max_length);
        while collection.undo() {}
        let k = k.min(collection.history().len());
        let rewound = collection.shapes().to_vec();

        for _ in 0..k {
            prop_assert!(collection.redo());
        }
        for _ in 0..k {
            prop_assert!(collection.undo());
        }
        prop_assert_eq!(collection.shapes(), rewound.as_slice());
    }

    #[test]
    fn prop_history_never_exceeds_bound(
        ops in prop::collection::vec(arb_op(), 0..60),
        max_length in 1usize..8,
    ) {
        let config = EditorConfig::default().with_history_max_length(max_length);
        let mut collection = ShapeCollection::with_config(&config);
        for op in &ops {
            apply(&mut collection, op);
            prop_assert!(collection.history().len() <= max_length);
            if let Some(cursor) = collection.history().cursor() {
                prop_assert!(cursor < collection.history().len());
            }
        }
    }

    #[test]
    fn prop_ids_stay_unique(ops in prop::collection::vec(arb_op(), 0..40)) {
        let collection = build(&ops, 100);
        let mut seen = std::collections::HashSet::new();
        for shape in collection.shapes() {
            prop_assert!(seen.insert(shape.id.clone()));
        }
    }
}

// ============================================================================
// Bound and Truncation Scenarios
// ============================================================================

#[test]
fn test_oldest_entries_evicted_first() {
    let config = EditorConfig::default().with_history_max_length(3);
    let mut collection = ShapeCollection::with_config(&config);
    for id in ["a", "b", "c", "d", "e"] {
        collection.add(sink(id, 0.0)).expect("add");
    }

    assert_eq!(collection.history().len(), 3);
    assert!(!collection.can_redo());

    assert!(collection.undo());
    assert!(collection.undo());
    assert!(collection.undo());
    assert!(!collection.undo());
    // The two oldest additions can no longer be undone
    assert_eq!(ids(&collection), vec!["a", "b"]);

    assert!(collection.redo());
    assert_eq!(ids(&collection), vec!["a", "b", "c"]);
}

#[test]
fn test_edit_after_undo_discards_redo_entries() {
    let mut collection = ShapeCollection::new();
    for id in ["a", "b", "c", "d"] {
        collection.add(sink(id, 0.0)).expect("add");
    }
    collection.undo();
    collection.undo();
    assert!(collection.can_redo());

    collection
        .update(&ShapeId::from("a"), &json!({"x": 99.0}))
        .expect("update");

    assert_eq!(collection.history().len(), 3);
    assert!(!collection.can_redo());
    assert!(!collection.redo());
    assert_eq!(ids(&collection), vec!["a", "b"]);

    // Undo walks back through the new edit and the surviving additions
    assert!(collection.undo());
    assert!(collection.get(&ShapeId::from("a")).expect("a").x.abs() < 1e-9);
    assert!(collection.undo());
    assert!(collection.undo());
    assert!(collection.is_empty());
    assert!(!collection.undo());
}

#[test]
fn test_mixed_edits_round_trip() {
    let mut collection = ShapeCollection::new();
    collection.add(sink("a", 0.0)).expect("add");
    collection.add(sink("b", 10.0)).expect("add");
    collection.add(sink("c", 20.0)).expect("add");
    collection.delete(&ShapeId::from("b")).expect("delete");
    collection
        .update(&ShapeId::from("c"), &json!({"rotation": 45}))
        .expect("update");
    let final_state = collection.shapes().to_vec();

    while collection.undo() {}
    assert!(collection.is_empty());
    while collection.redo() {}
    assert_eq!(collection.shapes(), final_state.as_slice());
}

// ============================================================================
// Import Reset
// ============================================================================

#[test]
fn test_import_always_resets_history() {
    let project = json!([
        {"id": "p1", "shapeName": "wall", "x": 0, "y": 0, "rotation": 0, "width": 200, "wallThickness": 8},
        {"id": "p2", "shapeName": "toilet", "x": 50, "y": 50, "rotation": 90, "width": 20, "depth": 30}
    ])
    .to_string();

    for depth in [0usize, 1, 5, 120] {
        let mut collection = ShapeCollection::new();
        for i in 0..depth {
            collection.add(sink(&format!("s{i}"), 0.0)).expect("add");
        }
        if depth > 1 {
            collection.undo();
        }

        collection.load_project(&project).expect("load");
        assert!(collection.history().is_empty());
        assert_eq!(collection.history().cursor(), None);
        assert!(!collection.can_undo());
        assert!(!collection.can_redo());
        assert_eq!(ids(&collection), vec!["p1", "p2"]);
    }
}

#[test]
fn test_failed_import_keeps_state_and_history() {
    let mut collection = ShapeCollection::new();
    collection.add(sink("a", 0.0)).expect("add");

    let err = collection
        .load_project(r#"[{"id": "x", "shapeName": "spaceship", "x": 0, "y": 0, "rotation": 0}]"#)
        .expect_err("should reject");
    assert!(matches!(err, PlanError::MalformedProject(_)));
    assert!(err.to_string().contains("malformed project file"));

    assert_eq!(ids(&collection), vec!["a"]);
    assert!(collection.can_undo());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_locked_shape_never_selected() {
    let mut editor = EditorState::default();
    editor
        .add(sink("locked", 0.0).with_draggable(false))
        .expect("add");
    editor.add(sink("free", 100.0)).expect("add");

    editor.select(Some(&ShapeId::from("free")));
    editor.select(Some(&ShapeId::from("locked")));
    assert_eq!(editor.selected(), None);
}

#[test]
fn test_selection_cleared_when_undo_restores_locked_state() {
    let mut editor = EditorState::default();
    editor
        .add(sink("a", 0.0).with_draggable(false))
        .expect("add");
    editor
        .update(&ShapeId::from("a"), &json!({"draggable": true}))
        .expect("unlock");
    assert!(editor.select(Some(&ShapeId::from("a"))));

    editor.undo();
    assert_eq!(editor.selected(), None);
}
