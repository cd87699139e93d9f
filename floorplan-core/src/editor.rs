//! Editor state: the shape collection plus everything an interactive session
//! tracks around it.
//!
//! [`EditorState`] ties the snapping engine to the collection. Gesture
//! frames (`drag_move`, `resize_move`, `constrain_door_resize`) only compute
//! positions and guide lines; the collection changes once per gesture, on
//! `drag_end` or `transform_end`, so every gesture is a single undoable edit.

use serde_json::Value;

use crate::canvas::ShapeCollection;
use crate::config::EditorConfig;
use crate::coords::Viewport;
use crate::error::{PlanError, PlanResult};
use crate::event::{Direction, EditorEvent, ResizeGesture, TransformEnd};
use crate::geometry::Point;
use crate::shape::{Shape, ShapeId};
use crate::snapping::{
    apply_guides, compute_edge_candidates, compute_snapping_edges, constrain_door_box,
    refine_anchor_position, resolve_guides, resolve_moving_shape, snap_resize, LineGuides,
    NodeGeometry, ResizeAxes, TransformerBox,
};

/// The complete editor state.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    collection: ShapeCollection,
    config: EditorConfig,
    /// Placement of the stage on screen.
    pub viewport: Viewport,
    selected: Option<ShapeId>,
    guides: LineGuides,
    /// Box returned by the previous door resize frame.
    door_box: Option<(ShapeId, TransformerBox)>,
}

impl EditorState {
    /// Create an empty editor.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            collection: ShapeCollection::with_config(&config),
            config,
            viewport: Viewport::default(),
            selected: None,
            guides: LineGuides::default(),
            door_box: None,
        }
    }

    /// The shape collection.
    #[must_use]
    pub const fn collection(&self) -> &ShapeCollection {
        &self.collection
    }

    /// All shapes, in drawing order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.collection.shapes()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Guide lines currently shown.
    #[must_use]
    pub const fn guides(&self) -> &LineGuides {
        &self.guides
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Id of the selected shape.
    #[must_use]
    pub const fn selected(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    /// The selected shape.
    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.collection.get(id))
    }

    /// Select a shape, or clear the selection with `None`.
    ///
    /// Locked and unknown shapes cannot be selected; the selection is
    /// cleared instead. Returns whether a shape ended up selected.
    pub fn select(&mut self, id: Option<&ShapeId>) -> bool {
        self.selected = match id.map(|id| (id, self.collection.get(id))) {
            None => None,
            Some((_, Some(shape))) if shape.draggable => Some(shape.id.clone()),
            Some((id, Some(_))) => {
                tracing::warn!("Refusing to select locked shape {id}");
                None
            }
            Some((id, None)) => {
                tracing::warn!("Refusing to select unknown shape {id}");
                None
            }
        };
        self.selected.is_some()
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if it no longer points at a selectable shape.
    fn prune_selection(&mut self) {
        let stale = self
            .selected
            .as_ref()
            .is_some_and(|id| !self.collection.get(id).is_some_and(|s| s.draggable));
        if stale {
            tracing::debug!("Clearing stale selection");
            self.selected = None;
        }
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Add a shape.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::add`].
    pub fn add(&mut self, shape: Shape) -> PlanResult<()> {
        self.collection.add(shape)
    }

    /// Delete a shape, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::delete`].
    pub fn delete(&mut self, id: &ShapeId) -> PlanResult<Shape> {
        let removed = self.collection.delete(id)?;
        self.prune_selection();
        Ok(removed)
    }

    /// Merge partial attributes into a shape.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::update`].
    pub fn update(&mut self, id: &ShapeId, attrs: &Value) -> PlanResult<()> {
        self.collection.update(id, attrs)?;
        self.prune_selection();
        Ok(())
    }

    /// Revert the last edit.
    pub fn undo(&mut self) -> bool {
        let changed = self.collection.undo();
        self.prune_selection();
        changed
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> bool {
        let changed = self.collection.redo();
        self.prune_selection();
        changed
    }

    /// Replace every shape, resetting history and selection.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::replace_all`].
    pub fn replace_all(&mut self, shapes: Vec<Shape>) -> PlanResult<()> {
        self.collection.replace_all(shapes)?;
        self.selected = None;
        self.guides.clear();
        Ok(())
    }

    /// Load a project file, resetting history and selection.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::load_project`]. On error nothing changes.
    pub fn load_project(&mut self, json: &str) -> PlanResult<()> {
        self.collection.load_project(json)?;
        tracing::info!("Loaded project with {} shapes", self.collection.len());
        self.selected = None;
        self.guides.clear();
        Ok(())
    }

    /// Move the selected shape by one nudge step.
    ///
    /// Returns `false` when nothing is selected.
    ///
    /// # Errors
    ///
    /// See [`ShapeCollection::update_with`].
    pub fn nudge(&mut self, direction: Direction) -> PlanResult<bool> {
        let Some(id) = self.selected.clone() else {
            return Ok(false);
        };
        let (dx, dy) = direction.delta();
        let step = self.config.nudge_step;
        self.collection.update_with(&id, |shape| {
            shape.x += dx * step;
            shape.y += dy * step;
        })?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Find the shape behind a gesture node, refusing locked shapes.
    fn gesture_target<'a>(shapes: &'a [Shape], node_id: &str) -> PlanResult<&'a Shape> {
        let shape = resolve_moving_shape(shapes, node_id)?;
        if !shape.draggable {
            tracing::warn!("Ignoring gesture on locked shape {}", shape.id);
            return Err(PlanError::Locked(shape.id.to_string()));
        }
        Ok(shape)
    }

    /// Snap a dragged node and update the guide lines.
    ///
    /// Returns the absolute position the node should be drawn at. The
    /// collection is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnresolvedNode`] if the node belongs to no
    /// shape, or [`PlanError::Locked`] if the shape is locked.
    pub fn drag_move(&mut self, node_id: &str, position: Point) -> PlanResult<Point> {
        let shape = Self::gesture_target(self.collection.shapes(), node_id)?;
        let stroke = self.config.stroke_width;

        let candidates =
            compute_edge_candidates(self.collection.shapes(), &shape.id, stroke, &self.viewport);
        let node = NodeGeometry::of_shape(shape, position, &self.viewport, stroke);
        let guides = resolve_guides(
            &candidates,
            &compute_snapping_edges(&node),
            self.config.snap_tolerance,
        );

        self.guides.show_drag(&guides);
        Ok(apply_guides(position, &guides))
    }

    /// Commit the final position of a drag.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnresolvedNode`] if the node belongs to no
    /// shape, or [`PlanError::Locked`] if the shape is locked.
    pub fn drag_end(&mut self, node_id: &str, position: Point) -> PlanResult<()> {
        let id = Self::gesture_target(self.collection.shapes(), node_id)?.id.clone();
        let stage = self.viewport.to_stage_relative(position);
        self.guides.clear();
        self.collection.update_with(&id, |shape| {
            shape.x = stage.x;
            shape.y = stage.y;
        })?;
        Ok(())
    }

    /// Snap a resize anchor and update the guide lines.
    ///
    /// Returns the absolute position the anchor should take.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnresolvedNode`] if the node belongs to no
    /// shape, or [`PlanError::Locked`] if the shape is locked.
    pub fn resize_move(&mut self, gesture: &ResizeGesture) -> PlanResult<Point> {
        let shape = Self::gesture_target(self.collection.shapes(), &gesture.node_id)?;
        if gesture.rotating {
            return Ok(gesture.proposed_anchor);
        }
        let stroke = self.config.stroke_width;

        let candidates =
            compute_edge_candidates(self.collection.shapes(), &shape.id, stroke, &self.viewport);
        let axes = ResizeAxes::detect(gesture.scale_x, gesture.scale_y, shape.rotation);
        let snap = snap_resize(
            &candidates,
            gesture.pointer,
            gesture.previous_anchor,
            self.config.snap_tolerance,
            axes,
        );
        self.guides.show_resize(&snap);

        let node = NodeGeometry::of_scaled_shape(
            shape,
            gesture.node_position,
            gesture.scale_x,
            gesture.scale_y,
            &self.viewport,
            stroke,
        );
        Ok(refine_anchor_position(
            gesture.previous_anchor,
            gesture.proposed_anchor,
            &snap,
            &node.client_rect,
            node.stroke_width,
        ))
    }

    /// Constrain the transformer box of a door so that its height stays
    /// tied to its width. Boxes of other shapes pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnresolvedNode`] if the node belongs to no
    /// shape, or [`PlanError::Locked`] if the shape is locked.
    pub fn constrain_door_resize(
        &mut self,
        node_id: &str,
        proposed: TransformerBox,
    ) -> PlanResult<TransformerBox> {
        let shape = Self::gesture_target(self.collection.shapes(), node_id)?;
        if !shape.is_door() {
            return Ok(proposed);
        }

        let additional = self.viewport.apply_zoom(shape.kind.door_additional_height());
        let previous = match &self.door_box {
            Some((id, previous)) if id == &shape.id => *previous,
            _ => {
                let (width, height) = shape.kind.local_size();
                TransformerBox {
                    width: self.viewport.apply_zoom(width),
                    height: self.viewport.apply_zoom(height),
                    ..proposed
                }
            }
        };

        let constrained = constrain_door_box(&previous, &proposed, additional);
        self.door_box = Some((shape.id.clone(), constrained));
        Ok(constrained)
    }

    /// Commit the result of a resize or rotate gesture.
    ///
    /// The scale factors are folded into the shape's size fields and the
    /// position and rotation are stored, as one undoable edit.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnresolvedNode`] if the node belongs to no
    /// shape, [`PlanError::Locked`] if the shape is locked, or the update
    /// error if the scaled shape is invalid.
    pub fn transform_end(&mut self, end: &TransformEnd) -> PlanResult<()> {
        let id = Self::gesture_target(self.collection.shapes(), &end.node_id)?.id.clone();
        let stage = self.viewport.to_stage_relative(end.position);
        self.guides.clear();
        self.door_box = None;

        self.collection.update_with(&id, |shape| {
            shape.x = stage.x;
            shape.y = stage.y;
            shape.rotation = end.rotation;
            shape.kind.apply_scale(end.scale_x, end.scale_y);
        })?;
        Ok(())
    }

    /// Dispatch an input event.
    ///
    /// # Errors
    ///
    /// Returns the error of the operation the event maps to.
    pub fn process_event(&mut self, event: &EditorEvent) -> PlanResult<()> {
        tracing::debug!("Processing event: {event:?}");
        match event {
            EditorEvent::Add { shape } => self.add(shape.clone()),
            EditorEvent::Delete { id } => self.delete(id).map(|_| ()),
            EditorEvent::Update { id, attrs } => self.update(id, attrs),
            EditorEvent::Undo => {
                self.undo();
                Ok(())
            }
            EditorEvent::Redo => {
                self.redo();
                Ok(())
            }
            EditorEvent::Select { id } => {
                self.select(id.as_ref());
                Ok(())
            }
            EditorEvent::DragMove { node_id, position } => {
                self.drag_move(node_id, *position).map(|_| ())
            }
            EditorEvent::DragEnd { node_id, position } => self.drag_end(node_id, *position),
            EditorEvent::ResizeMove(gesture) => self.resize_move(gesture).map(|_| ()),
            EditorEvent::DoorResize { node_id, proposed } => {
                self.constrain_door_resize(node_id, *proposed).map(|_| ())
            }
            EditorEvent::TransformEnd(end) => self.transform_end(end),
            EditorEvent::Nudge { direction } => self.nudge(*direction).map(|_| ()),
        }
    }
}
