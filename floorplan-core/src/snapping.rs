//! Snapping engine.
//!
//! While a shape is dragged or resized, its edges are compared against the
//! edges of every other shape. Edges closer than the snap tolerance produce
//! a guide line and the moving shape is pulled onto it.
//!
//! ```text
//!   other shapes ──compute_edge_candidates──┐
//!                                           ├─resolve_guides──> guides ──apply_guides──> position
//!   moving node ──compute_snapping_edges────┘
//! ```
//!
//! Resizing compares the pointer instead of the node edges, see
//! [`snap_resize`].
//!
//! All comparisons happen in absolute (screen) coordinates. Candidates also
//! carry their stage-relative position, which is where guide lines are drawn.

use serde::{Deserialize, Serialize};

use crate::coords::Viewport;
use crate::error::{PlanError, PlanResult};
use crate::geometry::{almost_divisible_by, almost_equal, Point, QuarterTurn, Rect};
use crate::shape::{strip_handle_suffix, Shape, ShapeId, ShapeKind};

// ============================================================================
// Candidates
// ============================================================================

/// A line another shape can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeCandidate {
    /// Position in absolute coordinates.
    pub absolute: f64,
    /// Position in stage coordinates.
    pub relative: f64,
}

/// Snap lines offered by the shapes that are not moving.
///
/// Vertical lines hold X positions, horizontal lines hold Y positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeCandidates {
    /// Vertical lines (X positions).
    pub vertical: Vec<EdgeCandidate>,
    /// Horizontal lines (Y positions).
    pub horizontal: Vec<EdgeCandidate>,
}

impl EdgeCandidates {
    fn push_vertical(&mut self, viewport: &Viewport, relative: f64) {
        self.vertical.push(EdgeCandidate {
            absolute: viewport.x_to_absolute(relative),
            relative,
        });
    }

    fn push_horizontal(&mut self, viewport: &Viewport, relative: f64) {
        self.horizontal.push(EdgeCandidate {
            absolute: viewport.y_to_absolute(relative),
            relative,
        });
    }

    /// Total number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    /// Check if there are no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Wings of an L-shaped house.
#[derive(Debug, Clone, Copy)]
enum Wing {
    First,
    Second,
}

/// Which notch walls of an L-shaped house are visible along each axis.
///
/// For every orientation, the vertical and the horizontal notch wall are
/// measured from one side of the bounding box by the width of one wing.
const fn notch_layout(turn: QuarterTurn) -> [(SnapEdge, Wing); 2] {
    match turn {
        QuarterTurn::Deg0 => [(SnapEdge::Start, Wing::Second), (SnapEdge::End, Wing::First)],
        QuarterTurn::Deg90 => [(SnapEdge::Start, Wing::First), (SnapEdge::Start, Wing::Second)],
        QuarterTurn::Deg180 => [(SnapEdge::End, Wing::Second), (SnapEdge::Start, Wing::First)],
        QuarterTurn::Deg270 => [(SnapEdge::End, Wing::First), (SnapEdge::End, Wing::Second)],
    }
}

/// Inner and outer face of a notch wall lying `wing` away from one side of
/// the span `[start, end]`.
fn notch_faces(start: f64, end: f64, side: SnapEdge, wing: f64, wall_thickness: f64) -> [f64; 2] {
    match side {
        SnapEdge::Start => [start + wing - wall_thickness, start + wing],
        SnapEdge::End => [end - wing + wall_thickness, end - wing],
    }
}

/// Collect the snap lines of every shape except `moving_id`.
///
/// Each shape contributes both edges of its bounding box per axis, with the
/// box deflated by `stroke_width` so that neighbouring strokes overlap once
/// snapped. Houses also contribute the inner faces of their exterior walls,
/// and L-shaped houses the two faces of the notch walls, as long as their
/// rotation is a multiple of 90 degrees. Text labels contribute nothing.
#[must_use]
pub fn compute_edge_candidates(
    shapes: &[Shape],
    moving_id: &ShapeId,
    stroke_width: f64,
    viewport: &Viewport,
) -> EdgeCandidates {
    let mut candidates = EdgeCandidates::default();

    for shape in shapes {
        if &shape.id == moving_id || !shape.is_snap_target() {
            continue;
        }

        let stroke = shape.effective_stroke(stroke_width);
        let b = shape.client_rect(stroke_width).deflate(stroke);

        candidates.push_vertical(viewport, b.x);
        candidates.push_vertical(viewport, b.right());
        candidates.push_horizontal(viewport, b.y);
        candidates.push_horizontal(viewport, b.bottom());

        let Some(t) = shape.house_wall_thickness() else {
            continue;
        };
        if !almost_divisible_by(shape.rotation, 90.0) {
            continue;
        }

        candidates.push_vertical(viewport, b.x + t);
        candidates.push_vertical(viewport, b.right() - t);
        candidates.push_horizontal(viewport, b.y + t);
        candidates.push_horizontal(viewport, b.bottom() - t);

        let ShapeKind::LShapedHouse {
            first_wing_width,
            second_wing_width,
            ..
        } = shape.kind
        else {
            continue;
        };
        let Some(turn) = QuarterTurn::from_rotation(shape.rotation) else {
            continue;
        };

        let wing_width = |wing| match wing {
            Wing::First => first_wing_width,
            Wing::Second => second_wing_width,
        };
        let [(column_side, column_wing), (row_side, row_wing)] = notch_layout(turn);
        for x in notch_faces(b.x, b.right(), column_side, wing_width(column_wing), t) {
            candidates.push_vertical(viewport, x);
        }
        for y in notch_faces(b.y, b.bottom(), row_side, wing_width(row_wing), t) {
            candidates.push_horizontal(viewport, y);
        }
    }

    candidates
}

// ============================================================================
// Moving node
// ============================================================================

/// Side of the moving node an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapEdge {
    /// Left or top edge.
    Start,
    /// Right or bottom edge.
    End,
}

/// One edge of the moving node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnEdge {
    /// Absolute position of the edge.
    pub absolute_position: f64,
    /// Signed distance from the edge to the node origin.
    pub offset_from_origin: f64,
    /// Which edge this is.
    pub edge: SnapEdge,
}

/// The two edges per axis of the moving node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnEdges {
    /// Left and right edges (X positions).
    pub vertical: [OwnEdge; 2],
    /// Top and bottom edges (Y positions).
    pub horizontal: [OwnEdge; 2],
}

/// Absolute geometry of a node during a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    /// Bounding box including the stroke.
    pub client_rect: Rect,
    /// Absolute position of the node origin.
    pub absolute_position: Point,
    /// Absolute stroke width to deflate the box by.
    pub stroke_width: f64,
}

impl NodeGeometry {
    /// Geometry of `shape` with its origin at `absolute_position`.
    #[must_use]
    pub fn of_shape(
        shape: &Shape,
        absolute_position: Point,
        viewport: &Viewport,
        stroke_width: f64,
    ) -> Self {
        Self::of_scaled_shape(shape, absolute_position, 1.0, 1.0, viewport, stroke_width)
    }

    /// Geometry of `shape` stretched by the transformer scale factors.
    #[must_use]
    pub fn of_scaled_shape(
        shape: &Shape,
        absolute_position: Point,
        scale_x: f64,
        scale_y: f64,
        viewport: &Viewport,
        stroke_width: f64,
    ) -> Self {
        let moved = shape.moved_to(viewport.to_stage_relative(absolute_position));
        let stage_rect = moved.scaled_client_rect(stroke_width, scale_x, scale_y);
        Self {
            client_rect: viewport.rect_to_absolute(stage_rect),
            absolute_position,
            stroke_width: viewport.apply_zoom(shape.effective_stroke(stroke_width)),
        }
    }
}

/// Edges of the moving node, each with the offset that puts the node origin
/// back in place once that edge sits on a guide.
#[must_use]
pub fn compute_snapping_edges(node: &NodeGeometry) -> OwnEdges {
    let b = node.client_rect.deflate(node.stroke_width);
    let origin = node.absolute_position;

    OwnEdges {
        vertical: [
            OwnEdge {
                absolute_position: b.x,
                offset_from_origin: origin.x - b.x,
                edge: SnapEdge::Start,
            },
            OwnEdge {
                absolute_position: b.right(),
                offset_from_origin: origin.x - b.right(),
                edge: SnapEdge::End,
            },
        ],
        horizontal: [
            OwnEdge {
                absolute_position: b.y,
                offset_from_origin: origin.y - b.y,
                edge: SnapEdge::Start,
            },
            OwnEdge {
                absolute_position: b.bottom(),
                offset_from_origin: origin.y - b.bottom(),
                edge: SnapEdge::End,
            },
        ],
    }
}

/// Find the shape behind a moved node.
///
/// The node is either the shape itself or its transformer handle, whose id
/// carries the handle suffix.
///
/// # Errors
///
/// Returns [`PlanError::UnresolvedNode`] if neither id matches a shape.
pub fn resolve_moving_shape<'a>(shapes: &'a [Shape], node_id: &str) -> PlanResult<&'a Shape> {
    shapes
        .iter()
        .find(|s| s.id.as_str() == node_id)
        .or_else(|| {
            let base = strip_handle_suffix(node_id);
            shapes.iter().find(|s| s.id.as_str() == base)
        })
        .ok_or_else(|| PlanError::UnresolvedNode(node_id.to_string()))
}

// ============================================================================
// Guides
// ============================================================================

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A vertical line, positioned by X.
    Vertical,
    /// A horizontal line, positioned by Y.
    Horizontal,
}

/// A matched snap between a candidate line and an edge of the moving node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Absolute position to snap to.
    pub absolute: f64,
    /// Stage position where the guide line is drawn.
    pub relative: f64,
    /// Edge of the moving node that matched.
    pub edge: SnapEdge,
    /// Offset from the line to the node origin.
    pub offset: f64,
    /// Distance between the line and the edge before snapping.
    pub diff: f64,
    /// Direction of the line.
    pub orientation: Orientation,
}

fn closest_match(
    candidates: &[EdgeCandidate],
    edges: &[OwnEdge],
    tolerance: f64,
    orientation: Orientation,
) -> Option<Guide> {
    let mut best: Option<Guide> = None;
    for candidate in candidates {
        for edge in edges {
            let diff = (candidate.absolute - edge.absolute_position).abs();
            if diff > tolerance || best.is_some_and(|g| g.diff <= diff) {
                continue;
            }
            best = Some(Guide {
                absolute: candidate.absolute,
                relative: candidate.relative,
                edge: edge.edge,
                offset: edge.offset_from_origin,
                diff,
                orientation,
            });
        }
    }
    best
}

/// Match own edges against candidate lines.
///
/// Returns at most one vertical guide followed by at most one horizontal
/// guide, each the closest match within `tolerance` on its axis. Ties go to
/// the candidate seen first.
#[must_use]
pub fn resolve_guides(candidates: &EdgeCandidates, own: &OwnEdges, tolerance: f64) -> Vec<Guide> {
    let guides: Vec<Guide> = [
        closest_match(
            &candidates.vertical,
            &own.vertical,
            tolerance,
            Orientation::Vertical,
        ),
        closest_match(
            &candidates.horizontal,
            &own.horizontal,
            tolerance,
            Orientation::Horizontal,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    tracing::debug!("Resolved {} guides", guides.len());
    guides
}

/// Move the node so that each matched edge lands on its guide.
#[must_use]
pub fn apply_guides(position: Point, guides: &[Guide]) -> Point {
    let mut snapped = position;
    for guide in guides {
        match guide.orientation {
            Orientation::Vertical => snapped.x = guide.absolute + guide.offset,
            Orientation::Horizontal => snapped.y = guide.absolute + guide.offset,
        }
    }
    snapped
}

// ============================================================================
// Displayed guide lines
// ============================================================================

/// A guide line as drawn on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGuide {
    /// Stage position of the line.
    pub position: f64,
    /// Direction of the line.
    pub orientation: Orientation,
}

/// The guide lines currently shown, at most one per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineGuides {
    /// Vertical line, if any.
    pub vertical: Option<LineGuide>,
    /// Horizontal line, if any.
    pub horizontal: Option<LineGuide>,
}

impl LineGuides {
    /// Show the guides of a drag frame. A direction without a guide is
    /// cleared.
    pub fn show_drag(&mut self, guides: &[Guide]) {
        self.vertical = None;
        self.horizontal = None;
        for guide in guides {
            let line = Some(LineGuide {
                position: guide.relative,
                orientation: guide.orientation,
            });
            match guide.orientation {
                Orientation::Vertical => self.vertical = line,
                Orientation::Horizontal => self.horizontal = line,
            }
        }
    }

    /// Show the guides of a resize frame.
    ///
    /// Both lines are cleared when nothing snapped. Otherwise only the
    /// directions that snapped are replaced.
    pub fn show_resize(&mut self, snap: &ResizeSnap) {
        if snap.vertical.is_none() && snap.horizontal.is_none() {
            self.clear();
            return;
        }
        if snap.vertical.is_some() {
            self.vertical = snap.vertical;
        }
        if snap.horizontal.is_some() {
            self.horizontal = snap.horizontal;
        }
    }

    /// Hide every line.
    pub fn clear(&mut self) {
        self.vertical = None;
        self.horizontal = None;
    }

    /// Check if no line is shown.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

// ============================================================================
// Resizing
// ============================================================================

fn scale_changes(scale_x: f64, scale_y: f64) -> Option<(bool, bool)> {
    let x_changed = !almost_equal(scale_x, 1.0);
    let y_changed = !almost_equal(scale_y, 1.0);
    if !x_changed && !y_changed {
        return None;
    }
    let width_only = x_changed && !y_changed;
    let height_only = !x_changed && y_changed;
    Some((width_only, height_only))
}

/// Whether a transform stretches the node along the canvas Y axis only.
///
/// Rotations other than multiples of 90 degrees never count.
#[must_use]
pub fn is_resized_vertically(scale_x: f64, scale_y: f64, rotation: f64) -> bool {
    let (Some((width_only, height_only)), Some(turn)) = (
        scale_changes(scale_x, scale_y),
        QuarterTurn::from_rotation(rotation),
    ) else {
        return false;
    };
    if turn.swaps_axes() {
        width_only
    } else {
        height_only
    }
}

/// Whether a transform stretches the node along the canvas X axis only.
///
/// Rotations other than multiples of 90 degrees never count.
#[must_use]
pub fn is_resized_horizontally(scale_x: f64, scale_y: f64, rotation: f64) -> bool {
    let (Some((width_only, height_only)), Some(turn)) = (
        scale_changes(scale_x, scale_y),
        QuarterTurn::from_rotation(rotation),
    ) else {
        return false;
    };
    if turn.swaps_axes() {
        height_only
    } else {
        width_only
    }
}

/// Axes a transform is confined to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeAxes {
    /// Stretching along Y only.
    pub vertically: bool,
    /// Stretching along X only.
    pub horizontally: bool,
}

impl ResizeAxes {
    /// Detect the axes from the node's scale factors and rotation.
    #[must_use]
    pub fn detect(scale_x: f64, scale_y: f64, rotation: f64) -> Self {
        Self {
            vertically: is_resized_vertically(scale_x, scale_y, rotation),
            horizontally: is_resized_horizontally(scale_x, scale_y, rotation),
        }
    }
}

/// A coordinate the resize anchor must take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisCorrection {
    /// Absolute X.
    X(f64),
    /// Absolute Y.
    Y(f64),
}

/// Outcome of matching the pointer against candidate lines during a resize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeSnap {
    /// X correction first, then Y correction, each optional.
    pub corrections: Vec<AxisCorrection>,
    /// Vertical guide line to show.
    pub vertical: Option<LineGuide>,
    /// Horizontal guide line to show.
    pub horizontal: Option<LineGuide>,
}

fn closest_to_pointer(
    candidates: &[EdgeCandidate],
    pointer: f64,
    anchor: f64,
    tolerance: f64,
) -> Option<EdgeCandidate> {
    if (pointer - anchor).abs() > tolerance {
        return None;
    }
    let mut best: Option<(EdgeCandidate, f64)> = None;
    for candidate in candidates {
        let diff = (candidate.absolute - pointer).abs();
        if diff <= tolerance && !matches!(best, Some((_, d)) if d <= diff) {
            best = Some((*candidate, diff));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Match the pointer against candidate lines while a resize anchor is
/// dragged.
///
/// The pointer is used instead of the anchor because a snapped anchor stops
/// following the pointer. The anchor must still be within `tolerance` of
/// the pointer on the matched axis. Axes the transform is not stretching
/// are skipped: a vertical stretch never snaps to a vertical line and a
/// horizontal stretch never snaps to a horizontal one.
#[must_use]
pub fn snap_resize(
    candidates: &EdgeCandidates,
    pointer: Point,
    anchor: Point,
    tolerance: f64,
    axes: ResizeAxes,
) -> ResizeSnap {
    let mut snap = ResizeSnap::default();

    if !axes.vertically {
        if let Some(c) = closest_to_pointer(&candidates.vertical, pointer.x, anchor.x, tolerance) {
            snap.corrections.push(AxisCorrection::X(c.absolute));
            snap.vertical = Some(LineGuide {
                position: c.relative,
                orientation: Orientation::Vertical,
            });
        }
    }
    if !axes.horizontally {
        if let Some(c) = closest_to_pointer(&candidates.horizontal, pointer.y, anchor.y, tolerance)
        {
            snap.corrections.push(AxisCorrection::Y(c.absolute));
            snap.horizontal = Some(LineGuide {
                position: c.relative,
                orientation: Orientation::Horizontal,
            });
        }
    }

    snap
}

/// Final position of a resize anchor.
///
/// Without corrections the anchor goes where it was dragged. Otherwise it
/// stays at `previous` except on the corrected axes, where it is also
/// pushed half a stroke away from the node's client rect origin so the
/// strokes of both shapes overlap.
#[must_use]
#[allow(clippy::float_cmp)] // an untouched axis is bit-identical
pub fn refine_anchor_position(
    previous: Point,
    proposed: Point,
    snap: &ResizeSnap,
    client_rect: &Rect,
    stroke_width: f64,
) -> Point {
    if snap.corrections.is_empty() {
        return proposed;
    }

    let mut result = previous;
    for correction in &snap.corrections {
        match *correction {
            AxisCorrection::X(x) => result.x = x,
            AxisCorrection::Y(y) => result.y = y,
        }
    }

    let half = stroke_width / 2.0;
    if result.x != previous.x {
        if result.x > client_rect.x {
            result.x += half;
        } else if result.x < client_rect.x {
            result.x -= half;
        }
    }
    if result.y != previous.y {
        if result.y > client_rect.y {
            result.y += half;
        } else if result.y < client_rect.y {
            result.y -= half;
        }
    }
    result
}

// ============================================================================
// Door boxes
// ============================================================================

/// Bounding box proposed by the transformer while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformerBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

/// Keep a door's box at `height = width + additional_height` while resizing.
///
/// `previous` is the box returned by the previous call of the gesture. A
/// width-only change drags the height along, a height-only change drags the
/// width along, anything else derives the height from the width.
#[must_use]
pub fn constrain_door_box(
    previous: &TransformerBox,
    proposed: &TransformerBox,
    additional_height: f64,
) -> TransformerBox {
    let width_changed = !almost_equal(previous.width, proposed.width);
    let height_changed = !almost_equal(previous.height, proposed.height);

    if !width_changed && height_changed {
        TransformerBox {
            width: proposed.height - additional_height,
            ..*proposed
        }
    } else {
        TransformerBox {
            height: proposed.width + additional_height,
            ..*proposed
        }
    }
}
