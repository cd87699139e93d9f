//! Shape records - the building blocks of a floor plan.
//!
//! A [`Shape`] carries the attributes every variant shares (id, position,
//! rotation, lock state) and a [`ShapeKind`] holding the variant-specific
//! geometry. All sizes are in the internal pixel unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{cm_to_pixels, Point, Rect};

/// Suffix appended to a shape id to form the id of its transformer handle.
pub const HANDLE_SUFFIX: &str = "-transformer";

/// Maximum number of characters in a text label.
pub const MAX_TEXT_LEN: usize = 30;

/// Height of a tape measure, which only has an adjustable width.
const TAPE_MEASURE_HEIGHT_CM: f64 = 30.0;

/// Average glyph width relative to the font size, used to estimate text bounds.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Unique identifier for a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Create a new unique shape ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the transformer handle attached to this shape.
    #[must_use]
    pub fn handle_id(&self) -> String {
        format!("{}{HANDLE_SUFFIX}", self.0)
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Strip the transformer handle suffix from a node id, if present.
#[must_use]
pub fn strip_handle_suffix(node_id: &str) -> &str {
    node_id.strip_suffix(HANDLE_SUFFIX).unwrap_or(node_id)
}

/// Discriminant of a shape variant, as written in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeName {
    /// Rectangular house outline with exterior walls.
    RectangleHouse,
    /// L-shaped house outline with exterior walls.
    LShapedHouse,
    /// A straight wall segment.
    Wall,
    /// A swinging door.
    Door,
    /// A window set into a wall.
    Window,
    /// A generic box of furniture.
    Box,
    /// An electric appliance such as a fridge or a washing machine.
    ElectricAppliance,
    /// A text label.
    Text,
    /// A sink.
    Sink,
    /// A stove.
    Stove,
    /// A toilet.
    Toilet,
    /// A tape measure.
    TapeMeasure,
}

impl ShapeName {
    /// Every shape name, in catalogue order.
    pub const ALL: [Self; 12] = [
        Self::RectangleHouse,
        Self::LShapedHouse,
        Self::Wall,
        Self::Door,
        Self::Window,
        Self::Box,
        Self::ElectricAppliance,
        Self::Text,
        Self::Sink,
        Self::Stove,
        Self::Toilet,
        Self::TapeMeasure,
    ];

    /// The tag used in project files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RectangleHouse => "rectangleHouse",
            Self::LShapedHouse => "lShapedHouse",
            Self::Wall => "wall",
            Self::Door => "door",
            Self::Window => "window",
            Self::Box => "box",
            Self::ElectricAppliance => "electricAppliance",
            Self::Text => "text",
            Self::Sink => "sink",
            Self::Stove => "stove",
            Self::Toilet => "toilet",
            Self::TapeMeasure => "tapeMeasure",
        }
    }

    /// Map a legacy attribute name onto the field it stands for.
    ///
    /// Boxes and electric appliances used to call their depth `height`.
    #[must_use]
    pub fn canonical_field(self, key: &str) -> &str {
        match (self, key) {
            (Self::Box | Self::ElectricAppliance, "height") => "depth",
            _ => key,
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown shape name: {s}"))
    }
}

/// Door variants, differing in how deep the door sits in the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorKind {
    /// Door between two rooms.
    Interior,
    /// Door in an exterior wall.
    Exterior,
}

/// Side towards which a door swings open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningDirection {
    /// Hinges on the left, opens to the right.
    Right,
    /// Hinges on the right, opens to the left.
    Left,
}

/// Variant-specific geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "shapeName",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ShapeKind {
    /// Rectangular house.
    RectangleHouse {
        /// Outer width.
        exterior_width: f64,
        /// Outer height.
        exterior_height: f64,
        /// Thickness of the exterior walls.
        wall_thickness: f64,
    },
    /// L-shaped house. The notch sits in the top-right corner at rotation 0.
    LShapedHouse {
        /// Outer width.
        exterior_width: f64,
        /// Outer height.
        exterior_height: f64,
        /// Thickness of the exterior walls.
        wall_thickness: f64,
        /// Height of the wing running along the bottom edge.
        first_wing_width: f64,
        /// Width of the wing running along the left edge.
        second_wing_width: f64,
    },
    /// Wall segment.
    Wall {
        /// Length of the wall.
        width: f64,
        /// Thickness of the wall.
        wall_thickness: f64,
    },
    /// Door with its swing arc.
    Door {
        /// Width of the door leaf.
        door_width: f64,
        /// Thickness of the wall the door sits in.
        wall_thickness: f64,
        /// Interior or exterior door.
        kind: DoorKind,
        /// Swing direction.
        opening_direction: OpeningDirection,
    },
    /// Window.
    Window {
        /// Width of the window.
        window_width: f64,
        /// Thickness of the wall the window sits in.
        wall_thickness: f64,
    },
    /// Generic furniture box.
    Box {
        /// Width of the box.
        width: f64,
        /// Depth of the box.
        #[serde(alias = "height")]
        depth: f64,
    },
    /// Electric appliance.
    ElectricAppliance {
        /// Width of the appliance.
        width: f64,
        /// Depth of the appliance.
        #[serde(alias = "height")]
        depth: f64,
    },
    /// Text label.
    Text {
        /// Label content.
        text: String,
        /// Font size in pixels.
        font_size: f64,
    },
    /// Sink.
    Sink {
        /// Width of the sink.
        width: f64,
        /// Depth of the sink.
        depth: f64,
    },
    /// Stove.
    Stove {
        /// Width of the stove.
        width: f64,
        /// Depth of the stove.
        depth: f64,
    },
    /// Toilet.
    Toilet {
        /// Width of the toilet.
        width: f64,
        /// Depth of the toilet.
        depth: f64,
    },
    /// Tape measure.
    TapeMeasure {
        /// Measured length.
        width: f64,
    },
}

impl ShapeKind {
    /// The discriminant of this variant.
    #[must_use]
    pub const fn name(&self) -> ShapeName {
        match self {
            Self::RectangleHouse { .. } => ShapeName::RectangleHouse,
            Self::LShapedHouse { .. } => ShapeName::LShapedHouse,
            Self::Wall { .. } => ShapeName::Wall,
            Self::Door { .. } => ShapeName::Door,
            Self::Window { .. } => ShapeName::Window,
            Self::Box { .. } => ShapeName::Box,
            Self::ElectricAppliance { .. } => ShapeName::ElectricAppliance,
            Self::Text { .. } => ShapeName::Text,
            Self::Sink { .. } => ShapeName::Sink,
            Self::Stove { .. } => ShapeName::Stove,
            Self::Toilet { .. } => ShapeName::Toilet,
            Self::TapeMeasure { .. } => ShapeName::TapeMeasure,
        }
    }

    /// Geometry with the default catalogue dimensions for `name`.
    #[must_use]
    pub fn with_defaults(name: ShapeName) -> Self {
        let wall = cm_to_pixels(30.0);
        match name {
            ShapeName::RectangleHouse => Self::RectangleHouse {
                exterior_width: cm_to_pixels(1000.0),
                exterior_height: cm_to_pixels(800.0),
                wall_thickness: wall,
            },
            ShapeName::LShapedHouse => Self::LShapedHouse {
                exterior_width: cm_to_pixels(1400.0),
                exterior_height: cm_to_pixels(1000.0),
                wall_thickness: wall,
                first_wing_width: cm_to_pixels(500.0),
                second_wing_width: cm_to_pixels(500.0),
            },
            ShapeName::Wall => Self::Wall {
                width: cm_to_pixels(400.0),
                wall_thickness: cm_to_pixels(15.0),
            },
            ShapeName::Door => Self::Door {
                door_width: cm_to_pixels(80.0),
                wall_thickness: wall,
                kind: DoorKind::Interior,
                opening_direction: OpeningDirection::Right,
            },
            ShapeName::Window => Self::Window {
                window_width: cm_to_pixels(100.0),
                wall_thickness: wall,
            },
            ShapeName::Box => Self::Box {
                width: cm_to_pixels(100.0),
                depth: cm_to_pixels(60.0),
            },
            ShapeName::ElectricAppliance => Self::ElectricAppliance {
                width: cm_to_pixels(60.0),
                depth: cm_to_pixels(60.0),
            },
            ShapeName::Text => Self::Text {
                text: "Text".to_string(),
                font_size: 24.0,
            },
            ShapeName::Sink => Self::Sink {
                width: cm_to_pixels(80.0),
                depth: cm_to_pixels(50.0),
            },
            ShapeName::Stove => Self::Stove {
                width: cm_to_pixels(60.0),
                depth: cm_to_pixels(60.0),
            },
            ShapeName::Toilet => Self::Toilet {
                width: cm_to_pixels(40.0),
                depth: cm_to_pixels(60.0),
            },
            ShapeName::TapeMeasure => Self::TapeMeasure {
                width: cm_to_pixels(200.0),
            },
        }
    }

    /// Unrotated width and height of the variant's outline.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // label length is capped at MAX_TEXT_LEN
    pub fn local_size(&self) -> (f64, f64) {
        match self {
            Self::RectangleHouse {
                exterior_width,
                exterior_height,
                ..
            }
            | Self::LShapedHouse {
                exterior_width,
                exterior_height,
                ..
            } => (*exterior_width, *exterior_height),
            Self::Wall {
                width,
                wall_thickness,
            } => (*width, *wall_thickness),
            Self::Door { door_width, .. } => {
                (*door_width, door_width + self.door_additional_height())
            }
            Self::Window {
                window_width,
                wall_thickness,
            } => (*window_width, *wall_thickness),
            Self::Box { width, depth }
            | Self::ElectricAppliance { width, depth }
            | Self::Sink { width, depth }
            | Self::Stove { width, depth }
            | Self::Toilet { width, depth } => (*width, *depth),
            Self::Text { text, font_size } => (
                text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO,
                *font_size,
            ),
            Self::TapeMeasure { width } => (*width, cm_to_pixels(TAPE_MEASURE_HEIGHT_CM)),
        }
    }

    /// Depth of the door leaf's hinge point below the wall's outer face.
    ///
    /// Interior doors sit across the whole wall, exterior doors halfway.
    /// Zero for every other variant.
    #[must_use]
    pub fn door_additional_height(&self) -> f64 {
        match self {
            Self::Door {
                wall_thickness,
                kind: DoorKind::Interior,
                ..
            } => *wall_thickness,
            Self::Door {
                wall_thickness,
                kind: DoorKind::Exterior,
                ..
            } => wall_thickness / 2.0,
            _ => 0.0,
        }
    }

    /// Fold transformer scale factors into the size fields.
    ///
    /// Text labels cannot be resized and doors only follow the X scale,
    /// as their height is derived from the width.
    pub fn apply_scale(&mut self, scale_x: f64, scale_y: f64) {
        match self {
            Self::RectangleHouse {
                exterior_width,
                exterior_height,
                ..
            } => {
                *exterior_width *= scale_x;
                *exterior_height *= scale_y;
            }
            Self::LShapedHouse {
                exterior_width,
                exterior_height,
                first_wing_width,
                second_wing_width,
                ..
            } => {
                *exterior_width *= scale_x;
                *exterior_height *= scale_y;
                *first_wing_width *= scale_y;
                *second_wing_width *= scale_x;
            }
            Self::Wall {
                width,
                wall_thickness,
            } => {
                *width *= scale_x;
                *wall_thickness *= scale_y;
            }
            Self::Door { door_width, .. } => *door_width *= scale_x,
            Self::Window {
                window_width,
                wall_thickness,
            } => {
                *window_width *= scale_x;
                *wall_thickness *= scale_y;
            }
            Self::Box { width, depth }
            | Self::ElectricAppliance { width, depth }
            | Self::Sink { width, depth }
            | Self::Stove { width, depth }
            | Self::Toilet { width, depth } => {
                *width *= scale_x;
                *depth *= scale_y;
            }
            Self::TapeMeasure { width } => *width *= scale_x,
            Self::Text { .. } => {}
        }
    }

    /// Check the attribute constraints of the variant.
    ///
    /// With `check_wings`, an L-shaped house whose wings are wider than its
    /// exterior is rejected as well.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    pub fn validate(&self, check_wings: bool) -> Result<(), String> {
        let positive = |field: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(format!("{field} must be a positive number, got {value}"))
            }
        };
        match self {
            Self::RectangleHouse {
                exterior_width,
                exterior_height,
                wall_thickness,
            } => {
                positive("exteriorWidth", *exterior_width)?;
                positive("exteriorHeight", *exterior_height)?;
                positive("wallThickness", *wall_thickness)
            }
            Self::LShapedHouse {
                exterior_width,
                exterior_height,
                wall_thickness,
                first_wing_width,
                second_wing_width,
            } => {
                positive("exteriorWidth", *exterior_width)?;
                positive("exteriorHeight", *exterior_height)?;
                positive("wallThickness", *wall_thickness)?;
                positive("firstWingWidth", *first_wing_width)?;
                positive("secondWingWidth", *second_wing_width)?;
                if check_wings && first_wing_width > exterior_height {
                    return Err("firstWingWidth must not exceed exteriorHeight".to_string());
                }
                if check_wings && second_wing_width > exterior_width {
                    return Err("secondWingWidth must not exceed exteriorWidth".to_string());
                }
                Ok(())
            }
            Self::Wall {
                width,
                wall_thickness,
            } => {
                positive("width", *width)?;
                positive("wallThickness", *wall_thickness)
            }
            Self::Door {
                door_width,
                wall_thickness,
                ..
            } => {
                positive("doorWidth", *door_width)?;
                positive("wallThickness", *wall_thickness)
            }
            Self::Window {
                window_width,
                wall_thickness,
            } => {
                positive("windowWidth", *window_width)?;
                positive("wallThickness", *wall_thickness)
            }
            Self::Box { width, depth }
            | Self::ElectricAppliance { width, depth }
            | Self::Sink { width, depth }
            | Self::Stove { width, depth }
            | Self::Toilet { width, depth } => {
                positive("width", *width)?;
                positive("depth", *depth)
            }
            Self::Text { text, font_size } => {
                positive("fontSize", *font_size)?;
                if text.chars().count() > MAX_TEXT_LEN {
                    return Err(format!("text must be at most {MAX_TEXT_LEN} characters"));
                }
                Ok(())
            }
            Self::TapeMeasure { width } => positive("width", *width),
        }
    }
}

const fn default_draggable() -> bool {
    true
}

/// A shape on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier.
    pub id: ShapeId,
    /// Variant and its geometry.
    #[serde(flatten)]
    pub kind: ShapeKind,
    /// X position of the local origin on the stage.
    pub x: f64,
    /// Y position of the local origin on the stage.
    pub y: f64,
    /// Clockwise rotation in degrees around the local origin.
    pub rotation: f64,
    /// Whether the shape can be selected, moved, resized and rotated.
    #[serde(default = "default_draggable")]
    pub draggable: bool,
}

impl Shape {
    /// Create a new unrotated, draggable shape at `(x, y)` with a fresh id.
    #[must_use]
    pub fn new(kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            x,
            y,
            rotation: 0.0,
            draggable: true,
        }
    }

    /// Create a shape with the default catalogue dimensions.
    #[must_use]
    pub fn with_defaults(name: ShapeName, x: f64, y: f64) -> Self {
        Self::new(ShapeKind::with_defaults(name), x, y)
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set whether the shape can be manipulated.
    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// The discriminant of this shape.
    #[must_use]
    pub const fn name(&self) -> ShapeName {
        self.kind.name()
    }

    /// Position of the local origin.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// A copy of this shape with its origin moved to `position`.
    #[must_use]
    pub fn moved_to(&self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self.clone()
        }
    }

    /// Whether the shape is a door.
    #[must_use]
    pub const fn is_door(&self) -> bool {
        matches!(self.kind, ShapeKind::Door { .. })
    }

    /// Whether the shape is a text label.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text { .. })
    }

    /// Whether other shapes snap to this one. Text labels only snap to
    /// others, they never offer guide lines themselves.
    #[must_use]
    pub const fn is_snap_target(&self) -> bool {
        !self.is_text()
    }

    /// Stroke width actually drawn around the outline.
    #[must_use]
    pub const fn effective_stroke(&self, stroke_width: f64) -> f64 {
        if self.is_text() {
            0.0
        } else {
            stroke_width
        }
    }

    /// Thickness of the exterior walls for house-like shapes.
    #[must_use]
    pub const fn house_wall_thickness(&self) -> Option<f64> {
        match self.kind {
            ShapeKind::RectangleHouse { wall_thickness, .. }
            | ShapeKind::LShapedHouse { wall_thickness, .. } => Some(wall_thickness),
            _ => None,
        }
    }

    /// Stage-relative bounding box, including half of the stroke on every
    /// side, after rotation.
    #[must_use]
    pub fn client_rect(&self, stroke_width: f64) -> Rect {
        self.scaled_client_rect(stroke_width, 1.0, 1.0)
    }

    /// Like [`Shape::client_rect`], with transformer scale factors applied to
    /// the local outline.
    #[must_use]
    pub fn scaled_client_rect(&self, stroke_width: f64, scale_x: f64, scale_y: f64) -> Rect {
        let (width, height) = self.kind.local_size();
        Rect::new(0.0, 0.0, width * scale_x, height * scale_y)
            .expand(self.effective_stroke(stroke_width) / 2.0)
            .rotated_bounds(self.position(), self.rotation)
    }

    /// Check the attribute constraints of this shape.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    pub fn validate(&self, check_wings: bool) -> Result<(), String> {
        if self.id.as_str().is_empty() {
            return Err("id must not be empty".to_string());
        }
        for (field, value) in [("x", self.x), ("y", self.y), ("rotation", self.rotation)] {
            if !value.is_finite() {
                return Err(format!("{field} must be a finite number"));
            }
        }
        self.kind.validate(check_wings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::almost_equal;

    fn l_house() -> Shape {
        Shape::new(
            ShapeKind::LShapedHouse {
                exterior_width: 700.0,
                exterior_height: 500.0,
                wall_thickness: 15.0,
                first_wing_width: 250.0,
                second_wing_width: 250.0,
            },
            0.0,
            0.0,
        )
    }

    #[test]
    fn test_shape_name_round_trip() {
        for name in ShapeName::ALL {
            assert_eq!(name.as_str().parse::<ShapeName>(), Ok(name));
            assert_eq!(ShapeKind::with_defaults(name).name(), name);
        }
        assert!("coldAppliance".parse::<ShapeName>().is_err());
    }

    #[test]
    fn test_serialized_layout() {
        let shape = l_house().with_id("house-1");
        let json = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(json["id"], "house-1");
        assert_eq!(json["shapeName"], "lShapedHouse");
        assert_eq!(json["firstWingWidth"], 250.0);
        assert_eq!(json["draggable"], true);

        let back: Shape = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, shape);
    }

    #[test]
    fn test_door_size_depends_on_kind() {
        let mut door = ShapeKind::Door {
            door_width: 40.0,
            wall_thickness: 10.0,
            kind: DoorKind::Interior,
            opening_direction: OpeningDirection::Left,
        };
        assert_eq!(door.local_size(), (40.0, 50.0));

        if let ShapeKind::Door { kind, .. } = &mut door {
            *kind = DoorKind::Exterior;
        }
        assert_eq!(door.local_size(), (40.0, 45.0));
    }

    #[test]
    fn test_client_rect_includes_half_stroke() {
        let shape = Shape::new(
            ShapeKind::Box {
                width: 100.0,
                depth: 60.0,
            },
            10.0,
            20.0,
        );
        assert_eq!(shape.client_rect(0.0), Rect::new(10.0, 20.0, 100.0, 60.0));
        assert_eq!(shape.client_rect(2.0), Rect::new(9.0, 19.0, 102.0, 62.0));
    }

    #[test]
    fn test_client_rect_rotated() {
        let shape = Shape::new(
            ShapeKind::Wall {
                width: 200.0,
                wall_thickness: 10.0,
            },
            100.0,
            100.0,
        )
        .with_rotation(90.0);
        let rect = shape.client_rect(0.0);
        assert!(almost_equal(rect.x, 90.0));
        assert!(almost_equal(rect.y, 100.0));
        assert!(almost_equal(rect.width, 10.0));
        assert!(almost_equal(rect.height, 200.0));
    }

    #[test]
    fn test_apply_scale_l_house_wings_follow_orthogonal_axis() {
        let mut kind = l_house().kind;
        kind.apply_scale(2.0, 0.5);
        assert_eq!(
            kind,
            ShapeKind::LShapedHouse {
                exterior_width: 1400.0,
                exterior_height: 250.0,
                wall_thickness: 15.0,
                first_wing_width: 125.0,
                second_wing_width: 500.0,
            }
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_sizes() {
        let kind = ShapeKind::Wall {
            width: 0.0,
            wall_thickness: 5.0,
        };
        assert!(kind.validate(false).is_err());

        let text = ShapeKind::Text {
            text: "x".repeat(MAX_TEXT_LEN + 1),
            font_size: 12.0,
        };
        assert!(text.validate(false).is_err());
    }

    #[test]
    fn test_validate_wings_only_when_requested() {
        let kind = ShapeKind::LShapedHouse {
            exterior_width: 100.0,
            exterior_height: 100.0,
            wall_thickness: 5.0,
            first_wing_width: 150.0,
            second_wing_width: 50.0,
        };
        assert!(kind.validate(false).is_ok());
        assert!(kind.validate(true).is_err());
    }

    #[test]
    fn test_canonical_field_maps_legacy_height() {
        assert_eq!(ShapeName::Box.canonical_field("height"), "depth");
        assert_eq!(ShapeName::ElectricAppliance.canonical_field("height"), "depth");
        assert_eq!(ShapeName::Sink.canonical_field("height"), "height");
        assert_eq!(ShapeName::Box.canonical_field("width"), "width");
    }

    #[test]
    fn test_strip_handle_suffix() {
        let id = ShapeId::from("abc");
        assert_eq!(id.handle_id(), "abc-transformer");
        assert_eq!(strip_handle_suffix("abc-transformer"), "abc");
        assert_eq!(strip_handle_suffix("abc"), "abc");
    }

    #[test]
    fn test_text_is_not_snap_target() {
        let text = Shape::with_defaults(ShapeName::Text, 0.0, 0.0);
        assert!(!text.is_snap_target());
        assert!(almost_equal(text.effective_stroke(1.0), 0.0));
        assert!(Shape::with_defaults(ShapeName::Sink, 0.0, 0.0).is_snap_target());
    }
}
