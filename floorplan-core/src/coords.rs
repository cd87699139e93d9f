//! Conversions between stage-relative and absolute (screen) coordinates.
//!
//! Shapes store their geometry relative to the stage, in unscaled pixels.
//! Pointer positions and node positions reported during a gesture are
//! absolute: offset by the stage position and multiplied by the zoom.
//! The snapping engine goes through this module for every such conversion.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Placement of the stage on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Stage offset X in screen pixels.
    pub pan_x: f64,
    /// Stage offset Y in screen pixels.
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with the given zoom and stage offset.
    #[must_use]
    pub const fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Scale a stage length to a screen length.
    #[must_use]
    pub fn apply_zoom(&self, length: f64) -> f64 {
        length * self.zoom
    }

    /// Scale a screen length back to a stage length.
    #[must_use]
    pub fn remove_zoom(&self, length: f64) -> f64 {
        length / self.zoom
    }

    /// Convert a stage X coordinate to an absolute one.
    #[must_use]
    pub fn x_to_absolute(&self, x: f64) -> f64 {
        self.pan_x + self.apply_zoom(x)
    }

    /// Convert a stage Y coordinate to an absolute one.
    #[must_use]
    pub fn y_to_absolute(&self, y: f64) -> f64 {
        self.pan_y + self.apply_zoom(y)
    }

    /// Convert an absolute X coordinate to a stage one.
    #[must_use]
    pub fn x_to_stage_relative(&self, x: f64) -> f64 {
        self.remove_zoom(x - self.pan_x)
    }

    /// Convert an absolute Y coordinate to a stage one.
    #[must_use]
    pub fn y_to_stage_relative(&self, y: f64) -> f64 {
        self.remove_zoom(y - self.pan_y)
    }

    /// Convert a stage point to an absolute one.
    #[must_use]
    pub fn to_absolute(&self, point: Point) -> Point {
        Point::new(self.x_to_absolute(point.x), self.y_to_absolute(point.y))
    }

    /// Convert an absolute point to a stage one.
    #[must_use]
    pub fn to_stage_relative(&self, point: Point) -> Point {
        Point::new(
            self.x_to_stage_relative(point.x),
            self.y_to_stage_relative(point.y),
        )
    }

    /// Convert a stage rectangle to an absolute one.
    #[must_use]
    pub fn rect_to_absolute(&self, rect: Rect) -> Rect {
        Rect::new(
            self.x_to_absolute(rect.x),
            self.y_to_absolute(rect.y),
            self.apply_zoom(rect.width),
            self.apply_zoom(rect.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::almost_equal;

    #[test]
    fn test_identity_viewport() {
        let viewport = Viewport::default();
        let p = Point::new(12.5, -3.0);
        assert_eq!(viewport.to_absolute(p), p);
        assert_eq!(viewport.to_stage_relative(p), p);
    }

    #[test]
    fn test_zoom_and_pan() {
        let viewport = Viewport::new(2.0, 300.0, 10.0);
        let abs = viewport.to_absolute(Point::new(100.0, 50.0));
        assert!(almost_equal(abs.x, 500.0));
        assert!(almost_equal(abs.y, 110.0));

        let back = viewport.to_stage_relative(abs);
        assert!(almost_equal(back.x, 100.0));
        assert!(almost_equal(back.y, 50.0));
    }

    #[test]
    fn test_rect_to_absolute() {
        let viewport = Viewport::new(0.5, 20.0, 0.0);
        let rect = viewport.rect_to_absolute(Rect::new(40.0, 40.0, 200.0, 100.0));
        assert_eq!(rect, Rect::new(40.0, 20.0, 100.0, 50.0));
    }
}
