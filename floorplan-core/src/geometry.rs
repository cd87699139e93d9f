//! Numeric helpers shared by the shape model, the snapping engine and the forms.
//!
//! All geometry in this crate is expressed in the internal pixel unit. The
//! pixel scale is arbitrary: one pixel is two centimeters, chosen so that
//! default shape sizes fit the screen without zooming.

use serde::{Deserialize, Serialize};

/// Default tolerance for [`almost_equal`] and [`almost_divisible_by`].
pub const EPSILON: f64 = 1e-6;

/// Centimeters represented by one pixel.
const CM_PER_PIXEL: f64 = 2.0;

/// Convert degrees to radians.
#[must_use]
pub fn deg_to_radians(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

/// Convert radians to degrees.
#[must_use]
pub fn radians_to_deg(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Convert centimeters to pixels.
#[must_use]
pub fn cm_to_pixels(cm: f64) -> f64 {
    cm / CM_PER_PIXEL
}

/// Convert pixels to centimeters.
#[must_use]
pub fn pixels_to_cm(pixels: f64) -> f64 {
    pixels * CM_PER_PIXEL
}

/// Convert meters to pixels.
#[must_use]
pub fn meters_to_pixels(meters: f64) -> f64 {
    cm_to_pixels(meters * 100.0)
}

/// Convert pixels to meters.
#[must_use]
pub fn pixels_to_meters(pixels: f64) -> f64 {
    pixels_to_cm(pixels) / 100.0
}

/// Round `value` to the given number of decimals.
#[must_use]
pub fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Check whether two numbers differ by less than [`EPSILON`].
#[must_use]
pub fn almost_equal(a: f64, b: f64) -> bool {
    almost_equal_eps(a, b, EPSILON)
}

/// Check whether two numbers differ by less than `epsilon`.
#[must_use]
pub fn almost_equal_eps(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Check whether `dividend` is a multiple of `divisor` up to [`EPSILON`].
///
/// The remainder may land just above zero or just below `divisor`, both
/// count as divisible.
#[must_use]
pub fn almost_divisible_by(dividend: f64, divisor: f64) -> bool {
    let abs_mod = (dividend % divisor).abs();
    almost_equal(abs_mod, 0.0) || almost_equal(abs_mod - divisor, 0.0)
}

/// Normalize a rotation in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

/// One of the four orientations a shape can have when its rotation is a
/// multiple of 90 degrees. Angles grow clockwise, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarterTurn {
    /// 0 degrees.
    Deg0,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise (90 counter-clockwise).
    Deg270,
}

impl QuarterTurn {
    /// Quantize a rotation by rounding `(cos, sin)` of the angle.
    ///
    /// Returns `None` when the rotation is not within tolerance of a multiple
    /// of 90 degrees.
    #[must_use]
    pub fn from_rotation(deg: f64) -> Option<Self> {
        let rad = deg_to_radians(deg);
        let (sin, cos) = rad.sin_cos();
        if almost_equal(cos, 1.0) && almost_equal(sin, 0.0) {
            Some(Self::Deg0)
        } else if almost_equal(cos, 0.0) && almost_equal(sin, 1.0) {
            Some(Self::Deg90)
        } else if almost_equal(cos, -1.0) && almost_equal(sin, 0.0) {
            Some(Self::Deg180)
        } else if almost_equal(cos, 0.0) && almost_equal(sin, -1.0) {
            Some(Self::Deg270)
        } else {
            None
        }
    }

    /// Whether this orientation swaps the local X and Y axes on the canvas.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// A point in canvas or screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `amount` on every side.
    #[must_use]
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Shrink width and height by `amount`, keeping the top-left corner.
    #[must_use]
    pub fn deflate(&self, amount: f64) -> Self {
        Self::new(self.x, self.y, self.width - amount, self.height - amount)
    }

    /// Axis-aligned bounding box of this rectangle after rotating it by
    /// `rotation` degrees (clockwise on screen) around `origin`.
    #[must_use]
    pub fn rotated_bounds(&self, origin: Point, rotation: f64) -> Self {
        if almost_divisible_by(rotation, 360.0) {
            return Self::new(origin.x + self.x, origin.y + self.y, self.width, self.height);
        }
        let (sin, cos) = deg_to_radians(rotation).sin_cos();
        let corners = [
            (self.x, self.y),
            (self.right(), self.y),
            (self.right(), self.bottom()),
            (self.x, self.bottom()),
        ];
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (px, py) in corners {
            let x = origin.x + px * cos - py * sin;
            let y = origin.y + px * sin + py * cos;
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
        }
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}
