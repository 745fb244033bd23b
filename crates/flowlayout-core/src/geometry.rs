//! Geometric primitives for layout simulation and positioning.
//!
//! This module provides the value types the Flowlayout engine uses to
//! describe where node boxes sit on the canvas and how they move.
//!
//! # Overview
//!
//! - [`Vector2`] - A 2D vector, used for positions, velocities and forces
//! - [`Size`] - Width and height of a node box
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Flowlayout uses the same coordinate system as the editor canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward, so "above" means a smaller `y`

use serde::{Deserialize, Serialize};

/// A 2D vector in canvas coordinate space.
///
/// Vectors are immutable `f32` pairs. Every operation returns a new value,
/// and none of them produce NaN from finite inputs.
///
/// # Examples
///
/// ```
/// # use flowlayout_core::geometry::Vector2;
/// let position = Vector2::new(10.0, 20.0);
/// let velocity = Vector2::new(5.0, -5.0);
///
/// let moved = position.add_vector(velocity.scale(2.0));
/// assert_eq!(moved.x(), 20.0);
/// assert_eq!(moved.y(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    x: f32,
    y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    /// Creates a new vector with the specified components
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x component
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y component
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both components are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks if both components are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another vector to this one, returning a new vector
    pub fn add_vector(self, other: Vector2) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another vector from this one, returning a new vector.
    ///
    /// Equivalent to `self.add_vector(other.scale(-1.0))`.
    pub fn sub_vector(self, other: Vector2) -> Self {
        self.add_vector(other.scale(-1.0))
    }

    /// Multiplies both components by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowlayout_core::geometry::Vector2;
    /// let force = Vector2::new(10.0, -20.0);
    ///
    /// let halved = force.scale(0.5);
    /// assert_eq!(halved.x(), 5.0);
    /// assert_eq!(halved.y(), -10.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the Euclidean length, `sqrt(x² + y²)`
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns a unit vector pointing the same way.
    ///
    /// A zero-length vector is scaled by `1` instead of `1 / 0`, so it
    /// normalizes to itself rather than to NaN. Callers that need a direction
    /// for coincident points must pick one themselves.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowlayout_core::geometry::Vector2;
    /// let unit = Vector2::new(3.0, 4.0).normalize();
    /// assert!((unit.length() - 1.0).abs() < 1e-6);
    ///
    /// assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    /// ```
    pub fn normalize(self) -> Self {
        let length = self.length();
        let factor = if length == 0.0 { 1.0 } else { 1.0 / length };
        self.scale(factor)
    }
}

/// Represents the dimensions of a node box with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both dimensions are finite and not negative
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Vector2, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Vector2, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Vector2 {
        Vector2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Vector2 {
        Vector2::new(self.min_x, self.min_y)
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowlayout_core::geometry::{Bounds, Size, Vector2};
    /// let source = Bounds::new_from_top_left(Vector2::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let sink = Bounds::new_from_top_left(Vector2::new(10.0, 200.0), Size::new(120.0, 80.0));
    ///
    /// let combined = source.merge(&sink);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.min_y(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 280.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_default_is_zero() {
        let vector = Vector2::default();
        assert_eq!(vector, Vector2::ZERO);
        assert!(vector.is_zero());
    }

    #[test]
    fn test_vector_add_and_sub() {
        let v1 = Vector2::new(5.0, 8.0);
        let v2 = Vector2::new(2.0, 3.0);

        let sum = v1.add_vector(v2);
        assert_eq!(sum.x(), 7.0);
        assert_eq!(sum.y(), 11.0);

        let difference = v1.sub_vector(v2);
        assert_eq!(difference.x(), 3.0);
        assert_eq!(difference.y(), 5.0);
    }

    #[test]
    fn test_vector_length() {
        assert_eq!(Vector2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vector2::ZERO.length(), 0.0);
    }

    #[test]
    fn test_vector_normalize() {
        let unit = Vector2::new(0.0, -200.0).normalize();
        assert_eq!(unit.x(), 0.0);
        assert_eq!(unit.y(), -1.0);
    }

    #[test]
    fn test_vector_normalize_zero_is_not_nan() {
        let unit = Vector2::ZERO.normalize();
        assert!(unit.is_finite());
        assert!(unit.is_zero());
    }

    #[test]
    fn test_vector_is_finite() {
        assert!(Vector2::new(1.0, -1.0).is_finite());
        assert!(!Vector2::new(f32::NAN, 0.0).is_finite());
        assert!(!Vector2::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_size_is_valid() {
        assert!(Size::new(0.0, 0.0).is_valid());
        assert!(Size::new(10.0, 5.0).is_valid());
        assert!(!Size::new(-1.0, 5.0).is_valid());
        assert!(!Size::new(10.0, f32::NAN).is_valid());
    }

    #[test]
    fn test_bounds_center_and_top_left_agree() {
        let top_left = Vector2::new(40.0, 45.0);
        let size = Size::new(20.0, 30.0);
        let bounds = Bounds::new_from_top_left(top_left, size);

        assert_eq!(bounds.center(), Vector2::new(50.0, 60.0));
        assert_eq!(Bounds::new_from_center(bounds.center(), size), bounds);
        assert_eq!(bounds.min_point(), top_left);
    }

    #[test]
    fn test_bounds_merge() {
        let b1 = Bounds::new_from_top_left(Vector2::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b2 = Bounds::new_from_top_left(Vector2::new(-5.0, 20.0), Size::new(10.0, 10.0));
        let merged = b1.merge(&b2);

        assert_eq!(merged.min_x(), -5.0);
        assert_eq!(merged.min_y(), 0.0);
        assert_eq!(merged.max_x(), 10.0);
        assert_eq!(merged.max_y(), 30.0);
    }

    #[test]
    fn test_vector_serializes_as_xy_object() {
        let json = serde_json::to_string(&Vector2::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":-2.0}"#);

        let size: Size = serde_json::from_str(r#"{"width":120,"height":40}"#).unwrap();
        assert_eq!(size, Size::new(120.0, 40.0));
    }
}
