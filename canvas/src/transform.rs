//! Room-group transforms: local wall space <-> absolute canvas space.
//!
//! A room group stores its walls relative to its own origin. The group
//! transform applies, in order, a non-uniform scale, a rotation, and a
//! translation:
//!
//! ```text
//! absolute = rotate(scale(local, sx, sy), θ) + (tx, ty)
//! local    = scale⁻¹(rotate(absolute - (tx, ty), -θ))
//! ```
//!
//! Rotation is in degrees, positive turning clockwise on the y-down canvas,
//! the same convention as [`Point::rotate_deg`].

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::GEOM_EPSILON;

/// Position, rotation and per-axis scale of a room group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupTransform {
    /// Translation along x, in canvas pixels.
    pub x: f64,
    /// Translation along y, in canvas pixels.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Scale along the group's local x axis.
    pub scale_x: f64,
    /// Scale along the group's local y axis.
    pub scale_y: f64,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GroupTransform {
    #[must_use]
    pub fn identity() -> Self {
        Self { x: 0.0, y: 0.0, rotation: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Unrotated, unscaled transform placing the local origin at `origin`.
    #[must_use]
    pub fn at(origin: Point) -> Self {
        Self { x: origin.x, y: origin.y, ..Self::identity() }
    }

    #[must_use]
    pub fn translation(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a point from the group's local space to absolute canvas space.
    #[must_use]
    pub fn local_to_absolute(&self, local: Point) -> Point {
        let scaled = Point::new(local.x * self.scale_x, local.y * self.scale_y);
        scaled.rotate_deg(self.rotation) + self.translation()
    }

    /// Map an absolute canvas point into the group's local space.
    ///
    /// Exact inverse of [`Self::local_to_absolute`]. A zero scale axis
    /// collapses that coordinate to 0 instead of dividing by zero.
    #[must_use]
    pub fn absolute_to_local(&self, absolute: Point) -> Point {
        let unrotated = (absolute - self.translation()).rotate_deg(-self.rotation);
        Point::new(safe_div(unrotated.x, self.scale_x), safe_div(unrotated.y, self.scale_y))
    }

    /// Whether the scale is (1, 1) within tolerance.
    #[must_use]
    pub fn is_unit_scale(&self) -> bool {
        (self.scale_x - 1.0).abs() <= GEOM_EPSILON && (self.scale_y - 1.0).abs() <= GEOM_EPSILON
    }
}

fn safe_div(value: f64, divisor: f64) -> f64 {
    if divisor.abs() <= GEOM_EPSILON { 0.0 } else { value / divisor }
}
