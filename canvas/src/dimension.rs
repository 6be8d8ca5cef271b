//! Two-point measurement geometry: distance, label anchor, arrowheads.

#[cfg(test)]
#[path = "dimension_test.rs"]
mod dimension_test;

use uuid::Uuid;

use crate::camera::{Point, angle_deg};
use crate::consts::{ARROW_HALF_ANGLE_DEG, GEOM_EPSILON};
use crate::doc::Dimension;

/// Derived drawing data for a measurement between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionGeometry {
    pub distance_px: f64,
    pub distance_units: f64,
    /// Label centre, offset perpendicular to the segment.
    pub text_anchor: Point,
    /// Label rotation in degrees, within [-90, 90].
    pub text_rotation: f64,
    /// Triangle at the start point: tip then the two barbs.
    pub arrow_start: [Point; 3],
    /// Triangle at the end point: tip then the two barbs.
    pub arrow_end: [Point; 3],
}

/// Bring an angle into [-90, 90] so text never renders upside-down.
#[must_use]
pub fn normalize_text_rotation(degrees: f64) -> f64 {
    let mut angle = degrees % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    if angle > 90.0 {
        angle - 180.0
    } else if angle < -90.0 {
        angle + 180.0
    } else {
        angle
    }
}

fn arrowhead(tip: Point, back: Point, size: f64) -> [Point; 3] {
    [
        tip,
        tip + back.rotate_deg(ARROW_HALF_ANGLE_DEG) * size,
        tip + back.rotate_deg(-ARROW_HALF_ANGLE_DEG) * size,
    ]
}

/// Measure `start`-`end` at the given scale.
///
/// A zero-length segment measures 0 and uses +x as its direction. A
/// non-positive scale reports 0 real-world units.
#[must_use]
pub fn measure(start: Point, end: Point, pixels_per_unit: f64, text_offset: f64, arrow_size: f64) -> DimensionGeometry {
    let distance_px = start.distance(end);
    let distance_units = if pixels_per_unit > GEOM_EPSILON { distance_px / pixels_per_unit } else { 0.0 };
    let dir = (end - start).normalized().unwrap_or(Point::new(1.0, 0.0));
    let text_anchor = start.midpoint(end) + dir.rotate_deg(90.0) * text_offset;
    let text_rotation = if distance_px > GEOM_EPSILON { normalize_text_rotation(angle_deg(start, end)) } else { 0.0 };
    let reverse = dir * -1.0;
    DimensionGeometry {
        distance_px,
        distance_units,
        text_anchor,
        text_rotation,
        arrow_start: arrowhead(start, dir, arrow_size),
        arrow_end: arrowhead(end, reverse, arrow_size),
    }
}

/// Label text for a measurement, e.g. `3.00 m`.
#[must_use]
pub fn format_measurement(units: f64, unit_label: &str) -> String {
    format!("{units:.2} {unit_label}")
}

impl Dimension {
    /// A dimension between two points with its derived distances filled in.
    #[must_use]
    pub fn from_points(start: Point, end: Point, pixels_per_unit: f64, text_offset: f64) -> Self {
        let geometry = measure(start, end, pixels_per_unit, text_offset, 0.0);
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            distance_px: geometry.distance_px,
            distance_units: geometry.distance_units,
            text_offset,
            layer_id: None,
        }
    }

    /// Recompute derived drawing data, e.g. after a recalibration.
    #[must_use]
    pub fn geometry(&self, pixels_per_unit: f64, arrow_size: f64) -> DimensionGeometry {
        measure(self.start, self.end, pixels_per_unit, self.text_offset, arrow_size)
    }
}
