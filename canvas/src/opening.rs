//! Door, window and passage placement on room-group walls.
//!
//! Openings are stored as a normalized centre position along one wall. The
//! helpers here convert an opening's real-world width into a fraction of that
//! wall, keep the whole span inside the wall, detect overlaps between
//! openings on the same wall, and derive anchor and door-swing geometry for
//! renderers.

#[cfg(test)]
#[path = "opening_test.rs"]
mod opening_test;

use uuid::Uuid;

use crate::camera::{Point, angle_deg};
use crate::consts::{DOOR_SWEEP_DEG, GEOM_EPSILON};
use crate::doc::{Opening, OpeningKind, OpeningSpec, RoomGroup, SwingDirection, SwingSide, Wall};
use crate::error::EditError;
use crate::transform::GroupTransform;

// =============================================================================
// POSITION
// =============================================================================

/// Fraction of a wall covered by an opening of `width` real-world units.
///
/// A degenerate wall reports 1.0 (the opening fills it).
#[must_use]
pub fn opening_proportion(width: f64, pixels_per_unit: f64, wall_length_px: f64) -> f64 {
    if wall_length_px <= GEOM_EPSILON {
        return 1.0;
    }
    (width * pixels_per_unit / wall_length_px).max(0.0)
}

/// Clamp a candidate centre position so the opening's full span stays on the wall.
///
/// `margin` is applied first; the physical `[p/2, 1 - p/2]` clamp always runs
/// last and wins. An opening at least as wide as the wall is centred.
#[must_use]
pub fn validate_position(position: f64, proportion: f64, margin: f64) -> f64 {
    let half = proportion / 2.0;
    if half >= 0.5 || !position.is_finite() {
        return 0.5;
    }
    let margin = margin.clamp(0.0, 0.5);
    position.clamp(margin, 1.0 - margin).clamp(half, 1.0 - half)
}

/// `[start, end]` interval of an opening along its wall.
#[must_use]
pub fn opening_span(position: f64, proportion: f64) -> (f64, f64) {
    let half = proportion / 2.0;
    (position - half, position + half)
}

/// Whether two wall intervals intersect. Touching intervals overlap.
#[must_use]
pub fn spans_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    !(a.1 < b.0 || b.1 < a.0)
}

/// Whether two openings of `room` collide. Openings on different walls never do.
#[must_use]
pub fn openings_overlap(room: &RoomGroup, a: &Opening, b: &Opening, pixels_per_unit: f64) -> bool {
    if a.room_id != b.room_id || a.wall_index != b.wall_index {
        return false;
    }
    let Some(wall) = room.walls.get(a.wall_index) else {
        return false;
    };
    let len = wall.length();
    let pa = opening_proportion(a.width, pixels_per_unit, len);
    let pb = opening_proportion(b.width, pixels_per_unit, len);
    spans_overlap(opening_span(a.position, pa), opening_span(b.position, pb))
}

/// First opening of `room` other than `candidate` that `candidate` would collide with.
#[must_use]
pub fn find_overlap<'a>(room: &'a RoomGroup, candidate: &Opening, pixels_per_unit: f64) -> Option<&'a Opening> {
    room.openings
        .iter()
        .filter(|o| o.id != candidate.id)
        .find(|o| openings_overlap(room, candidate, o, pixels_per_unit))
}

/// Build an opening on `room`'s wall `wall_index` at a clamped `position`.
///
/// # Errors
///
/// `WallIndexOutOfRange` for a bad wall index, `OpeningOverlap` if the clamped
/// opening collides with an existing one on that wall.
pub fn create_opening(
    room: &RoomGroup,
    wall_index: usize,
    position: f64,
    spec: &OpeningSpec,
    pixels_per_unit: f64,
    margin: f64,
) -> Result<Opening, EditError> {
    let wall = room.walls.get(wall_index).ok_or(EditError::WallIndexOutOfRange(wall_index))?;
    let proportion = opening_proportion(spec.width, pixels_per_unit, wall.length());
    let opening = Opening {
        id: Uuid::new_v4(),
        room_id: room.id,
        wall_index,
        position: validate_position(position, proportion, margin),
        width: spec.width,
        kind: spec.kind.clone(),
    };
    if let Some(existing) = find_overlap(room, &opening, pixels_per_unit) {
        return Err(EditError::OpeningOverlap(existing.id));
    }
    Ok(opening)
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Group scale that applies along `wall`: `scale_y` for walls closer to
/// vertical, `scale_x` otherwise. Renderers divide stroke widths and hit radii
/// by it so they look the same under non-uniform group scaling.
#[must_use]
pub fn effective_scale(wall: &Wall, transform: &GroupTransform) -> f64 {
    if wall.angle().to_radians().sin().abs() > 0.5 {
        transform.scale_y
    } else {
        transform.scale_x
    }
}

/// Door swing arc and leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSwing {
    pub hinge: Point,
    pub radius: f64,
    /// Angle of the closed leaf, in degrees.
    pub start_angle: f64,
    /// Signed sweep, always ±90°.
    pub sweep_angle: f64,
    /// Free end of the fully open leaf.
    pub leaf_end: Point,
}

/// Swing geometry for a door filling the break `break_start`-`break_end`.
///
/// The four (side, direction) cases are literal: the hinge sits at the break
/// end matching the side, and the leaf opens by +90° or -90° from the wall.
#[must_use]
pub fn door_swing(swing: SwingSide, direction: SwingDirection, break_start: Point, break_end: Point) -> DoorSwing {
    let wall_angle = angle_deg(break_start, break_end);
    let radius = break_start.distance(break_end);
    let (hinge, start_angle, sweep_angle) = match (swing, direction) {
        (SwingSide::Left, SwingDirection::Inward) => (break_start, wall_angle, DOOR_SWEEP_DEG),
        (SwingSide::Left, SwingDirection::Outward) => (break_start, wall_angle, -DOOR_SWEEP_DEG),
        (SwingSide::Right, SwingDirection::Inward) => (break_end, wall_angle + 180.0, -DOOR_SWEEP_DEG),
        (SwingSide::Right, SwingDirection::Outward) => (break_end, wall_angle + 180.0, DOOR_SWEEP_DEG),
    };
    let (sin, cos) = (start_angle + sweep_angle).to_radians().sin_cos();
    let leaf_end = hinge + Point::new(cos, sin) * radius;
    DoorSwing { hinge, radius, start_angle, sweep_angle, leaf_end }
}

/// Rendered anchor geometry of an opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningGeometry {
    /// Start of the wall break.
    pub start: Point,
    /// End of the wall break.
    pub end: Point,
    pub center: Point,
    /// Wall direction in degrees.
    pub angle: f64,
    /// See [`effective_scale`].
    pub stroke_scale: f64,
    pub swing: Option<DoorSwing>,
}

fn geometry_from_break(kind: &OpeningKind, start: Point, end: Point, stroke_scale: f64) -> OpeningGeometry {
    let swing = match *kind {
        OpeningKind::Door { swing, direction, .. } => Some(door_swing(swing, direction, start, end)),
        OpeningKind::Window { .. } | OpeningKind::Passage => None,
    };
    OpeningGeometry { start, end, center: start.midpoint(end), angle: angle_deg(start, end), stroke_scale, swing }
}

fn break_points(wall: &Wall, opening: &Opening, pixels_per_unit: f64) -> (Point, Point) {
    let proportion = opening_proportion(opening.width, pixels_per_unit, wall.length());
    let (a, b) = opening_span(opening.position, proportion);
    (wall.start.lerp(wall.end, a), wall.start.lerp(wall.end, b))
}

/// Opening geometry in the room group's local space.
#[must_use]
pub fn local_geometry(room: &RoomGroup, opening: &Opening, pixels_per_unit: f64) -> Option<OpeningGeometry> {
    let wall = room.walls.get(opening.wall_index)?;
    let (start, end) = break_points(wall, opening, pixels_per_unit);
    Some(geometry_from_break(&opening.kind, start, end, effective_scale(wall, &room.transform)))
}

/// Opening geometry in absolute canvas space, derived from the transformed break points.
#[must_use]
pub fn absolute_geometry(room: &RoomGroup, opening: &Opening, pixels_per_unit: f64) -> Option<OpeningGeometry> {
    let wall = room.walls.get(opening.wall_index)?;
    let (start, end) = break_points(wall, opening, pixels_per_unit);
    let t = &room.transform;
    Some(geometry_from_break(
        &opening.kind,
        t.local_to_absolute(start),
        t.local_to_absolute(end),
        effective_scale(wall, t),
    ))
}
