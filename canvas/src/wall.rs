//! Wall geometry: point-to-segment projection and nearest-wall search.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every pointer sample; nothing is cached across transform changes.

#[cfg(test)]
#[path = "wall_test.rs"]
mod wall_test;

use crate::camera::Point;
use crate::consts::GEOM_EPSILON;
use crate::doc::{ElementId, RoomGroup, Wall};
use crate::transform::GroupTransform;

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Clamped segment parameter in [0, 1].
    pub t: f64,
    /// Distance from the point to the projected point.
    pub distance: f64,
    /// Closest point on the segment.
    pub point: Point,
}

/// Project `point` onto the segment `start`-`end`.
///
/// A zero-length segment yields `t = 0` and the distance to `start`.
#[must_use]
pub fn project_point_on_segment(point: Point, start: Point, end: Point) -> Projection {
    let seg = end - start;
    let len_sq = seg.dot(seg);
    if len_sq <= GEOM_EPSILON {
        return Projection { t: 0.0, distance: point.distance(start), point: start };
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = start + seg * t;
    Projection { t, distance: point.distance(closest), point: closest }
}

/// Nearest wall found by a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Index into the searched wall slice.
    pub index: usize,
    pub wall_id: ElementId,
    /// Projection in the space the search ran in.
    pub projection: Projection,
    /// Wall length in the space the search ran in.
    pub wall_length: f64,
}

/// Find the wall nearest to an absolute `point`, with walls mapped through `transform`.
///
/// Returns `None` when the closest wall is farther than `max_distance`.
/// Ties keep the first wall in slice order.
#[must_use]
pub fn find_nearest_wall(
    walls: &[Wall],
    point: Point,
    transform: &GroupTransform,
    max_distance: f64,
) -> Option<WallHit> {
    nearest_by(walls, point, max_distance, |w| {
        (transform.local_to_absolute(w.start), transform.local_to_absolute(w.end))
    })
}

/// Local-space variant of [`find_nearest_wall`]: `point` and walls share the
/// group's local frame and no rotation or scale is applied.
#[must_use]
pub fn find_nearest_wall_local(walls: &[Wall], point: Point, max_distance: f64) -> Option<WallHit> {
    nearest_by(walls, point, max_distance, |w| (w.start, w.end))
}

fn nearest_by<F>(walls: &[Wall], point: Point, max_distance: f64, endpoints: F) -> Option<WallHit>
where
    F: Fn(&Wall) -> (Point, Point),
{
    let mut best: Option<WallHit> = None;
    for (index, wall) in walls.iter().enumerate() {
        let (start, end) = endpoints(wall);
        let projection = project_point_on_segment(point, start, end);
        if best.is_none_or(|b| projection.distance < b.projection.distance) {
            best = Some(WallHit { index, wall_id: wall.id, projection, wall_length: start.distance(end) });
        }
    }
    best.filter(|b| b.projection.distance <= max_distance)
}

/// Nearest wall across several room groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomWallHit {
    pub room_id: ElementId,
    pub hit: WallHit,
}

/// Run [`find_nearest_wall`] against every room group and keep the closest hit.
///
/// Ties keep the earlier room.
#[must_use]
pub fn find_nearest_room_wall(rooms: &[RoomGroup], point: Point, max_distance: f64) -> Option<RoomWallHit> {
    let mut best: Option<RoomWallHit> = None;
    for room in rooms {
        let Some(hit) = find_nearest_wall(&room.walls, point, &room.transform, max_distance) else {
            continue;
        };
        if best.is_none_or(|b| hit.projection.distance < b.hit.projection.distance) {
            best = Some(RoomWallHit { room_id: room.id, hit });
        }
    }
    best
}

/// Closest free-standing wall endpoint within `radius` of `point`.
#[must_use]
pub fn snap_to_endpoint(walls: &[Wall], point: Point, radius: f64) -> Option<Point> {
    walls
        .iter()
        .flat_map(|w| [w.start, w.end])
        .map(|p| (p, p.distance(point)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}

/// Constrain `point` to the horizontal or vertical through `anchor`, whichever is closer.
#[must_use]
pub fn constrain_orthogonal(anchor: Point, point: Point) -> Point {
    let d = point - anchor;
    if d.x.abs() >= d.y.abs() {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}
