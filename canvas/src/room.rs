//! Rectangular room generation and resize normalisation.

#[cfg(test)]
#[path = "room_test.rs"]
mod room_test;

use uuid::Uuid;

use crate::camera::Point;
use crate::doc::{LayerId, RoomGroup, Wall};
use crate::opening::{opening_proportion, validate_position};
use crate::transform::GroupTransform;

/// Four walls of a `width` x `length` rectangle in local space, clockwise from the origin:
/// top, right, bottom, left. Each wall ends where the next one starts.
#[must_use]
pub fn generate_rectangle_walls(width: f64, length: f64, pixels_per_unit: f64) -> Vec<Wall> {
    let w = width * pixels_per_unit;
    let h = length * pixels_per_unit;
    let corners = [Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(w, h), Point::new(0.0, h)];
    (0..4).map(|i| Wall::new(corners[i], corners[(i + 1) % 4])).collect()
}

/// A new room group with its local origin at `anchor`.
#[must_use]
pub fn create_room_group(
    width: f64,
    length: f64,
    anchor: Point,
    pixels_per_unit: f64,
    layer_id: Option<LayerId>,
) -> RoomGroup {
    let mut walls = generate_rectangle_walls(width, length, pixels_per_unit);
    for wall in &mut walls {
        wall.layer_id.clone_from(&layer_id);
    }
    RoomGroup {
        id: Uuid::new_v4(),
        walls,
        transform: GroupTransform::at(anchor),
        width,
        length,
        openings: Vec::new(),
        layer_id,
    }
}

/// Bake a non-unit group scale into width/length and reset the scale to (1, 1).
///
/// Walls are regenerated in the same order; openings keep their wall index and
/// normalized position, re-clamped so they still fit the resized wall.
pub fn normalize_room_scale(room: &mut RoomGroup, pixels_per_unit: f64) {
    if room.transform.is_unit_scale() {
        return;
    }
    room.width *= room.transform.scale_x.abs();
    room.length *= room.transform.scale_y.abs();
    room.transform.scale_x = 1.0;
    room.transform.scale_y = 1.0;

    let mut walls = generate_rectangle_walls(room.width, room.length, pixels_per_unit);
    for wall in &mut walls {
        wall.layer_id.clone_from(&room.layer_id);
    }
    room.walls = walls;

    for opening in &mut room.openings {
        let Some(wall) = room.walls.get(opening.wall_index) else {
            continue;
        };
        let proportion = opening_proportion(opening.width, pixels_per_unit, wall.length());
        opening.position = validate_position(opening.position, proportion, 0.0);
    }
}
