#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Opening, OpeningKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn four_by_three_at_fifty_is_200_by_150() {
    let walls = generate_rectangle_walls(4.0, 3.0, 50.0);
    assert_eq!(walls.len(), 4);
    assert_eq!((walls[0].start, walls[0].end), (pt(0.0, 0.0), pt(200.0, 0.0)));
    assert_eq!((walls[1].start, walls[1].end), (pt(200.0, 0.0), pt(200.0, 150.0)));
    assert_eq!((walls[2].start, walls[2].end), (pt(200.0, 150.0), pt(0.0, 150.0)));
    assert_eq!((walls[3].start, walls[3].end), (pt(0.0, 150.0), pt(0.0, 0.0)));
}

#[test]
fn walls_form_closed_loop() {
    let walls = generate_rectangle_walls(5.5, 2.25, 37.0);
    for i in 0..4 {
        assert_eq!(walls[i].end, walls[(i + 1) % 4].start, "gap after wall {i}");
    }
}

#[test]
fn walls_have_distinct_ids() {
    let walls = generate_rectangle_walls(1.0, 1.0, 10.0);
    for i in 0..4 {
        for j in (i + 1)..4 {
            assert_ne!(walls[i].id, walls[j].id);
        }
    }
}

#[test]
fn room_group_anchored_at_point() {
    let room = create_room_group(4.0, 3.0, pt(120.0, 80.0), 50.0, Some("architecture".into()));
    assert_eq!(room.transform.translation(), pt(120.0, 80.0));
    assert_eq!(room.walls[0].start, pt(0.0, 0.0));
    assert_eq!(room.absolute_wall(1), Some((pt(320.0, 80.0), pt(320.0, 230.0))));
    assert_eq!(room.width, 4.0);
    assert_eq!(room.length, 3.0);
    assert!(room.openings.is_empty());
    assert!(room.walls.iter().all(|w| w.layer_id.as_deref() == Some("architecture")));
}

#[test]
fn absolute_wall_out_of_range_is_none() {
    let room = create_room_group(1.0, 1.0, pt(0.0, 0.0), 50.0, None);
    assert!(room.absolute_wall(4).is_none());
}

#[test]
fn normalize_bakes_scale_into_size() {
    let mut room = create_room_group(4.0, 3.0, pt(0.0, 0.0), 50.0, None);
    room.transform.scale_x = 1.5;
    room.transform.scale_y = 2.0;
    normalize_room_scale(&mut room, 50.0);
    assert_eq!(room.width, 6.0);
    assert_eq!(room.length, 6.0);
    assert!(room.transform.is_unit_scale());
    assert_eq!(room.walls.len(), 4);
    assert_eq!(room.walls[1].start, pt(300.0, 0.0));
    assert_eq!(room.walls[2].start, pt(300.0, 300.0));
}

#[test]
fn normalize_unit_scale_is_noop() {
    let mut room = create_room_group(4.0, 3.0, pt(0.0, 0.0), 50.0, None);
    let before = room.clone();
    normalize_room_scale(&mut room, 50.0);
    assert_eq!(room, before);
}

#[test]
fn normalize_reclamps_openings_on_shrink() {
    let mut room = create_room_group(4.0, 3.0, pt(0.0, 0.0), 50.0, None);
    room.openings.push(Opening {
        id: uuid::Uuid::new_v4(),
        room_id: room.id,
        wall_index: 0,
        position: 0.9,
        width: 0.8,
        kind: OpeningKind::Passage,
    });
    // Shrink the top wall to 2 units: the 0.8-unit opening spans 0.4 of it.
    room.transform.scale_x = 0.5;
    normalize_room_scale(&mut room, 50.0);
    let pos = room.openings[0].position;
    assert!((pos - 0.8).abs() < 1e-9, "position {pos}");
}
