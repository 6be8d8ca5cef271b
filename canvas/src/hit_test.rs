#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{AuxLine, Dimension, Opening, OpeningKind, Wall};
use crate::room::create_room_group;
use uuid::Uuid;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn arch() -> Vec<Layer> {
    vec![Layer::architecture()]
}

fn room_with_passage(elements: &mut ElementCollection) -> (ElementId, ElementId) {
    let mut room = create_room_group(4.0, 3.0, pt(0.0, 0.0), 50.0, None);
    let opening = Opening {
        id: Uuid::new_v4(),
        room_id: room.id,
        wall_index: 0,
        position: 0.5,
        width: 1.0,
        kind: OpeningKind::Passage,
    };
    let ids = (room.id, opening.id);
    room.openings.push(opening);
    elements.room_groups.push(room);
    ids
}

// =============================================================
// Priority
// =============================================================

#[test]
fn empty_collection_misses() {
    assert!(hit_test(&ElementCollection::default(), &arch(), pt(0.0, 0.0), 8.0, 50.0).is_none());
}

#[test]
fn opening_wins_over_room_wall() {
    let mut elements = ElementCollection::default();
    let (room_id, opening_id) = room_with_passage(&mut elements);
    let hit = hit_test(&elements, &arch(), pt(100.0, 2.0), 8.0, 50.0).unwrap();
    assert_eq!(hit, Hit::Opening { room_id, opening_id });
    assert_eq!(hit.id(), opening_id);
}

#[test]
fn room_wall_away_from_opening_selects_room() {
    let mut elements = ElementCollection::default();
    let (room_id, _) = room_with_passage(&mut elements);
    let hit = hit_test(&elements, &arch(), pt(198.0, 75.0), 8.0, 50.0).unwrap();
    assert_eq!(hit, Hit::Element { id: room_id, kind: ElementKind::RoomGroup });
}

#[test]
fn symbol_wins_over_wall() {
    let mut elements = ElementCollection::default();
    elements.walls.push(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0)));
    let symbol = Symbol::new(SymbolKind::Catalog { type_id: "outlet".into() }, pt(50.0, 0.0));
    let symbol_id = symbol.id;
    elements.symbols.push(symbol);
    let hit = hit_test(&elements, &arch(), pt(52.0, 1.0), 8.0, 50.0).unwrap();
    assert_eq!(hit, Hit::Element { id: symbol_id, kind: ElementKind::Symbol });
}

#[test]
fn later_wall_is_on_top() {
    let mut elements = ElementCollection::default();
    elements.walls.push(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0)));
    let top = Wall::new(pt(0.0, 2.0), pt(100.0, 2.0));
    let top_id = top.id;
    elements.walls.push(top);
    assert_eq!(hit_test(&elements, &arch(), pt(50.0, 1.0), 8.0, 50.0).map(|h| h.id()), Some(top_id));
}

#[test]
fn aux_line_and_dimension_are_hittable() {
    let mut elements = ElementCollection::default();
    let aux = AuxLine::new(pt(0.0, 0.0), pt(0.0, 100.0));
    let aux_id = aux.id;
    elements.aux_lines.push(aux);
    let dim = Dimension::from_points(pt(200.0, 0.0), pt(300.0, 0.0), 50.0, 20.0);
    let dim_id = dim.id;
    elements.dimensions.push(dim);
    assert_eq!(hit_test(&elements, &arch(), pt(3.0, 50.0), 8.0, 50.0).map(|h| h.id()), Some(aux_id));
    assert_eq!(hit_test(&elements, &arch(), pt(250.0, -3.0), 8.0, 50.0).map(|h| h.id()), Some(dim_id));
}

// =============================================================
// Pipes and symbols
// =============================================================

#[test]
fn curved_pipe_hit_follows_curve() {
    let pipe = Pipe::curved(pt(0.0, 0.0), pt(100.0, 0.0), "#000");
    // Bulge is 20 px at the apex of the control polygon, 10 px on the curve itself.
    let apex = pipe.path().point_at(0.5);
    assert!(pipe_distance(&pipe, apex) < 1e-6);
    assert!(pipe_distance(&pipe, pt(50.0, 0.0)) > 5.0);
}

#[test]
fn straight_pipe_distance() {
    let pipe = Pipe::straight(pt(0.0, 0.0), pt(100.0, 0.0), "#000");
    assert!((pipe_distance(&pipe, pt(50.0, 7.0)) - 7.0).abs() < 1e-9);
}

#[test]
fn symbol_radius_by_kind() {
    let mut circle = Symbol::new(
        SymbolKind::Circle { radius: 30.0, style: crate::doc::ShapeStyle::default() },
        pt(0.0, 0.0),
    );
    assert_eq!(symbol_radius(&circle), 30.0);
    circle.scale = Some(2.0);
    assert_eq!(symbol_radius(&circle), 60.0);
    let table = Symbol::new(SymbolKind::Table { rows: 3, cols: 5 }, pt(0.0, 0.0));
    assert_eq!(symbol_radius(&table), 50.0);
}

// =============================================================
// Layers
// =============================================================

#[test]
fn hidden_layer_is_skipped() {
    let mut elements = ElementCollection::default();
    let mut wall = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0));
    wall.layer_id = Some("architecture".into());
    elements.walls.push(wall);
    let mut layers = arch();
    assert!(hit_test(&elements, &layers, pt(50.0, 0.0), 8.0, 50.0).is_some());
    layers[0].visible = false;
    assert!(hit_test(&elements, &layers, pt(50.0, 0.0), 8.0, 50.0).is_none());
}
