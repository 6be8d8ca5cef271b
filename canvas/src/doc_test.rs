#![allow(clippy::float_cmp)]

use super::*;
use crate::room::create_room_group;
use serde_json::json;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn room_with_opening() -> (RoomGroup, ElementId) {
    let mut room = create_room_group(4.0, 3.0, pt(0.0, 0.0), 50.0, Some("architecture".into()));
    let opening = Opening {
        id: Uuid::new_v4(),
        room_id: room.id,
        wall_index: 2,
        position: 0.5,
        width: 0.8,
        kind: OpeningKind::Window { height: 1.2, sill_height: 0.9 },
    };
    let id = opening.id;
    room.openings.push(opening);
    (room, id)
}

// =============================================================
// Enums
// =============================================================

#[test]
fn construction_state_admits() {
    assert!(ConstructionState::NewBuild.admits(Nature::Projected));
    assert!(!ConstructionState::NewBuild.admits(Nature::Surveyed));
    assert!(ConstructionState::Renovation.admits(Nature::Projected));
    assert!(ConstructionState::Renovation.admits(Nature::Surveyed));
}

#[test]
fn construction_state_defaults_to_new_build() {
    assert_eq!(ConstructionState::default(), ConstructionState::NewBuild);
    assert_eq!(serde_json::to_value(ConstructionState::Renovation).unwrap(), json!("renovation"));
}

#[test]
fn paper_sizes_are_landscape() {
    for paper in [PaperFormat::A4, PaperFormat::A3, PaperFormat::A2, PaperFormat::A1, PaperFormat::A0] {
        let (w, h) = paper.size_mm();
        assert!(w > h, "{paper:?}");
    }
    assert_eq!(PaperFormat::A3.size_mm(), (420.0, 297.0));
    assert_eq!(serde_json::to_value(PaperFormat::A1).unwrap(), json!("a1"));
}

#[test]
fn opening_kind_labels() {
    assert_eq!(OpeningKind::Passage.label(), "passage");
    assert_eq!(OpeningKind::Window { height: 1.0, sill_height: 1.0 }.label(), "window");
    let door = OpeningKind::Door { swing: SwingSide::Right, direction: SwingDirection::Outward, height: 2.0 };
    assert_eq!(door.label(), "door");
}

// =============================================================
// Pipes
// =============================================================

#[test]
fn straight_pipe_path_is_line() {
    let pipe = Pipe::straight(pt(0.0, 0.0), pt(10.0, 0.0), "#fff");
    assert_eq!(pipe.path(), PipePath::Line { start: pt(0.0, 0.0), end: pt(10.0, 0.0) });
    assert_eq!(pipe.path().point_at(0.5), pt(5.0, 0.0));
}

#[test]
fn default_control_point_bulges_perpendicular() {
    let c = default_control_point(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!((c.x - 50.0).abs() < 1e-9);
    assert!((c.y - 20.0).abs() < 1e-9);
}

#[test]
fn curved_pipe_endpoints_and_apex() {
    let pipe = Pipe::curved(pt(0.0, 0.0), pt(100.0, 0.0), "#fff");
    let path = pipe.path();
    assert_eq!(path.point_at(0.0), pt(0.0, 0.0));
    assert_eq!(path.point_at(1.0), pt(100.0, 0.0));
    let apex = path.point_at(0.5);
    assert!((apex.y - 10.0).abs() < 1e-9);
}

#[test]
fn curved_flag_without_control_draws_straight() {
    let mut pipe = Pipe::straight(pt(0.0, 0.0), pt(10.0, 0.0), "#fff");
    pipe.curved = true;
    assert!(matches!(pipe.path(), PipePath::Line { .. }));
}

// =============================================================
// ElementCollection
// =============================================================

#[test]
fn locate_finds_every_kind() {
    let mut elements = ElementCollection::default();
    let mut wall = Wall::new(pt(0.0, 0.0), pt(1.0, 0.0));
    wall.layer_id = Some("architecture".into());
    let wall_id = wall.id;
    elements.walls.push(wall);
    let (room, opening_id) = room_with_opening();
    let room_id = room.id;
    elements.room_groups.push(room);
    let pipe = Pipe::straight(pt(0.0, 0.0), pt(1.0, 1.0), "#000");
    let pipe_id = pipe.id;
    elements.pipes.push(pipe);

    assert_eq!(elements.locate(&wall_id), Some((ElementKind::Wall, Some("architecture"))));
    assert_eq!(elements.locate(&room_id), Some((ElementKind::RoomGroup, Some("architecture"))));
    assert_eq!(elements.locate(&opening_id), Some((ElementKind::Opening, Some("architecture"))));
    assert_eq!(elements.locate(&pipe_id), Some((ElementKind::Pipe, None)));
    assert_eq!(elements.locate(&Uuid::new_v4()), None);
}

#[test]
fn len_counts_openings() {
    let mut elements = ElementCollection::default();
    assert!(elements.is_empty());
    let (room, _) = room_with_opening();
    elements.room_groups.push(room);
    elements.aux_lines.push(AuxLine::new(pt(0.0, 0.0), pt(5.0, 5.0)));
    assert_eq!(elements.len(), 3);
}

#[test]
fn translate_moves_pipe_control() {
    let mut elements = ElementCollection::default();
    let pipe = Pipe::curved(pt(0.0, 0.0), pt(100.0, 0.0), "#000");
    let id = pipe.id;
    let control = pipe.control.unwrap();
    elements.pipes.push(pipe);
    assert!(elements.translate(&id, pt(5.0, -5.0)));
    let moved = &elements.pipes[0];
    assert_eq!(moved.start, pt(5.0, -5.0));
    assert_eq!(moved.control, Some(control + pt(5.0, -5.0)));
}

#[test]
fn translate_room_moves_transform_only() {
    let mut elements = ElementCollection::default();
    let (room, _) = room_with_opening();
    let id = room.id;
    let walls = room.walls.clone();
    elements.room_groups.push(room);
    assert!(elements.translate(&id, pt(10.0, 20.0)));
    let room = elements.room(&id).unwrap();
    assert_eq!(room.transform.translation(), pt(10.0, 20.0));
    assert_eq!(room.walls, walls);
    assert_eq!(room.absolute_wall(0).map(|(s, _)| s), Some(pt(10.0, 20.0)));
}

#[test]
fn translate_unknown_is_false() {
    let mut elements = ElementCollection::default();
    assert!(!elements.translate(&Uuid::new_v4(), pt(1.0, 1.0)));
}

#[test]
fn remove_pipe_clears_dashed_entry() {
    let mut elements = ElementCollection::default();
    let pipe = Pipe::straight(pt(0.0, 0.0), pt(1.0, 0.0), "#000");
    let id = pipe.id;
    elements.pipes.push(pipe);
    elements.dashed_pipes.insert(id);
    assert_eq!(elements.remove(&id), Some(ElementKind::Pipe));
    assert!(elements.dashed_pipes.is_empty());
    assert_eq!(elements.remove(&id), None);
}

#[test]
fn remove_opening_keeps_room() {
    let mut elements = ElementCollection::default();
    let (room, opening_id) = room_with_opening();
    let room_id = room.id;
    elements.room_groups.push(room);
    assert_eq!(elements.remove(&opening_id), Some(ElementKind::Opening));
    assert!(elements.room(&room_id).unwrap().openings.is_empty());
}

#[test]
fn absolute_wall_out_of_range() {
    let (room, _) = room_with_opening();
    assert!(room.absolute_wall(4).is_none());
}

// =============================================================
// Floors, settings, serde
// =============================================================

#[test]
fn new_floor_has_architecture_layer() {
    let floor = Floor::new("Ground floor");
    assert_eq!(floor.layers.len(), 1);
    assert!(floor.layer("architecture").is_some());
    assert!(floor.elements.is_empty());
    assert_eq!(floor.paper, PaperFormat::A4);
}

#[test]
fn settings_default_unit_label() {
    let settings: ProjectSettings = serde_json::from_value(json!({ "pixels_per_unit": 40.0 })).unwrap();
    assert_eq!(settings.unit_label, "m");
    assert_eq!(settings.construction, ConstructionState::NewBuild);
    assert_eq!(settings, ProjectSettings::new(40.0));
}

#[test]
fn opening_kind_is_tagged() {
    let door = OpeningKind::Door { swing: SwingSide::Left, direction: SwingDirection::Inward, height: 2.1 };
    assert_eq!(
        serde_json::to_value(&door).unwrap(),
        json!({ "type": "door", "swing": "left", "direction": "inward", "height": 2.1 })
    );
}

#[test]
fn symbol_kind_is_tagged() {
    let symbol = Symbol::new(SymbolKind::Catalog { type_id: "outlet".into() }, pt(1.0, 2.0));
    let value = serde_json::to_value(&symbol).unwrap();
    assert_eq!(value["kind"], json!({ "type": "catalog", "type_id": "outlet" }));
    assert!(value.get("scale").is_none());
    assert!(value.get("layer_id").is_none());
}

#[test]
fn collection_fields_default_when_missing() {
    let elements: ElementCollection = serde_json::from_value(json!({})).unwrap();
    assert!(elements.is_empty());
    assert!(elements.dashed_pipes.is_empty());
}

#[test]
fn document_json_round_trip() {
    let mut floor = Floor::new("Level 1");
    let (room, _) = room_with_opening();
    floor.elements.room_groups.push(room);
    floor.elements.pipes.push(Pipe::straight(pt(0.0, 0.0), pt(50.0, 50.0), "#123456"));
    let doc = ProjectDocument {
        id: Uuid::new_v4(),
        name: "House".into(),
        settings: ProjectSettings::new(50.0),
        floors: vec![floor],
    };
    let text = serde_json::to_string(&doc).unwrap();
    let back: ProjectDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
}
