#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn line(cable: &str) -> LineSpec {
    LineSpec { cable: Some(cable.to_owned()), conduit: Some("PVC 25".to_owned()) }
}

fn circuit(id: &str, kind: CircuitKind, nature: Nature) -> Circuit {
    Circuit {
        id: id.to_owned(),
        kind,
        description: String::new(),
        nature,
        cable: Some("2x2.5".to_owned()),
        conduit: None,
    }
}

fn full_inventory() -> CircuitInventory {
    CircuitInventory {
        panels: vec![
            Panel {
                id: "main".into(),
                name: "Main".into(),
                incoming_line: Some(line("4x16")),
                grounding_system: Some("TT".into()),
                ..Panel::default()
            },
            Panel {
                id: "kitchen".into(),
                name: "Kitchen".into(),
                parent_id: Some("main".into()),
                feeder: Some(line("4x6")),
                ..Panel::default()
            },
        ],
        circuits: vec![
            circuit("C1", CircuitKind::Lighting, Nature::Projected),
            circuit("C2", CircuitKind::Outlets, Nature::Surveyed),
        ],
    }
}

fn ids(layers: &[Layer]) -> Vec<&str> {
    layers.iter().map(|l| l.id.as_str()).collect()
}

#[test]
fn empty_inventory_yields_architecture_only() {
    let layers = derive_layers(&CircuitInventory::default());
    assert_eq!(ids(&layers), vec![ARCHITECTURE_LAYER_ID]);
    assert!(layers[0].is_architecture());
    assert!(layers[0].nature().is_none());
}

#[test]
fn full_inventory_order() {
    let layers = derive_layers(&full_inventory());
    assert_eq!(
        ids(&layers),
        vec![ARCHITECTURE_LAYER_ID, MAIN_FEEDER_LAYER_ID, "feeder-kitchen", GROUNDING_LAYER_ID, "circuit-C1", "circuit-C2"]
    );
}

#[test]
fn circuit_layers_carry_metadata_and_type_color() {
    let layers = derive_layers(&full_inventory());
    let c1 = layers.iter().find(|l| l.id == "circuit-C1").unwrap();
    assert_eq!(c1.color, CircuitKind::Lighting.color());
    assert_eq!(c1.circuit_id.as_deref(), Some("C1"));
    assert_eq!(c1.nature(), Some(Nature::Projected));
    assert_eq!(c1.circuit.as_ref().unwrap().cable.as_deref(), Some("2x2.5"));
    assert!(!c1.is_architecture());
}

#[test]
fn surveyed_circuits_are_dimmed() {
    let layers = derive_layers(&full_inventory());
    let projected = layers.iter().find(|l| l.id == "circuit-C1").unwrap();
    let surveyed = layers.iter().find(|l| l.id == "circuit-C2").unwrap();
    assert_eq!(projected.opacity, 1.0);
    assert_eq!(surveyed.opacity, SURVEYED_OPACITY);
}

#[test]
fn main_without_incoming_line_skips_feeder() {
    let mut inv = full_inventory();
    inv.panels[0].incoming_line = None;
    let layers = derive_layers(&inv);
    assert!(!ids(&layers).contains(&MAIN_FEEDER_LAYER_ID));
}

#[test]
fn malformed_feeder_is_skipped_not_fatal() {
    let mut inv = full_inventory();
    inv.panels[1].feeder = Some(LineSpec { cable: Some("  ".into()), conduit: None });
    let layers = derive_layers(&inv);
    assert!(!ids(&layers).contains(&"feeder-kitchen"));
    assert!(ids(&layers).contains(&"circuit-C2"));
}

#[test]
fn blank_grounding_is_ignored() {
    let mut inv = full_inventory();
    inv.panels[0].grounding_system = Some(String::new());
    let layers = derive_layers(&inv);
    assert!(!ids(&layers).contains(&GROUNDING_LAYER_ID));
}

#[test]
fn grounding_declared_by_any_panel_emits_one_layer() {
    let mut inv = full_inventory();
    inv.panels[1].grounding_system = Some("TN-S".into());
    let layers = derive_layers(&inv);
    assert_eq!(layers.iter().filter(|l| l.id == GROUNDING_LAYER_ID).count(), 1);
}

#[test]
fn unknown_circuit_kind_deserializes_as_other() {
    let c: Circuit = serde_json::from_value(json!({
        "id": "X", "kind": "heat_pump", "nature": "projected"
    }))
    .unwrap();
    assert_eq!(c.kind, CircuitKind::Other);
    assert_eq!(c.kind.color(), "#6B7280");
}

#[test]
fn sync_replaces_on_id_mismatch() {
    let mut current = vec![Layer::architecture()];
    let derived = derive_layers(&full_inventory());
    assert!(sync_floor_layers(&mut current, &derived));
    assert_eq!(current, derived);
}

#[test]
fn sync_keeps_flags_when_ids_match() {
    let derived = derive_layers(&full_inventory());
    let mut current = derived.clone();
    current[4].locked = true;
    current[5].visible = false;
    assert!(!sync_floor_layers(&mut current, &derived));
    assert!(current[4].locked);
    assert!(!current[5].visible);
}

#[test]
fn sync_replaces_on_reorder_of_same_length() {
    let derived = derive_layers(&full_inventory());
    let mut current = derived.clone();
    current.swap(4, 5);
    assert!(sync_floor_layers(&mut current, &derived));
    assert_eq!(ids(&current), ids(&derived));
}

#[test]
fn active_layer_falls_back_to_architecture() {
    let layers = derive_layers(&full_inventory());
    assert_eq!(resolve_active_layer(&layers, "circuit-C1"), "circuit-C1");
    assert_eq!(resolve_active_layer(&layers, "circuit-gone"), ARCHITECTURE_LAYER_ID);
}
