//! Layer derivation from the external circuit inventory.
//!
//! DESIGN
//! ======
//! Layers are never edited one by one: whenever the circuit inventory changes
//! the full list is rebuilt by [`derive_layers`] and pushed to every floor by
//! [`sync_floor_layers`]. Order is fixed: architecture, main feeder, sectional
//! feeders, grounding, then one layer per terminal circuit in inventory order.
//!
//! ERROR HANDLING
//! ==============
//! Inventory data is consumed read-only and may be incomplete. A feeder or
//! grounding entry with missing fields is skipped with a debug log; it never
//! aborts the rebuild.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{ARCHITECTURE_LAYER_ID, SURVEYED_OPACITY};
use crate::doc::{LayerId, Nature};

const ARCHITECTURE_COLOR: &str = "#1F1A17";
const MAIN_FEEDER_COLOR: &str = "#111827";
const SECTIONAL_FEEDER_COLOR: &str = "#374151";
const GROUNDING_COLOR: &str = "#16A34A";

pub const MAIN_FEEDER_LAYER_ID: &str = "feeder-main";
pub const GROUNDING_LAYER_ID: &str = "grounding";

// =============================================================================
// INVENTORY (consumed)
// =============================================================================

/// Terminal circuit category, used to pick a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitKind {
    Lighting,
    Outlets,
    Dedicated,
    Motor,
    Signal,
    #[serde(other)]
    Other,
}

impl CircuitKind {
    /// Fixed display color for this circuit type.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Lighting => "#F59E0B",
            Self::Outlets => "#3B82F6",
            Self::Dedicated => "#EF4444",
            Self::Motor => "#8B5CF6",
            Self::Signal => "#10B981",
            Self::Other => "#6B7280",
        }
    }
}

/// A terminal circuit from the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: String,
    pub kind: CircuitKind,
    #[serde(default)]
    pub description: String,
    pub nature: Nature,
    #[serde(default)]
    pub cable: Option<String>,
    #[serde(default)]
    pub conduit: Option<String>,
}

/// Cable and conduit of a feeder run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineSpec {
    #[serde(default)]
    pub cable: Option<String>,
    #[serde(default)]
    pub conduit: Option<String>,
}

impl LineSpec {
    fn is_complete(&self) -> bool {
        self.cable.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// A distribution panel from the inventory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Parent panel for sub-panels; `None` for the main panel.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Supply line into the main panel.
    #[serde(default)]
    pub incoming_line: Option<LineSpec>,
    /// Feeder from the parent into this sub-panel.
    #[serde(default)]
    pub feeder: Option<LineSpec>,
    #[serde(default)]
    pub grounding_system: Option<String>,
    #[serde(default)]
    pub nature: Option<Nature>,
}

/// Snapshot of the external circuit inventory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitInventory {
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub circuits: Vec<Circuit>,
}

// =============================================================================
// LAYERS
// =============================================================================

/// Circuit metadata embedded in a circuit-bound layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conduit: Option<String>,
    pub nature: Nature,
}

/// A named, lockable, hideable grouping of drawn elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub color: String,
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    /// `None` marks the architecture layer.
    #[serde(default)]
    pub circuit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<CircuitMeta>,
}

impl Layer {
    /// The always-present architecture layer.
    #[must_use]
    pub fn architecture() -> Self {
        Self {
            id: ARCHITECTURE_LAYER_ID.to_owned(),
            name: "Architecture".to_owned(),
            color: ARCHITECTURE_COLOR.to_owned(),
            opacity: 1.0,
            visible: true,
            locked: false,
            circuit_id: None,
            circuit: None,
        }
    }

    #[must_use]
    pub fn is_architecture(&self) -> bool {
        self.circuit_id.is_none()
    }

    /// Nature inherited by elements drawn on this layer.
    #[must_use]
    pub fn nature(&self) -> Option<Nature> {
        self.circuit.as_ref().map(|c| c.nature)
    }

    fn circuit_bound(id: String, name: String, color: &str, circuit_id: String, meta: CircuitMeta) -> Self {
        Self {
            id,
            name,
            color: color.to_owned(),
            opacity: opacity_for(meta.nature),
            visible: true,
            locked: false,
            circuit_id: Some(circuit_id),
            circuit: Some(meta),
        }
    }
}

fn opacity_for(nature: Nature) -> f64 {
    match nature {
        Nature::Projected => 1.0,
        Nature::Surveyed => SURVEYED_OPACITY,
    }
}

/// Build the ordered layer list for an inventory.
#[must_use]
pub fn derive_layers(inventory: &CircuitInventory) -> Vec<Layer> {
    let mut layers = vec![Layer::architecture()];

    if let Some(main) = inventory.panels.iter().find(|p| p.parent_id.is_none()) {
        match main.incoming_line.as_ref().filter(|l| l.is_complete()) {
            Some(line) => layers.push(Layer::circuit_bound(
                MAIN_FEEDER_LAYER_ID.to_owned(),
                "Main feeder".to_owned(),
                MAIN_FEEDER_COLOR,
                MAIN_FEEDER_LAYER_ID.to_owned(),
                CircuitMeta {
                    cable: line.cable.clone(),
                    conduit: line.conduit.clone(),
                    nature: main.nature.unwrap_or(Nature::Projected),
                },
            )),
            None => debug!(panel = %main.id, "main panel has no usable incoming line; skipping feeder layer"),
        }
    }

    for panel in inventory.panels.iter().filter(|p| p.parent_id.is_some()) {
        let Some(feeder) = panel.feeder.as_ref().filter(|l| l.is_complete()) else {
            debug!(panel = %panel.id, "sub-panel feeder incomplete; skipping sectional layer");
            continue;
        };
        let id = format!("feeder-{}", panel.id);
        let name = if panel.name.is_empty() {
            format!("Feeder {}", panel.id)
        } else {
            format!("Feeder {}", panel.name)
        };
        layers.push(Layer::circuit_bound(
            id.clone(),
            name,
            SECTIONAL_FEEDER_COLOR,
            id,
            CircuitMeta {
                cable: feeder.cable.clone(),
                conduit: feeder.conduit.clone(),
                nature: panel.nature.unwrap_or(Nature::Projected),
            },
        ));
    }

    let grounding = inventory
        .panels
        .iter()
        .find_map(|p| p.grounding_system.as_deref().filter(|g| !g.trim().is_empty()).map(|g| (p, g)));
    if let Some((panel, system)) = grounding {
        layers.push(Layer::circuit_bound(
            GROUNDING_LAYER_ID.to_owned(),
            format!("Grounding ({system})"),
            GROUNDING_COLOR,
            GROUNDING_LAYER_ID.to_owned(),
            CircuitMeta { cable: None, conduit: None, nature: panel.nature.unwrap_or(Nature::Projected) },
        ));
    }

    for circuit in &inventory.circuits {
        let name = if circuit.description.is_empty() {
            circuit.id.clone()
        } else {
            format!("{} - {}", circuit.id, circuit.description)
        };
        layers.push(Layer::circuit_bound(
            format!("circuit-{}", circuit.id),
            name,
            circuit.kind.color(),
            circuit.id.clone(),
            CircuitMeta { cable: circuit.cable.clone(), conduit: circuit.conduit.clone(), nature: circuit.nature },
        ));
    }

    layers
}

/// Replace `current` with `derived` when their length or id sequence differ.
///
/// Returns true if the list was replaced. An unchanged id sequence keeps the
/// floor's own visibility and lock flags.
pub fn sync_floor_layers(current: &mut Vec<Layer>, derived: &[Layer]) -> bool {
    let same = current.len() == derived.len() && current.iter().zip(derived).all(|(a, b)| a.id == b.id);
    if same {
        return false;
    }
    *current = derived.to_vec();
    true
}

/// Active layer id after a rebuild: unchanged if still present, otherwise architecture.
#[must_use]
pub fn resolve_active_layer(layers: &[Layer], active: &str) -> LayerId {
    if layers.iter().any(|l| l.id == active) {
        active.to_owned()
    } else {
        ARCHITECTURE_LAYER_ID.to_owned()
    }
}
