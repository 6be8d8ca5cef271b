//! Floor-scoped element store with layer-aware mutations.
//!
//! DESIGN
//! ======
//! `PlanStore` owns every floor of a project plus the selectors the tools
//! read (active floor, active layer, selection). Each mutation validates
//! first (layer lock, nature coherence, geometry) and only then writes, so a
//! rejected edit leaves the collections exactly as they were. A commit that
//! touches several fields, like a dashed pipe, lands in one call.
//!
//! ERROR HANDLING
//! ==============
//! Locked-layer writes are logged at `warn` and returned as
//! `EditError::LayerLocked`; callers treat them as silent no-ops. Nature
//! conflicts are returned as `EditError::NatureConflict` for the caller to
//! surface to the user.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::ARCHITECTURE_LAYER_ID;
use crate::doc::{
    AuxLine, ConstructionState, Dimension, ElementCollection, ElementId, ElementKind, Floor, LayerId, Nature,
    OpeningSpec, PaperFormat, Pipe, ProjectDocument, ProjectSettings, RoomGroup, Symbol, SymbolKind, Wall,
};
use crate::error::EditError;
use crate::layer::{CircuitInventory, Layer, derive_layers, resolve_active_layer, sync_floor_layers};
use crate::opening::{create_opening, find_overlap, opening_proportion, validate_position};
use crate::room::normalize_room_scale;

const DEFAULT_FLOOR_NAME: &str = "Ground floor";

/// Layer, nature and circuit binding resolved for an insert into the active layer.
struct InsertTarget {
    layer_id: LayerId,
    nature: Option<Nature>,
    circuit_id: Option<String>,
    color: Option<String>,
}

/// The project's floors, their elements and layers, and the editing selectors.
#[derive(Debug, Clone)]
pub struct PlanStore {
    project_id: ElementId,
    name: String,
    settings: ProjectSettings,
    /// Never empty.
    floors: Vec<Floor>,
    active_floor: usize,
    active_layer: LayerId,
    selected: Option<ElementId>,
    /// Last derived layer list; seeds floors added later.
    derived_layers: Vec<Layer>,
}

impl PlanStore {
    /// A new project with one empty floor.
    #[must_use]
    pub fn new(name: &str, settings: ProjectSettings) -> Self {
        Self {
            project_id: Uuid::new_v4(),
            name: name.to_owned(),
            settings,
            floors: vec![Floor::new(DEFAULT_FLOOR_NAME)],
            active_floor: 0,
            active_layer: ARCHITECTURE_LAYER_ID.to_owned(),
            selected: None,
            derived_layers: vec![Layer::architecture()],
        }
    }

    /// Rebuild a store from its persisted shape. A document without floors
    /// gets one, and a floor missing the architecture layer gets it back.
    #[must_use]
    pub fn from_document(doc: ProjectDocument) -> Self {
        let mut floors = doc.floors;
        if floors.is_empty() {
            floors.push(Floor::new(DEFAULT_FLOOR_NAME));
        }
        for floor in &mut floors {
            if floor.layer(ARCHITECTURE_LAYER_ID).is_none() {
                warn!(floor = %floor.name, "architecture layer missing; restored");
                floor.layers.insert(0, Layer::architecture());
            }
        }
        let derived_layers = floors[0].layers.clone();
        let active_layer = resolve_active_layer(&floors[0].layers, ARCHITECTURE_LAYER_ID);
        Self {
            project_id: doc.id,
            name: doc.name,
            settings: doc.settings,
            floors,
            active_floor: 0,
            active_layer,
            selected: None,
            derived_layers,
        }
    }

    #[must_use]
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            id: self.project_id,
            name: self.name.clone(),
            settings: self.settings.clone(),
            floors: self.floors.clone(),
        }
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn project_id(&self) -> ElementId {
        self.project_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    #[must_use]
    pub fn pixels_per_unit(&self) -> f64 {
        self.settings.pixels_per_unit
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    #[must_use]
    pub fn active_floor(&self) -> &Floor {
        &self.floors[self.active_floor]
    }

    /// Elements of the active floor.
    #[must_use]
    pub fn elements(&self) -> &ElementCollection {
        &self.active_floor().elements
    }

    /// Layers of the active floor.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.active_floor().layers
    }

    #[must_use]
    pub fn active_layer_id(&self) -> &str {
        &self.active_layer
    }

    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_floor().layer(&self.active_layer)
    }

    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Whether the layer holding `id` on the active floor is locked.
    #[must_use]
    pub fn is_element_locked(&self, id: &ElementId) -> bool {
        self.elements()
            .locate(id)
            .is_some_and(|(_, layer)| self.layer_locked(layer))
    }

    fn floor_mut(&mut self) -> &mut Floor {
        &mut self.floors[self.active_floor]
    }

    fn layer_locked(&self, layer_id: Option<&str>) -> bool {
        let id = layer_id.unwrap_or(ARCHITECTURE_LAYER_ID);
        self.active_floor().layer(id).is_some_and(|l| l.locked)
    }

    // =========================================================================
    // GATES
    // =========================================================================

    fn guard_layer(&self, layer_id: Option<&str>, op: &'static str) -> Result<(), EditError> {
        if self.layer_locked(layer_id) {
            let layer = layer_id.unwrap_or(ARCHITECTURE_LAYER_ID);
            warn!(layer, op, "layer is locked; edit ignored");
            return Err(EditError::LayerLocked(layer.to_owned()));
        }
        Ok(())
    }

    fn guard_nature(&self, nature: Option<Nature>, op: &'static str) -> Result<(), EditError> {
        match nature {
            Some(n) if !self.settings.construction.admits(n) => {
                info!(op, nature = ?n, "surveyed element rejected in new-build project");
                Err(EditError::NatureConflict)
            }
            _ => Ok(()),
        }
    }

    /// Resolve the active layer for an insert, running both gates.
    fn insert_target(&self, nature: Option<Nature>, op: &'static str) -> Result<InsertTarget, EditError> {
        let layer = self
            .active_layer()
            .ok_or_else(|| EditError::LayerNotFound(self.active_layer.clone()))?;
        self.guard_layer(Some(&layer.id), op)?;
        let nature = nature.or_else(|| layer.nature());
        self.guard_nature(nature, op)?;
        Ok(InsertTarget {
            layer_id: layer.id.clone(),
            nature,
            circuit_id: layer.circuit_id.clone(),
            color: (!layer.is_architecture()).then(|| layer.color.clone()),
        })
    }

    /// Nature an insert into the active layer would carry.
    #[must_use]
    pub fn effective_nature(&self, nature: Option<Nature>) -> Option<Nature> {
        nature.or_else(|| self.active_layer().and_then(Layer::nature))
    }

    // =========================================================================
    // INSERTS
    // =========================================================================

    /// Insert a free-standing wall into the active layer.
    ///
    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_wall(&mut self, mut wall: Wall) -> Result<ElementId, EditError> {
        let target = self.insert_target(wall.nature, "add_wall")?;
        wall.layer_id = Some(target.layer_id);
        wall.nature = target.nature;
        let id = wall.id;
        self.floor_mut().elements.walls.push(wall);
        debug!(%id, "wall added");
        Ok(id)
    }

    /// Insert a pipe, binding it to the active circuit layer.
    ///
    /// Dashed and surveyed pipes are registered in the dashed-pipe set in the
    /// same write.
    ///
    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_pipe(&mut self, mut pipe: Pipe, dashed: bool) -> Result<ElementId, EditError> {
        let target = self.insert_target(pipe.nature, "add_pipe")?;
        pipe.layer_id = Some(target.layer_id);
        pipe.nature = target.nature;
        if pipe.circuit_id.is_none() {
            pipe.circuit_id = target.circuit_id;
        }
        if let Some(color) = target.color {
            pipe.color = color;
        }
        let id = pipe.id;
        let dashed = dashed || pipe.nature == Some(Nature::Surveyed);
        let elements = &mut self.floor_mut().elements;
        elements.pipes.push(pipe);
        if dashed {
            elements.dashed_pipes.insert(id);
        }
        debug!(%id, dashed, "pipe added");
        Ok(id)
    }

    /// Insert a symbol, binding it to the active circuit layer.
    ///
    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_symbol(&mut self, mut symbol: Symbol) -> Result<ElementId, EditError> {
        let target = self.insert_target(symbol.nature, "add_symbol")?;
        symbol.layer_id = Some(target.layer_id);
        symbol.nature = target.nature;
        if symbol.circuit_id.is_none() {
            symbol.circuit_id = target.circuit_id;
        }
        let id = symbol.id;
        self.floor_mut().elements.symbols.push(symbol);
        debug!(%id, "symbol added");
        Ok(id)
    }

    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_aux_line(&mut self, mut line: AuxLine) -> Result<ElementId, EditError> {
        let target = self.insert_target(None, "add_aux_line")?;
        line.layer_id = Some(target.layer_id);
        let id = line.id;
        self.floor_mut().elements.aux_lines.push(line);
        debug!(%id, "aux line added");
        Ok(id)
    }

    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_dimension(&mut self, mut dimension: Dimension) -> Result<ElementId, EditError> {
        let target = self.insert_target(None, "add_dimension")?;
        dimension.layer_id = Some(target.layer_id);
        let id = dimension.id;
        self.floor_mut().elements.dimensions.push(dimension);
        debug!(%id, "dimension added");
        Ok(id)
    }

    /// Insert a room group; its walls move to the active layer with it.
    ///
    /// # Errors
    ///
    /// `LayerLocked`, `LayerNotFound` or `NatureConflict`; nothing is written.
    pub fn add_room_group(&mut self, mut room: RoomGroup) -> Result<ElementId, EditError> {
        let target = self.insert_target(None, "add_room_group")?;
        for wall in &mut room.walls {
            wall.layer_id = Some(target.layer_id.clone());
        }
        room.layer_id = Some(target.layer_id);
        let id = room.id;
        self.floor_mut().elements.room_groups.push(room);
        debug!(%id, "room group added");
        Ok(id)
    }

    /// Create an opening on a room wall at a clamped position.
    ///
    /// # Errors
    ///
    /// `RoomNotFound`, `LayerLocked`, `NatureConflict`, `WallIndexOutOfRange`
    /// or `OpeningOverlap`; nothing is written.
    pub fn insert_opening(
        &mut self,
        room_id: ElementId,
        wall_index: usize,
        position: f64,
        spec: &OpeningSpec,
        margin: f64,
    ) -> Result<ElementId, EditError> {
        let room = self.elements().room(&room_id).ok_or(EditError::RoomNotFound(room_id))?;
        self.guard_layer(room.layer_id.as_deref(), "insert_opening")?;
        let layer_nature = room.layer_id.as_deref().and_then(|l| self.active_floor().layer(l)).and_then(Layer::nature);
        self.guard_nature(layer_nature, "insert_opening")?;
        let opening = create_opening(room, wall_index, position, spec, self.settings.pixels_per_unit, margin)?;
        let id = opening.id;
        let kind = opening.kind.label();
        if let Some(room) = self.floor_mut().elements.room_mut(&room_id) {
            room.openings.push(opening);
        }
        debug!(%id, %room_id, wall_index, kind, "opening inserted");
        Ok(id)
    }

    // =========================================================================
    // UPDATES
    // =========================================================================

    /// Slide an opening along its wall. Returns the clamped position stored.
    ///
    /// # Errors
    ///
    /// `RoomNotFound`, `OpeningNotFound`, `LayerLocked`, or `OpeningOverlap`
    /// when the clamped position collides with a sibling (the old position
    /// is kept).
    pub fn update_opening_position(
        &mut self,
        room_id: ElementId,
        opening_id: ElementId,
        position: f64,
    ) -> Result<f64, EditError> {
        let ppu = self.settings.pixels_per_unit;
        let room = self.elements().room(&room_id).ok_or(EditError::RoomNotFound(room_id))?;
        self.guard_layer(room.layer_id.as_deref(), "update_opening_position")?;
        let opening = room.opening(&opening_id).ok_or(EditError::OpeningNotFound(opening_id))?;
        let wall = room
            .walls
            .get(opening.wall_index)
            .ok_or(EditError::WallIndexOutOfRange(opening.wall_index))?;
        let proportion = opening_proportion(opening.width, ppu, wall.length());
        let mut moved = opening.clone();
        moved.position = validate_position(position, proportion, 0.0);
        if let Some(other) = find_overlap(room, &moved, ppu) {
            return Err(EditError::OpeningOverlap(other.id));
        }
        let clamped = moved.position;
        if let Some(slot) = self
            .floor_mut()
            .elements
            .room_mut(&room_id)
            .and_then(|r| r.openings.iter_mut().find(|o| o.id == opening_id))
        {
            *slot = moved;
        }
        Ok(clamped)
    }

    /// Translate an element by a canvas-space delta.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` (openings are not translated, see
    /// [`update_opening_position`](Self::update_opening_position)) or `LayerLocked`.
    pub fn move_element(&mut self, id: ElementId, delta: Point) -> Result<(), EditError> {
        let (kind, layer) = self.elements().locate(&id).ok_or(EditError::ElementNotFound(id))?;
        if kind == ElementKind::Opening {
            return Err(EditError::ElementNotFound(id));
        }
        self.guard_layer(layer, "move_element")?;
        self.floor_mut().elements.translate(&id, delta);
        Ok(())
    }

    /// Remove an element (or an opening) and drop it from the selection.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` or `LayerLocked`.
    pub fn remove_element(&mut self, id: ElementId) -> Result<ElementKind, EditError> {
        let (_, layer) = self.elements().locate(&id).ok_or(EditError::ElementNotFound(id))?;
        self.guard_layer(layer, "remove_element")?;
        let kind = self
            .floor_mut()
            .elements
            .remove(&id)
            .ok_or(EditError::ElementNotFound(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(%id, ?kind, "element removed");
        Ok(kind)
    }

    /// Scale a room group and immediately bake the scale into its size.
    ///
    /// # Errors
    ///
    /// `InvalidScale` for a zero or non-finite factor, `RoomNotFound` or
    /// `LayerLocked`. `OpeningOverlap` if the shorter walls would push two
    /// openings into each other; the room is then left as it was.
    pub fn resize_room(&mut self, room_id: ElementId, scale_x: f64, scale_y: f64) -> Result<(), EditError> {
        for factor in [scale_x, scale_y] {
            if !factor.is_finite() || factor == 0.0 {
                return Err(EditError::InvalidScale(factor));
            }
        }
        let room = self.elements().room(&room_id).ok_or(EditError::RoomNotFound(room_id))?;
        self.guard_layer(room.layer_id.as_deref(), "resize_room")?;
        let ppu = self.settings.pixels_per_unit;
        let mut resized = room.clone();
        resized.transform.scale_x *= scale_x;
        resized.transform.scale_y *= scale_y;
        normalize_room_scale(&mut resized, ppu);
        if let Some(clash) = resized.openings.iter().find_map(|o| find_overlap(&resized, o, ppu)) {
            warn!(%room_id, opening_id = %clash.id, "resize would overlap openings; rejected");
            return Err(EditError::OpeningOverlap(clash.id));
        }
        if let Some(room) = self.floor_mut().elements.room_mut(&room_id) {
            debug!(%room_id, width = resized.width, length = resized.length, "room resized");
            *room = resized;
        }
        Ok(())
    }

    /// Replace the content of a text symbol.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` if `id` is not a text symbol, or `LayerLocked`.
    pub fn set_text(&mut self, id: ElementId, content: &str) -> Result<(), EditError> {
        let symbol = self
            .elements()
            .symbols
            .iter()
            .find(|s| s.id == id && matches!(s.kind, SymbolKind::Text { .. }))
            .ok_or(EditError::ElementNotFound(id))?;
        self.guard_layer(symbol.layer_id.as_deref(), "set_text")?;
        if let Some(symbol) = self.floor_mut().elements.symbols.iter_mut().find(|s| s.id == id)
            && let SymbolKind::Text { content: current, .. } = &mut symbol.kind
        {
            content.clone_into(current);
        }
        Ok(())
    }

    // =========================================================================
    // SELECTION AND LAYERS
    // =========================================================================

    /// Select an element on the active floor, or clear the selection.
    /// Unknown ids clear it. Returns the resulting selection.
    pub fn select_shape(&mut self, id: Option<ElementId>) -> Option<ElementId> {
        self.selected = id.filter(|id| self.elements().locate(id).is_some());
        self.selected
    }

    /// Flip a layer's visibility. Returns the new flag.
    ///
    /// # Errors
    ///
    /// `LayerNotFound`.
    pub fn toggle_layer_visibility(&mut self, layer_id: &str) -> Result<bool, EditError> {
        let layer = self
            .floor_mut()
            .layer_mut(layer_id)
            .ok_or_else(|| EditError::LayerNotFound(layer_id.to_owned()))?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Flip a layer's lock. Returns the new flag.
    ///
    /// # Errors
    ///
    /// `LayerNotFound`.
    pub fn toggle_layer_lock(&mut self, layer_id: &str) -> Result<bool, EditError> {
        let layer = self
            .floor_mut()
            .layer_mut(layer_id)
            .ok_or_else(|| EditError::LayerNotFound(layer_id.to_owned()))?;
        layer.locked = !layer.locked;
        info!(layer = layer_id, locked = layer.locked, "layer lock toggled");
        Ok(layer.locked)
    }

    /// # Errors
    ///
    /// `LayerNotFound` if the active floor has no such layer.
    pub fn set_active_layer(&mut self, layer_id: &str) -> Result<(), EditError> {
        if self.active_floor().layer(layer_id).is_none() {
            return Err(EditError::LayerNotFound(layer_id.to_owned()));
        }
        layer_id.clone_into(&mut self.active_layer);
        Ok(())
    }

    /// Rebuild layers from a circuit inventory and sync every floor.
    ///
    /// Returns true if any floor's layer list was replaced.
    pub fn apply_circuit_inventory(&mut self, inventory: &CircuitInventory) -> bool {
        let derived = derive_layers(inventory);
        let mut changed = false;
        for floor in &mut self.floors {
            changed |= sync_floor_layers(&mut floor.layers, &derived);
        }
        self.active_layer = resolve_active_layer(self.layers(), &self.active_layer);
        info!(layers = derived.len(), changed, active = %self.active_layer, "layers rebuilt from circuit inventory");
        self.derived_layers = derived;
        changed
    }

    // =========================================================================
    // FLOORS AND SETTINGS
    // =========================================================================

    /// Append a floor seeded with the current derived layers and switch to it.
    pub fn add_floor(&mut self, name: &str) -> ElementId {
        let mut floor = Floor::new(name);
        floor.layers.clone_from(&self.derived_layers);
        let id = floor.id;
        self.floors.push(floor);
        self.switch_to(self.floors.len() - 1);
        info!(%id, name, floors = self.floors.len(), "floor added");
        id
    }

    /// Remove a floor. The first floor is permanent.
    ///
    /// # Errors
    ///
    /// `FloorNotFound` or `FirstFloor`.
    pub fn remove_floor(&mut self, floor_id: ElementId) -> Result<(), EditError> {
        let index = self.floor_index(floor_id)?;
        if index == 0 {
            return Err(EditError::FirstFloor);
        }
        self.floors.remove(index);
        if self.active_floor == index {
            self.switch_to(index - 1);
        } else if self.active_floor > index {
            self.active_floor -= 1;
        }
        info!(%floor_id, floors = self.floors.len(), "floor removed");
        Ok(())
    }

    /// # Errors
    ///
    /// `FloorNotFound`.
    pub fn set_active_floor(&mut self, floor_id: ElementId) -> Result<(), EditError> {
        let index = self.floor_index(floor_id)?;
        self.switch_to(index);
        Ok(())
    }

    /// Set the paper format of the active floor.
    pub fn set_paper(&mut self, paper: PaperFormat) {
        self.floor_mut().paper = paper;
    }

    pub fn set_construction(&mut self, construction: ConstructionState) {
        self.settings.construction = construction;
    }

    /// Set the calibrated scale and refresh every stored dimension's real-world distance.
    ///
    /// # Errors
    ///
    /// `InvalidCalibration` for a non-positive or non-finite scale.
    pub fn set_pixels_per_unit(&mut self, pixels_per_unit: f64) -> Result<(), EditError> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(EditError::InvalidCalibration(pixels_per_unit));
        }
        self.settings.pixels_per_unit = pixels_per_unit;
        for floor in &mut self.floors {
            for dim in &mut floor.elements.dimensions {
                dim.distance_units = dim.distance_px / pixels_per_unit;
            }
        }
        info!(pixels_per_unit, "scale calibrated");
        Ok(())
    }

    fn floor_index(&self, floor_id: ElementId) -> Result<usize, EditError> {
        self.floors
            .iter()
            .position(|f| f.id == floor_id)
            .ok_or(EditError::FloorNotFound(floor_id))
    }

    fn switch_to(&mut self, index: usize) {
        self.active_floor = index;
        self.selected = None;
        self.active_layer = resolve_active_layer(self.layers(), &self.active_layer);
    }
}
