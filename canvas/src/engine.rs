//! Drawing-tool state machine.
//!
//! DESIGN
//! ======
//! `EngineCore` turns raw pointer and keyboard events into committed plan
//! elements. The host converts nothing itself: it forwards screen positions,
//! the engine maps them through the camera, advances `InputState`, and
//! returns `Action`s describing what changed. Commits go through `PlanStore`,
//! which runs the layer-lock and nature gates.
//!
//! Tool families:
//! - single-click (symbol, text, table) commit on pointer-down
//! - drag (wall, aux line, calibration) anchor on down, commit on up when
//!   longer than the minimum drag
//! - two-click (pipe, dimension) anchor on the first down, commit on the second
//! - placement (room) and opening tools consume a staged payload
//!
//! Pending state is taken out of `input` before the committed entity is
//! built, so a rapid repeat event can never commit twice.
//!
//! ERROR HANDLING
//! ==============
//! Rejected commits never reach the store. Nature conflicts and other policy
//! errors come back as `Action::Notice`; locked-layer writes are logged by the
//! store and produce no action.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::catalog::SymbolRegistry;
use crate::config::EngineConfig;
use crate::consts::{DEFAULT_TABLE_COLS, DEFAULT_TABLE_ROWS, DEFAULT_TEXT_SIZE, HANDLE_RADIUS_PX, WHEEL_ZOOM_STEP};
use crate::dimension::{DimensionGeometry, measure};
use crate::doc::{
    AuxLine, Dimension, ElementId, ElementKind, OpeningKind, OpeningSpec, Pipe, ProjectSettings, RoomSpec, Symbol,
    SymbolKind, Wall,
};
use crate::error::{EditError, ErrorCode};
use crate::hit::{Hit, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, Placement, Tool, ToolFamily, UiState, WheelDelta};
use crate::room::create_room_group;
use crate::store::PlanStore;
use crate::wall::{constrain_orthogonal, find_nearest_room_wall, project_point_on_segment, snap_to_endpoint};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated { id: ElementId, kind: ElementKind },
    ElementUpdated { id: ElementId },
    ElementDeleted { id: ElementId },
    SelectionChanged(Option<ElementId>),
    /// A blocking message for the user, e.g. a rejected commit.
    Notice { code: &'static str, message: String },
    /// A calibration line was drawn; ask the user for its real length.
    CalibrationRequested { pixel_length: f64 },
    /// A text symbol was placed; open the host text editor.
    EditTextRequested { id: ElementId },
    ToolChanged(Tool),
    RenderNeeded,
}

impl Action {
    fn from_error(err: &EditError) -> Vec<Action> {
        match err {
            EditError::LayerLocked(_) => Vec::new(),
            other => vec![Action::Notice { code: other.error_code(), message: other.to_string() }],
        }
    }
}

/// Core engine state: store, camera, tool options and the gesture in progress.
pub struct EngineCore {
    pub store: PlanStore,
    pub camera: Camera,
    ui: UiState,
    input: InputState,
    pub config: EngineConfig,
    pub symbols: SymbolRegistry,
    /// Pixel length of the last calibration line awaiting its real length.
    pending_calibration: Option<f64>,
    /// Last screen point of a middle-button pan. Kept beside `input` so a
    /// pan never disturbs an open gesture.
    middle_pan: Option<Point>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    /// Engine over a fresh untitled project.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let store = PlanStore::new("Untitled", ProjectSettings::new(config.pixels_per_unit));
        Self::with_store(store, config)
    }

    /// Engine over an existing store.
    #[must_use]
    pub fn with_store(store: PlanStore, config: EngineConfig) -> Self {
        Self {
            store,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::Idle,
            config,
            symbols: SymbolRegistry::new(),
            pending_calibration: None,
            middle_pan: None,
        }
    }

    // --- Tool / payloads ---

    /// Switch tools. Any pending gesture is dropped without committing.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.cancel();
        self.ui.tool = tool;
        debug!(?tool, "tool changed");
        vec![Action::ToolChanged(tool), Action::RenderNeeded]
    }

    /// Clear all pending and preview state. Committed elements are untouched.
    pub fn cancel(&mut self) -> Vec<Action> {
        let was_idle = self.input.is_idle();
        self.input = InputState::Idle;
        self.pending_calibration = None;
        self.middle_pan = None;
        if was_idle { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    /// Pipe tool options for the next pipe drawn.
    pub fn set_pipe_style(&mut self, curved: bool, dashed: bool) {
        self.ui.pipe_curved = curved;
        self.ui.pipe_dashed = dashed;
    }

    /// Symbol type placed by the symbol tool.
    pub fn set_symbol_type(&mut self, type_id: &str) {
        type_id.clone_into(&mut self.ui.symbol_type);
    }

    /// Stage a room rectangle; the next primary click places it.
    pub fn stage_room(&mut self, spec: RoomSpec) -> Vec<Action> {
        let actions = self.set_tool(Tool::Room);
        self.input = InputState::PendingPlacement(Placement::Room(spec));
        actions
    }

    /// Stage an opening; the next primary click near a room wall inserts it.
    pub fn stage_opening(&mut self, spec: OpeningSpec) -> Vec<Action> {
        let tool = match spec.kind {
            OpeningKind::Door { .. } => Tool::Door,
            OpeningKind::Window { .. } => Tool::Window,
            OpeningKind::Passage => Tool::Passage,
        };
        let actions = self.set_tool(tool);
        self.input = InputState::PendingPlacement(Placement::Opening(spec));
        actions
    }

    /// Finish a calibration with the real length of the drawn line.
    pub fn confirm_calibration(&mut self, real_length: f64) -> Vec<Action> {
        let Some(pixel_length) = self.pending_calibration else {
            return Vec::new();
        };
        if !real_length.is_finite() || real_length <= 0.0 {
            return Action::from_error(&EditError::InvalidCalibration(real_length));
        }
        match self.store.set_pixels_per_unit(pixel_length / real_length) {
            Ok(()) => {
                self.pending_calibration = None;
                info!(pixel_length, real_length, "calibration confirmed");
                vec![Action::RenderNeeded]
            }
            Err(err) => Action::from_error(&err),
        }
    }

    /// Store text entered by the host editor.
    pub fn set_text(&mut self, id: ElementId, content: &str) -> Vec<Action> {
        match self.store.set_text(id, content) {
            Ok(()) => vec![Action::ElementUpdated { id }, Action::RenderNeeded],
            Err(err) => Action::from_error(&err),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Gesture in progress.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.store.selected()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Live preview segment of an open drag or two-click sequence.
    #[must_use]
    pub fn preview(&self) -> Option<(Point, Point)> {
        self.input.preview()
    }

    /// Live measurement while a dimension's second point is pending.
    #[must_use]
    pub fn preview_dimension(&self) -> Option<DimensionGeometry> {
        match self.input {
            InputState::AwaitingSecondPoint { tool: Tool::Dimension, first, current } => Some(measure(
                first,
                current,
                self.store.pixels_per_unit(),
                self.config.dimension_offset_px,
                self.config.arrow_size_px,
            )),
            _ => None,
        }
    }

    #[must_use]
    pub fn pending_calibration(&self) -> Option<f64> {
        self.pending_calibration
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Middle {
            self.middle_pan = Some(screen_pt);
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match self.ui.tool.family() {
            ToolFamily::Select => self.select_down(screen_pt, world),
            ToolFamily::SingleClick => self.place_symbol(world),
            ToolFamily::Drag => {
                let anchor = self.drawing_point(self.ui.tool, None, world, modifiers);
                self.input = InputState::Drawing { tool: self.ui.tool, anchor, current: anchor };
                debug!(tool = ?self.ui.tool, x = anchor.x, y = anchor.y, "drag started");
                vec![Action::RenderNeeded]
            }
            ToolFamily::TwoClick => self.two_click_down(world, modifiers),
            ToolFamily::Placement => self.place_room(world),
            ToolFamily::Opening => self.place_opening(world),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        if let Some(last) = self.middle_pan {
            self.camera.pan_by(screen_pt.x - last.x, screen_pt.y - last.y);
            self.middle_pan = Some(screen_pt);
            return vec![Action::RenderNeeded];
        }
        let world = self.camera.screen_to_world(screen_pt);
        match self.input.clone() {
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::Drawing { tool, anchor, .. } => {
                let current = self.drawing_point(tool, Some(anchor), world, modifiers);
                self.input = InputState::Drawing { tool, anchor, current };
                vec![Action::RenderNeeded]
            }
            InputState::AwaitingSecondPoint { tool, first, .. } => {
                let current = self.drawing_point(tool, Some(first), world, modifiers);
                self.input = InputState::AwaitingSecondPoint { tool, first, current };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingElement { id, last_world } => match self.store.move_element(id, world - last_world) {
                Ok(()) => {
                    self.input = InputState::DraggingElement { id, last_world: world };
                    vec![Action::ElementUpdated { id }, Action::RenderNeeded]
                }
                Err(err) => {
                    self.input = InputState::Idle;
                    Action::from_error(&err)
                }
            },
            InputState::DraggingOpening { room_id, opening_id } => self.slide_opening(room_id, opening_id, world),
            InputState::Idle | InputState::PendingPlacement(_) => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Middle {
            self.middle_pan = None;
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Drawing { tool, anchor, .. } => {
                let end = self.drawing_point(tool, Some(anchor), world, modifiers);
                self.finish_drag(tool, anchor, end)
            }
            InputState::Panning { .. } | InputState::DraggingElement { .. } | InputState::DraggingOpening { .. } => {
                Vec::new()
            }
            // Two-click and placement states survive pointer-up.
            other => {
                self.input = other;
                Vec::new()
            }
        }
    }

    /// Zoom around the cursor.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
        self.camera.zoom_at(screen_pt, factor);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_cancel() {
            return self.cancel();
        }
        if key.is_delete() {
            return self.delete_selection();
        }
        Vec::new()
    }

    // --- Select tool ---

    fn select_down(&mut self, screen_pt: Point, world: Point) -> Vec<Action> {
        let tolerance = self.camera.screen_dist_to_world(HANDLE_RADIUS_PX);
        let hit = hit_test(
            self.store.elements(),
            self.store.layers(),
            world,
            tolerance,
            self.store.pixels_per_unit(),
        );
        let previous = self.store.selected();
        let Some(hit) = hit else {
            self.store.select_shape(None);
            self.input = InputState::Panning { last_screen: screen_pt };
            return if previous.is_some() {
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            } else {
                Vec::new()
            };
        };

        let id = hit.id();
        self.store.select_shape(Some(id));
        if !self.store.is_element_locked(&id) {
            self.input = match hit {
                Hit::Opening { room_id, opening_id } => InputState::DraggingOpening { room_id, opening_id },
                Hit::Element { id, .. } => InputState::DraggingElement { id, last_world: world },
            };
        }
        vec![Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    fn slide_opening(&mut self, room_id: ElementId, opening_id: ElementId, world: Point) -> Vec<Action> {
        let Some(room) = self.store.elements().room(&room_id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        let Some(wall) = room.opening(&opening_id).and_then(|o| room.walls.get(o.wall_index)) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        // Project in local space so rotation and scale do not distort the position.
        let local = room.transform.absolute_to_local(world);
        let t = project_point_on_segment(local, wall.start, wall.end).t;
        match self.store.update_opening_position(room_id, opening_id, t) {
            Ok(_) => vec![Action::ElementUpdated { id: opening_id }, Action::RenderNeeded],
            Err(EditError::OpeningOverlap(_)) => Vec::new(),
            Err(err) => {
                self.input = InputState::Idle;
                Action::from_error(&err)
            }
        }
    }

    fn delete_selection(&mut self) -> Vec<Action> {
        let Some(id) = self.store.selected() else {
            return Vec::new();
        };
        match self.store.remove_element(id) {
            Ok(_) => vec![Action::ElementDeleted { id }, Action::SelectionChanged(None), Action::RenderNeeded],
            Err(err) => Action::from_error(&err),
        }
    }

    // --- Drawing tools ---

    /// Pointer position adjusted by endpoint snapping (walls) and the Shift constraint.
    fn drawing_point(&self, tool: Tool, anchor: Option<Point>, world: Point, modifiers: Modifiers) -> Point {
        let snapped = if tool == Tool::Wall {
            snap_to_endpoint(&self.store.elements().walls, world, self.config.endpoint_snap_px).unwrap_or(world)
        } else {
            world
        };
        match anchor {
            Some(anchor) if modifiers.shift => constrain_orthogonal(anchor, snapped),
            _ => snapped,
        }
    }

    fn finish_drag(&mut self, tool: Tool, anchor: Point, end: Point) -> Vec<Action> {
        let length = anchor.distance(end);
        if length <= self.config.min_drag_px {
            debug!(?tool, length, "drag below minimum length; discarded");
            return vec![Action::RenderNeeded];
        }
        match tool {
            Tool::Wall => Self::created(self.store.add_wall(Wall::new(anchor, end)), ElementKind::Wall),
            Tool::AuxLine => Self::created(self.store.add_aux_line(AuxLine::new(anchor, end)), ElementKind::AuxLine),
            Tool::Calibrate => {
                self.pending_calibration = Some(length);
                info!(pixel_length = length, "calibration line drawn");
                vec![Action::CalibrationRequested { pixel_length: length }, Action::RenderNeeded]
            }
            other => {
                warn!(tool = ?other, "drag finished for a non-drag tool");
                Vec::new()
            }
        }
    }

    fn two_click_down(&mut self, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let tool = self.ui.tool;
        let InputState::AwaitingSecondPoint { tool: pending, first, .. } = self.input else {
            let first = self.drawing_point(tool, None, world, modifiers);
            self.input = InputState::AwaitingSecondPoint { tool, first, current: first };
            debug!(?tool, x = first.x, y = first.y, "first point recorded");
            return vec![Action::RenderNeeded];
        };
        let end = self.drawing_point(pending, Some(first), world, modifiers);
        self.input = InputState::Idle;
        match pending {
            Tool::Pipe => {
                let pipe = if self.ui.pipe_curved {
                    Pipe::curved(first, end, &self.config.pipe_color)
                } else {
                    Pipe::straight(first, end, &self.config.pipe_color)
                };
                Self::created(self.store.add_pipe(pipe, self.ui.pipe_dashed), ElementKind::Pipe)
            }
            Tool::Dimension => {
                let dim = Dimension::from_points(
                    first,
                    end,
                    self.store.pixels_per_unit(),
                    self.config.dimension_offset_px,
                );
                Self::created(self.store.add_dimension(dim), ElementKind::Dimension)
            }
            other => {
                warn!(tool = ?other, "second point for a non two-click tool");
                Vec::new()
            }
        }
    }

    fn place_symbol(&mut self, world: Point) -> Vec<Action> {
        let kind = match self.ui.tool {
            Tool::Text => SymbolKind::Text { content: String::new(), font_size: DEFAULT_TEXT_SIZE },
            Tool::Table => SymbolKind::Table { rows: DEFAULT_TABLE_ROWS, cols: DEFAULT_TABLE_COLS },
            _ => {
                let type_id = self.ui.symbol_type.clone();
                if !self.symbols.is_renderable(&type_id) {
                    warn!(type_id, "symbol type not in catalog; placing anyway");
                }
                SymbolKind::Catalog { type_id }
            }
        };
        let is_text = matches!(kind, SymbolKind::Text { .. });
        let mut actions = Self::created(self.store.add_symbol(Symbol::new(kind, world)), ElementKind::Symbol);
        if is_text && let Some(Action::ElementCreated { id, .. }) = actions.first() {
            let id = *id;
            actions.push(Action::EditTextRequested { id });
        }
        actions
    }

    fn place_room(&mut self, world: Point) -> Vec<Action> {
        let InputState::PendingPlacement(Placement::Room(spec)) = std::mem::take(&mut self.input) else {
            debug!("room tool clicked with nothing staged");
            return Vec::new();
        };
        let room = create_room_group(spec.width, spec.length, world, self.store.pixels_per_unit(), None);
        let mut actions = Self::created(self.store.add_room_group(room), ElementKind::RoomGroup);
        self.ui.tool = Tool::Select;
        actions.push(Action::ToolChanged(Tool::Select));
        actions
    }

    fn place_opening(&mut self, world: Point) -> Vec<Action> {
        let InputState::PendingPlacement(Placement::Opening(spec)) = &self.input else {
            debug!("opening tool clicked with nothing staged");
            return Vec::new();
        };
        let spec = spec.clone();
        let Some(found) = find_nearest_room_wall(&self.store.elements().room_groups, world, self.config.wall_snap_px)
        else {
            debug!(x = world.x, y = world.y, "no room wall near click; opening tool stays active");
            return Vec::new();
        };
        let result = self.store.insert_opening(
            found.room_id,
            found.hit.index,
            found.hit.projection.t,
            &spec,
            self.config.opening_margin,
        );
        match result {
            Ok(id) => {
                self.input = InputState::Idle;
                self.ui.tool = Tool::Select;
                vec![
                    Action::ElementCreated { id, kind: ElementKind::Opening },
                    Action::ToolChanged(Tool::Select),
                    Action::RenderNeeded,
                ]
            }
            Err(err) => Action::from_error(&err),
        }
    }

    fn created(result: Result<ElementId, EditError>, kind: ElementKind) -> Vec<Action> {
        match result {
            Ok(id) => vec![Action::ElementCreated { id, kind }, Action::RenderNeeded],
            Err(err) => Action::from_error(&err),
        }
    }
}
