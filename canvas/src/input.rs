//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture in progress between events: a drag
//! being defined, a two-click sequence waiting for its second point, or a
//! staged payload waiting for the click that places it. Every transition is a
//! plain value change, so the state machine is testable without a UI.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{ElementId, OpeningSpec, RoomSpec};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    Wall,
    AuxLine,
    /// Draw a reference line of known real length.
    Calibrate,
    Pipe,
    Dimension,
    /// Place a catalog symbol.
    Symbol,
    Text,
    Table,
    /// Place a staged room rectangle.
    Room,
    Door,
    Window,
    Passage,
}

/// Interaction protocol a tool follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFamily {
    /// Hit-test, move and pan.
    Select,
    /// Pointer-down commits immediately.
    SingleClick,
    /// Pointer-down anchors, pointer-up commits.
    Drag,
    /// First pointer-down anchors, second pointer-down commits.
    TwoClick,
    /// Pointer-down consumes a staged room payload.
    Placement,
    /// Pointer-down inserts a staged opening on the nearest room wall.
    Opening,
}

impl Tool {
    #[must_use]
    pub fn family(self) -> ToolFamily {
        match self {
            Self::Select => ToolFamily::Select,
            Self::Symbol | Self::Text | Self::Table => ToolFamily::SingleClick,
            Self::Wall | Self::AuxLine | Self::Calibrate => ToolFamily::Drag,
            Self::Pipe | Self::Dimension => ToolFamily::TwoClick,
            Self::Room => ToolFamily::Placement,
            Self::Door | Self::Window | Self::Passage => ToolFamily::Opening,
        }
    }

    #[must_use]
    pub fn is_opening(self) -> bool {
        self.family() == ToolFamily::Opening
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift constrains drawing to horizontal/vertical.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    Secondary,
}

/// A keyboard key name as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down, which zooms out.
    pub dy: f64,
}

/// Tool options set by toolbars and palettes.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    /// Catalog type placed by the symbol tool.
    pub symbol_type: String,
    /// Draw pipes as quadratic curves.
    pub pipe_curved: bool,
    /// Register new pipes in the dashed-pipe set.
    pub pipe_dashed: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::Select, symbol_type: "outlet".to_owned(), pipe_curved: false, pipe_dashed: false }
    }
}

/// Payload staged by a palette and consumed by the next placement click.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Room(RoomSpec),
    Opening(OpeningSpec),
}

/// Gesture state between pointer events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the camera.
    Panning {
        /// Screen position of the previous sample.
        last_screen: Point,
    },
    /// Drag-to-define in progress (wall, aux line, calibration).
    Drawing { tool: Tool, anchor: Point, current: Point },
    /// Two-click sequence waiting for its second click (pipe, dimension).
    AwaitingSecondPoint { tool: Tool, first: Point, current: Point },
    /// Staged payload waiting for a click.
    PendingPlacement(Placement),
    /// Moving a selected element.
    DraggingElement {
        id: ElementId,
        /// Canvas position of the previous sample.
        last_world: Point,
    },
    /// Sliding an opening along its wall.
    DraggingOpening { room_id: ElementId, opening_id: ElementId },
}

impl InputState {
    /// Live segment shown while a drag or two-click sequence is open.
    #[must_use]
    pub fn preview(&self) -> Option<(Point, Point)> {
        match *self {
            Self::Drawing { anchor, current, .. } => Some((anchor, current)),
            Self::AwaitingSecondPoint { first, current, .. } => Some((first, current)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::Idle
    }
}
