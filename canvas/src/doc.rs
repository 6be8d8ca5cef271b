//! Document model: plan entities, floors, and the persisted project shape.
//!
//! Every entity subtype is a concrete struct or a tagged enum variant carrying
//! exactly its own fields, so consumers match exhaustively instead of probing
//! an open-ended property bag. The mutable store that owns these collections
//! lives in [`crate::store`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, angle_deg};
use crate::consts::PIPE_CURVE_BULGE;
use crate::layer::Layer;
use crate::transform::GroupTransform;

/// Unique identifier for a plan element or floor.
pub type ElementId = Uuid;

/// Identifier of a layer. Layer ids are derived from circuit ids, so they are strings.
pub type LayerId = String;

// =============================================================
// Project-wide enums
// =============================================================

/// Whether an element is newly projected work or a surveyed, pre-existing condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    Projected,
    Surveyed,
}

/// Project-wide construction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionState {
    /// Everything is new work; surveyed elements are incoherent.
    #[default]
    NewBuild,
    /// Existing installation being modified; both natures are allowed.
    Renovation,
}

impl ConstructionState {
    /// Whether an element of `nature` may be committed under this state.
    #[must_use]
    pub fn admits(self, nature: Nature) -> bool {
        !(self == Self::NewBuild && nature == Nature::Surveyed)
    }
}

/// Physical paper size of a floor sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    A4,
    A3,
    A2,
    A1,
    A0,
}

impl PaperFormat {
    /// Landscape size in millimetres as `(width, height)`.
    #[must_use]
    pub fn size_mm(self) -> (f64, f64) {
        match self {
            Self::A4 => (297.0, 210.0),
            Self::A3 => (420.0, 297.0),
            Self::A2 => (594.0, 420.0),
            Self::A1 => (841.0, 594.0),
            Self::A0 => (1189.0, 841.0),
        }
    }
}

// =============================================================
// Walls and room groups
// =============================================================

/// A straight wall segment.
///
/// Free-standing walls are in canvas space; walls owned by a [`RoomGroup`]
/// are relative to the group's local origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<Nature>,
}

impl Wall {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { id: Uuid::new_v4(), start, end, layer_id: None, nature: None }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Direction of the wall in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        angle_deg(self.start, self.end)
    }
}

/// Which end of the door break carries the hinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingSide {
    Left,
    Right,
}

/// Whether the door leaf opens into the room or away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingDirection {
    Inward,
    Outward,
}

/// Type-specific fields of a wall opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OpeningKind {
    Door { swing: SwingSide, direction: SwingDirection, height: f64 },
    Window { height: f64, sill_height: f64 },
    Passage,
}

impl OpeningKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Door { .. } => "door",
            Self::Window { .. } => "window",
            Self::Passage => "passage",
        }
    }
}

/// A door, window or passage anchored to one wall of a room group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: ElementId,
    pub room_id: ElementId,
    /// Index into the owning group's walls (0..4).
    pub wall_index: usize,
    /// Normalized position of the opening centre along the wall (0..1).
    pub position: f64,
    /// Opening width in real-world units.
    pub width: f64,
    pub kind: OpeningKind,
}

/// Configuration staged by a palette before an opening is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    /// Width in real-world units.
    pub width: f64,
    pub kind: OpeningKind,
}

/// Four connected walls sharing one transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGroup {
    pub id: ElementId,
    /// Top, right, bottom, left, in the group's local space.
    pub walls: Vec<Wall>,
    pub transform: GroupTransform,
    /// Width in real-world units at scale (1, 1).
    pub width: f64,
    /// Length in real-world units at scale (1, 1).
    pub length: f64,
    #[serde(default)]
    pub openings: Vec<Opening>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

impl RoomGroup {
    #[must_use]
    pub fn opening(&self, id: &ElementId) -> Option<&Opening> {
        self.openings.iter().find(|o| o.id == *id)
    }

    /// Wall endpoints in absolute canvas space.
    #[must_use]
    pub fn absolute_wall(&self, index: usize) -> Option<(Point, Point)> {
        let wall = self.walls.get(index)?;
        Some((
            self.transform.local_to_absolute(wall.start),
            self.transform.local_to_absolute(wall.end),
        ))
    }
}

/// Real-world room size staged by a palette before placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub width: f64,
    pub length: f64,
}

// =============================================================
// Runs, symbols, guides, dimensions
// =============================================================

/// A circuit run between two points, straight or curved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    /// Quadratic control point; present only on curved pipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Point>,
    pub color: String,
    pub curved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<Nature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

/// Drawable path of a pipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipePath {
    Line { start: Point, end: Point },
    Quadratic { start: Point, control: Point, end: Point },
}

impl PipePath {
    /// Point at parameter `t` (0..1) along the path.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        match *self {
            Self::Line { start, end } => start.lerp(end, t),
            Self::Quadratic { start, control, end } => {
                let u = 1.0 - t;
                start * (u * u) + control * (2.0 * u * t) + end * (t * t)
            }
        }
    }
}

impl Pipe {
    /// Straight pipe between two points.
    #[must_use]
    pub fn straight(start: Point, end: Point, color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            control: None,
            color: color.to_owned(),
            curved: false,
            circuit_id: None,
            nature: None,
            layer_id: None,
        }
    }

    /// Curved pipe whose control point bulges off the chord midpoint.
    #[must_use]
    pub fn curved(start: Point, end: Point, color: &str) -> Self {
        Self { control: Some(default_control_point(start, end)), curved: true, ..Self::straight(start, end, color) }
    }

    #[must_use]
    pub fn path(&self) -> PipePath {
        match (self.curved, self.control) {
            (true, Some(control)) => PipePath::Quadratic { start: self.start, control, end: self.end },
            _ => PipePath::Line { start: self.start, end: self.end },
        }
    }
}

/// Midpoint of `start`-`end` pushed perpendicular by [`PIPE_CURVE_BULGE`] of the chord.
#[must_use]
pub fn default_control_point(start: Point, end: Point) -> Point {
    let chord = end - start;
    start.midpoint(end) + chord.rotate_deg(90.0) * PIPE_CURVE_BULGE
}

/// Stroke pattern for primitive symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Fill and stroke pattern for primitive symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default)]
    pub line_type: LineType,
}

/// What a symbol draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SymbolKind {
    /// Entry from the symbol catalog, looked up by `type_id`.
    Catalog { type_id: String },
    Text { content: String, font_size: f64 },
    Table { rows: u32, cols: u32 },
    Rect { width: f64, height: f64, style: ShapeStyle },
    Circle { radius: f64, style: ShapeStyle },
}

/// A placed symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: ElementId,
    pub kind: SymbolKind,
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<Nature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

impl Symbol {
    #[must_use]
    pub fn new(kind: SymbolKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            rotation: 0.0,
            scale: None,
            circuit_id: None,
            nature: None,
            layer_id: None,
        }
    }
}

/// A construction guide line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxLine {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

impl AuxLine {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { id: Uuid::new_v4(), start, end, layer_id: None }
    }
}

/// A two-point measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    pub distance_px: f64,
    pub distance_units: f64,
    /// Perpendicular offset of the label from the measured segment.
    pub text_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

// =============================================================
// Collections
// =============================================================

/// Kind tag for any element addressable by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Wall,
    RoomGroup,
    Opening,
    Symbol,
    Pipe,
    AuxLine,
    Dimension,
}

/// All drawn elements of one floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementCollection {
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub room_groups: Vec<RoomGroup>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub pipes: Vec<Pipe>,
    #[serde(default)]
    pub aux_lines: Vec<AuxLine>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Pipes drawn with a dashed stroke.
    #[serde(default)]
    pub dashed_pipes: BTreeSet<ElementId>,
}

impl ElementCollection {
    /// Kind and layer of the element with `id`, searching openings inside room groups too.
    #[must_use]
    pub fn locate(&self, id: &ElementId) -> Option<(ElementKind, Option<&str>)> {
        if let Some(w) = self.walls.iter().find(|w| w.id == *id) {
            return Some((ElementKind::Wall, w.layer_id.as_deref()));
        }
        for room in &self.room_groups {
            if room.id == *id {
                return Some((ElementKind::RoomGroup, room.layer_id.as_deref()));
            }
            if room.opening(id).is_some() {
                return Some((ElementKind::Opening, room.layer_id.as_deref()));
            }
        }
        if let Some(s) = self.symbols.iter().find(|s| s.id == *id) {
            return Some((ElementKind::Symbol, s.layer_id.as_deref()));
        }
        if let Some(p) = self.pipes.iter().find(|p| p.id == *id) {
            return Some((ElementKind::Pipe, p.layer_id.as_deref()));
        }
        if let Some(a) = self.aux_lines.iter().find(|a| a.id == *id) {
            return Some((ElementKind::AuxLine, a.layer_id.as_deref()));
        }
        self.dimensions
            .iter()
            .find(|d| d.id == *id)
            .map(|d| (ElementKind::Dimension, d.layer_id.as_deref()))
    }

    #[must_use]
    pub fn room(&self, id: &ElementId) -> Option<&RoomGroup> {
        self.room_groups.iter().find(|r| r.id == *id)
    }

    pub fn room_mut(&mut self, id: &ElementId) -> Option<&mut RoomGroup> {
        self.room_groups.iter_mut().find(|r| r.id == *id)
    }

    /// Move an element by a canvas-space delta. Returns false if nothing moved.
    ///
    /// Openings slide along their wall instead; see `PlanStore::update_opening_position`.
    pub fn translate(&mut self, id: &ElementId, delta: Point) -> bool {
        if let Some(w) = self.walls.iter_mut().find(|w| w.id == *id) {
            w.start = w.start + delta;
            w.end = w.end + delta;
            return true;
        }
        if let Some(r) = self.room_groups.iter_mut().find(|r| r.id == *id) {
            r.transform.x += delta.x;
            r.transform.y += delta.y;
            return true;
        }
        if let Some(s) = self.symbols.iter_mut().find(|s| s.id == *id) {
            s.position = s.position + delta;
            return true;
        }
        if let Some(p) = self.pipes.iter_mut().find(|p| p.id == *id) {
            p.start = p.start + delta;
            p.end = p.end + delta;
            p.control = p.control.map(|c| c + delta);
            return true;
        }
        if let Some(a) = self.aux_lines.iter_mut().find(|a| a.id == *id) {
            a.start = a.start + delta;
            a.end = a.end + delta;
            return true;
        }
        if let Some(d) = self.dimensions.iter_mut().find(|d| d.id == *id) {
            d.start = d.start + delta;
            d.end = d.end + delta;
            return true;
        }
        false
    }

    /// Remove an element (or an opening from its room). Returns the removed kind.
    pub fn remove(&mut self, id: &ElementId) -> Option<ElementKind> {
        if let Some(i) = self.walls.iter().position(|w| w.id == *id) {
            self.walls.remove(i);
            return Some(ElementKind::Wall);
        }
        if let Some(i) = self.room_groups.iter().position(|r| r.id == *id) {
            self.room_groups.remove(i);
            return Some(ElementKind::RoomGroup);
        }
        for room in &mut self.room_groups {
            if let Some(i) = room.openings.iter().position(|o| o.id == *id) {
                room.openings.remove(i);
                return Some(ElementKind::Opening);
            }
        }
        if let Some(i) = self.symbols.iter().position(|s| s.id == *id) {
            self.symbols.remove(i);
            return Some(ElementKind::Symbol);
        }
        if let Some(i) = self.pipes.iter().position(|p| p.id == *id) {
            self.pipes.remove(i);
            self.dashed_pipes.remove(id);
            return Some(ElementKind::Pipe);
        }
        if let Some(i) = self.aux_lines.iter().position(|a| a.id == *id) {
            self.aux_lines.remove(i);
            return Some(ElementKind::AuxLine);
        }
        if let Some(i) = self.dimensions.iter().position(|d| d.id == *id) {
            self.dimensions.remove(i);
            return Some(ElementKind::Dimension);
        }
        None
    }

    /// Total number of top-level elements (openings count individually).
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
            + self.room_groups.len()
            + self.room_groups.iter().map(|r| r.openings.len()).sum::<usize>()
            + self.symbols.len()
            + self.pipes.len()
            + self.aux_lines.len()
            + self.dimensions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One floor of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub paper: PaperFormat,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub elements: ElementCollection,
}

impl Floor {
    /// Empty floor holding only the architecture layer.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            paper: PaperFormat::default(),
            layers: vec![Layer::architecture()],
            elements: ElementCollection::default(),
        }
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}

/// Project-wide settings shared by every floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub construction: ConstructionState,
    /// Calibrated canvas pixels per real-world unit.
    pub pixels_per_unit: f64,
    /// Suffix for measurement labels.
    #[serde(default = "default_unit_label")]
    pub unit_label: String,
}

fn default_unit_label() -> String {
    "m".to_owned()
}

impl ProjectSettings {
    #[must_use]
    pub fn new(pixels_per_unit: f64) -> Self {
        Self { construction: ConstructionState::default(), pixels_per_unit, unit_label: default_unit_label() }
    }
}

/// The persisted shape of a whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub id: ElementId,
    pub name: String,
    pub settings: ProjectSettings,
    pub floors: Vec<Floor>,
}
