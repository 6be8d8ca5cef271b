//! Hit-testing for the select tool.
//!
//! Targets are tested in a fixed priority order: openings first (they sit on
//! top of room walls), then symbols, pipes, free walls, aux lines,
//! dimensions, and finally room walls, which select the whole room group.
//! Elements on hidden layers are skipped.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{ElementCollection, ElementId, ElementKind, Pipe, PipePath, Symbol, SymbolKind};
use crate::layer::Layer;
use crate::opening::absolute_geometry;
use crate::wall::{find_nearest_wall, project_point_on_segment};

/// Segments used to approximate a curved pipe.
const CURVE_SAMPLES: usize = 16;

/// Pick radius of a catalog symbol at scale 1, in canvas pixels.
const CATALOG_SYMBOL_RADIUS: f64 = 16.0;

/// Approximate cell size of a table symbol, in canvas pixels.
const TABLE_CELL_PX: f64 = 20.0;

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// An opening, addressed through its room.
    Opening { room_id: ElementId, opening_id: ElementId },
    /// Any top-level element.
    Element { id: ElementId, kind: ElementKind },
}

impl Hit {
    /// Id of the element that becomes selected.
    #[must_use]
    pub fn id(&self) -> ElementId {
        match *self {
            Self::Opening { opening_id, .. } => opening_id,
            Self::Element { id, .. } => id,
        }
    }
}

fn visible(layers: &[Layer], layer_id: Option<&str>) -> bool {
    match layer_id {
        Some(id) => layers.iter().find(|l| l.id == id).is_none_or(|l| l.visible),
        None => true,
    }
}

fn segment_distance(point: Point, start: Point, end: Point) -> f64 {
    project_point_on_segment(point, start, end).distance
}

/// Distance from `point` to a pipe's drawn path.
#[must_use]
pub fn pipe_distance(pipe: &Pipe, point: Point) -> f64 {
    match pipe.path() {
        PipePath::Line { start, end } => segment_distance(point, start, end),
        path @ PipePath::Quadratic { .. } => {
            #[allow(clippy::cast_precision_loss)]
            let at = |i: usize| path.point_at(i as f64 / CURVE_SAMPLES as f64);
            (0..CURVE_SAMPLES)
                .map(|i| segment_distance(point, at(i), at(i + 1)))
                .fold(f64::INFINITY, f64::min)
        }
    }
}

/// Pick radius of a symbol around its anchor, before tolerance.
#[must_use]
pub fn symbol_radius(symbol: &Symbol) -> f64 {
    let base = match &symbol.kind {
        SymbolKind::Catalog { .. } => CATALOG_SYMBOL_RADIUS,
        SymbolKind::Text { font_size, .. } => *font_size,
        SymbolKind::Table { rows, cols } => TABLE_CELL_PX * f64::from((*rows).max(*cols)) / 2.0,
        SymbolKind::Rect { width, height, .. } => width.hypot(*height) / 2.0,
        SymbolKind::Circle { radius, .. } => *radius,
    };
    base * symbol.scale.unwrap_or(1.0).abs()
}

/// Find the topmost target within `tolerance` canvas pixels of `point`.
#[must_use]
pub fn hit_test(
    elements: &ElementCollection,
    layers: &[Layer],
    point: Point,
    tolerance: f64,
    pixels_per_unit: f64,
) -> Option<Hit> {
    let shown = |layer: &Option<String>| visible(layers, layer.as_deref());

    for room in elements.room_groups.iter().filter(|r| shown(&r.layer_id)) {
        for opening in &room.openings {
            let Some(g) = absolute_geometry(room, opening, pixels_per_unit) else {
                continue;
            };
            if segment_distance(point, g.start, g.end) <= tolerance {
                return Some(Hit::Opening { room_id: room.id, opening_id: opening.id });
            }
        }
    }

    let element = |id: ElementId, kind: ElementKind| Some(Hit::Element { id, kind });

    // Later symbols draw on top.
    if let Some(s) = elements
        .symbols
        .iter()
        .rev()
        .filter(|s| shown(&s.layer_id))
        .find(|s| s.position.distance(point) <= symbol_radius(s) + tolerance)
    {
        return element(s.id, ElementKind::Symbol);
    }
    if let Some(p) = elements
        .pipes
        .iter()
        .rev()
        .filter(|p| shown(&p.layer_id))
        .find(|p| pipe_distance(p, point) <= tolerance)
    {
        return element(p.id, ElementKind::Pipe);
    }
    if let Some(w) = elements
        .walls
        .iter()
        .rev()
        .filter(|w| shown(&w.layer_id))
        .find(|w| segment_distance(point, w.start, w.end) <= tolerance)
    {
        return element(w.id, ElementKind::Wall);
    }
    if let Some(a) = elements
        .aux_lines
        .iter()
        .rev()
        .filter(|a| shown(&a.layer_id))
        .find(|a| segment_distance(point, a.start, a.end) <= tolerance)
    {
        return element(a.id, ElementKind::AuxLine);
    }
    if let Some(d) = elements
        .dimensions
        .iter()
        .rev()
        .filter(|d| shown(&d.layer_id))
        .find(|d| segment_distance(point, d.start, d.end) <= tolerance)
    {
        return element(d.id, ElementKind::Dimension);
    }

    elements
        .room_groups
        .iter()
        .filter(|r| shown(&r.layer_id))
        .filter_map(|r| {
            find_nearest_wall(&r.walls, point, &r.transform, tolerance).map(|hit| (r.id, hit.projection.distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| Hit::Element { id, kind: ElementKind::RoomGroup })
}
