//! Engine tuning knobs, loaded from `PLAN_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PIXELS_PER_UNIT: f64 = 50.0;
pub const DEFAULT_MIN_DRAG_PX: f64 = 5.0;
pub const DEFAULT_WALL_SNAP_PX: f64 = 20.0;
pub const DEFAULT_ENDPOINT_SNAP_PX: f64 = 8.0;
pub const DEFAULT_DIMENSION_OFFSET_PX: f64 = 20.0;
pub const DEFAULT_ARROW_SIZE_PX: f64 = 10.0;
pub const DEFAULT_OPENING_MARGIN: f64 = 0.0;
pub const DEFAULT_PIPE_COLOR: &str = "#2563EB";

/// Thresholds and defaults used by the drawing tools.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Initial pixels per real-world unit for new projects.
    pub pixels_per_unit: f64,
    /// Drag-to-define commits only when the drag is longer than this, in canvas px.
    pub min_drag_px: f64,
    /// Maximum distance from a room wall for opening insertion, in canvas px.
    pub wall_snap_px: f64,
    /// Radius for snapping wall endpoints to existing endpoints, in canvas px.
    pub endpoint_snap_px: f64,
    /// Perpendicular offset of dimension labels, in canvas px.
    pub dimension_offset_px: f64,
    /// Dimension arrowhead length, in canvas px.
    pub arrow_size_px: f64,
    /// Extra normalized margin kept between an opening and the wall ends.
    pub opening_margin: f64,
    /// Stroke colour for pipes drawn outside any circuit layer.
    pub pipe_color: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            min_drag_px: DEFAULT_MIN_DRAG_PX,
            wall_snap_px: DEFAULT_WALL_SNAP_PX,
            endpoint_snap_px: DEFAULT_ENDPOINT_SNAP_PX,
            dimension_offset_px: DEFAULT_DIMENSION_OFFSET_PX,
            arrow_size_px: DEFAULT_ARROW_SIZE_PX,
            opening_margin: DEFAULT_OPENING_MARGIN,
            pipe_color: DEFAULT_PIPE_COLOR.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PLAN_PIXELS_PER_UNIT`: default 50, must be positive
    /// - `PLAN_MIN_DRAG_PX`: default 5
    /// - `PLAN_WALL_SNAP_PX`: default 20
    /// - `PLAN_ENDPOINT_SNAP_PX`: default 8
    /// - `PLAN_DIMENSION_OFFSET_PX`: default 20
    /// - `PLAN_ARROW_SIZE_PX`: default 10
    /// - `PLAN_OPENING_MARGIN`: default 0
    /// - `PLAN_PIPE_COLOR`: default `#2563EB`
    ///
    /// Absent or unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let num = |key: &str, default: f64| parse_or(lookup(key), default);
        let pixels_per_unit = num("PLAN_PIXELS_PER_UNIT", DEFAULT_PIXELS_PER_UNIT);
        Self {
            pixels_per_unit: if pixels_per_unit > 0.0 { pixels_per_unit } else { DEFAULT_PIXELS_PER_UNIT },
            min_drag_px: num("PLAN_MIN_DRAG_PX", DEFAULT_MIN_DRAG_PX),
            wall_snap_px: num("PLAN_WALL_SNAP_PX", DEFAULT_WALL_SNAP_PX),
            endpoint_snap_px: num("PLAN_ENDPOINT_SNAP_PX", DEFAULT_ENDPOINT_SNAP_PX),
            dimension_offset_px: num("PLAN_DIMENSION_OFFSET_PX", DEFAULT_DIMENSION_OFFSET_PX),
            arrow_size_px: num("PLAN_ARROW_SIZE_PX", DEFAULT_ARROW_SIZE_PX),
            opening_margin: num("PLAN_OPENING_MARGIN", DEFAULT_OPENING_MARGIN),
            pipe_color: lookup("PLAN_PIPE_COLOR")
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_PIPE_COLOR.to_owned()),
        }
    }
}

/// Parse a finite number, falling back to `default`.
fn parse_or(raw: Option<String>, default: f64) -> f64 {
    match raw.map(|v| v.trim().parse::<f64>()) {
        Some(Ok(v)) if v.is_finite() => v,
        _ => default,
    }
}
