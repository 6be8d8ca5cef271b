//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed camera zoom.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed camera zoom.
pub const ZOOM_MAX: f64 = 10.0;

/// Zoom multiplier applied per 100 px of wheel delta.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for thin strokes and symbol anchors.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Geometry ────────────────────────────────────────────────────

/// Lengths at or below this are treated as degenerate.
pub const GEOM_EPSILON: f64 = 1e-9;

/// Perpendicular bulge of a curved pipe, as a fraction of its chord length.
pub const PIPE_CURVE_BULGE: f64 = 0.2;

/// Half-angle of a dimension arrowhead, in degrees.
pub const ARROW_HALF_ANGLE_DEG: f64 = 30.0;

/// Door leaf sweep, in degrees.
pub const DOOR_SWEEP_DEG: f64 = 90.0;

// ── Layers ──────────────────────────────────────────────────────

/// Id of the always-present architecture layer.
pub const ARCHITECTURE_LAYER_ID: &str = "architecture";

/// Opacity applied to layers of surveyed (pre-existing) circuits.
pub const SURVEYED_OPACITY: f64 = 0.5;

// ── Symbols ─────────────────────────────────────────────────────

/// Default font size for text symbols, in canvas pixels.
pub const DEFAULT_TEXT_SIZE: f64 = 14.0;

/// Default row count for table symbols.
pub const DEFAULT_TABLE_ROWS: u32 = 3;

/// Default column count for table symbols.
pub const DEFAULT_TABLE_COLS: u32 = 3;
