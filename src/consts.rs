//! Shared numeric constants for the editor crate.

// ── Scene ───────────────────────────────────────────────────────

/// Default logical scene width when none is supplied.
pub const DEFAULT_LOGICAL_WIDTH: f64 = 1920.0;

/// Default logical scene height when none is supplied.
pub const DEFAULT_LOGICAL_HEIGHT: f64 = 1080.0;

/// Minimum interval between two resize recomputations, in milliseconds.
pub const RESIZE_THROTTLE_MS: f64 = 100.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop around scale corners and the rotate handle, in logical units.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance from the top edge to the rotate handle, in logical units.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;

/// Outward padding of the selection outline and the pick polygon.
pub const BORDER_PADDING: f64 = 2.0;

/// Areas and lengths below this are treated as degenerate.
pub const GEOM_EPSILON: f64 = 1e-9;

// ── Gestures ────────────────────────────────────────────────────

/// Smallest scale factor a scale gesture may produce.
pub const MIN_SCALE: f64 = 0.01;

// ── Decorations ─────────────────────────────────────────────────

/// Inner ring radius of the rotate glyph, in physical pixels.
pub const ROTATE_GLYPH_RADIUS: f64 = 4.0;

/// Half-size of a drawn scale-corner square, in physical pixels.
pub const CORNER_HANDLE_HALF_PX: f64 = 4.0;
