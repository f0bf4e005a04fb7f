//! Shared numeric constants for the grid map.

// ── Map geometry ────────────────────────────────────────────────

/// Number of cells along each side of the square map.
pub const MAP_SIZE: u32 = 100;

/// Side length of one cell in world pixels.
pub const CELL_SIZE: f64 = 35.0;

// ── Camera ──────────────────────────────────────────────────────

/// Largest allowed scale factor.
pub const MAX_SCALE: f64 = 3.0;

/// Smallest allowed scale factor, before the viewport-derived floor.
pub const MIN_SCALE: f64 = 0.5;

/// Scale change applied per wheel event.
pub const ZOOM_STEP: f64 = 0.1;

/// Scale the camera starts at when the viewport allows it.
pub const INITIAL_SCALE: f64 = 1.0;

// ── Grid ────────────────────────────────────────────────────────

/// Grid lines are hidden at or below this scale.
pub const NOT_DRAW_GRID_SCALE: f64 = 0.6;

/// Debug label font size in world pixels.
pub const LABEL_FONT_PX: f64 = 20.0;

/// Extra downward nudge of debug labels in world pixels.
pub const LABEL_BASELINE_NUDGE: f64 = 5.0;

// ── Colors ──────────────────────────────────────────────────────

pub const GRID_LINE_COLOR: &str = "#ccc";
pub const LABEL_COLOR: &str = "#999";
pub const BORDER_COLOR: &str = "#000";

// ── Input ───────────────────────────────────────────────────────

/// Mouse button id the browser reports for the middle button.
pub const MIDDLE_BUTTON_ID: i16 = 1;
