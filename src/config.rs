//! Runtime options for the grid map.
//!
//! `MapConfig` replaces the hard-coded toggles of a one-off script: map
//! geometry, scale limits, grid/debug switches and the border polygon. A host
//! can pass a partial JSON object; missing fields fall back to [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Cell, Point, cell_to_pixel};
use crate::consts::{CELL_SIZE, INITIAL_SCALE, MAP_SIZE, MAX_SCALE, MIN_SCALE, NOT_DRAW_GRID_SCALE, ZOOM_STEP};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid map config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("scale range is inverted: min {min} > max {max}")]
    InvertedScaleRange { min: f64, max: f64 },
}

// =============================================================================
// CONFIG
// =============================================================================

/// Map geometry, camera limits and rendering switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Cells per side of the square map.
    pub map_size: u32,
    /// Cell side length in world pixels.
    pub cell_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel event.
    pub zoom_step: f64,
    /// Preferred starting scale; raised to the scale floor when the viewport demands it.
    pub initial_scale: f64,
    /// Stroke grid lines (subject to `no_grid_scale_threshold`).
    pub draw_grid: bool,
    /// Label grid lines with their cell index.
    pub debug_mode: bool,
    /// Grid lines are hidden at or below this scale.
    pub no_grid_scale_threshold: f64,
    /// Closed border polygon, in cell coordinates.
    pub border: Vec<Cell>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_size: MAP_SIZE,
            cell_size: CELL_SIZE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
            initial_scale: INITIAL_SCALE,
            draw_grid: true,
            debug_mode: true,
            no_grid_scale_threshold: NOT_DRAW_GRID_SCALE,
            border: default_border(),
        }
    }
}

/// The stepped outline drawn when no border is configured.
#[must_use]
pub fn default_border() -> Vec<Cell> {
    vec![
        Cell::new(1, 1),
        Cell::new(1, 5),
        Cell::new(4, 5),
        Cell::new(4, 7),
        Cell::new(7, 7),
        Cell::new(7, 1),
    ]
}

impl MapConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the other variants
    /// when [`MapConfig::validate`] rejects the values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the scale floor stays strictly positive and the map is non-empty.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("map_size", f64::from(self.map_size))?;
        positive("cell_size", self.cell_size)?;
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        positive("zoom_step", self.zoom_step)?;
        positive("initial_scale", self.initial_scale)?;
        if !self.no_grid_scale_threshold.is_finite() {
            return Err(ConfigError::NotFinite { field: "no_grid_scale_threshold" });
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::InvertedScaleRange { min: self.min_scale, max: self.max_scale });
        }
        Ok(())
    }

    /// Side length of the whole map in world pixels.
    #[must_use]
    pub fn map_extent(&self) -> f64 {
        f64::from(self.map_size) * self.cell_size
    }

    /// Border vertices converted to world pixels.
    #[must_use]
    pub fn border_pixels(&self) -> Vec<Point> {
        self.border.iter().map(|&cell| cell_to_pixel(cell, self.cell_size)).collect()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
