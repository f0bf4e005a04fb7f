#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A grid cell coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Top-left world pixel of a cell.
#[must_use]
pub fn cell_to_pixel(cell: Cell, cell_size: f64) -> Point {
    Point {
        x: f64::from(cell.x) * cell_size,
        y: f64::from(cell.y) * cell_size,
    }
}

/// Size of the visible canvas in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Camera state for pan/zoom over the grid map.
///
/// `offset` is a translation in world pixels and stays non-positive while the
/// controller owns it. `scale` multiplies world distances into screen
/// distances and is kept strictly positive by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Point,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset: Point::default(), scale: 1.0 }
    }
}

impl Camera {
    /// Screen x of a world x.
    #[must_use]
    pub fn to_screen_x(&self, world_x: f64) -> f64 {
        self.apply_scale(world_x) + self.offset.x * self.scale
    }

    /// Screen y of a world y.
    #[must_use]
    pub fn to_screen_y(&self, world_y: f64) -> f64 {
        self.apply_scale(world_y) + self.offset.y * self.scale
    }

    /// Scale a world distance into a screen distance.
    #[must_use]
    pub fn apply_scale(&self, n: f64) -> f64 {
        n * self.scale
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: self.to_screen_x(world.x),
            y: self.to_screen_y(world.y),
        }
    }

    /// Convert a screen-space point back to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: screen.x / self.scale - self.offset.x,
            y: screen.y / self.scale - self.offset.y,
        }
    }

    /// Convert a screen-space distance to a world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}
