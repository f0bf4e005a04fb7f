//! Rendering: draws the grid and the border polygon to a 2D surface.
//!
//! Drawing goes through the [`Surface`] trait so the command stream can be
//! recorded in tests. [`CanvasSurface`] adapts the browser's
//! [`web_sys::CanvasRenderingContext2d`] and is the only place in this module
//! that touches it. Renderers receive read-only camera and config state and
//! produce pixels; they never mutate application state.
//!
//! Fallible `Canvas2D` calls propagate errors via `Result<(), S::Error>`. The
//! top-level caller ([`crate::engine::MapEngine::render`]) hands the result to
//! the host.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point, Viewport};
use crate::config::MapConfig;
use crate::consts::{BORDER_COLOR, GRID_LINE_COLOR, LABEL_BASELINE_NUDGE, LABEL_COLOR, LABEL_FONT_PX};

/// The imperative 2D drawing operations the renderers rely on.
pub trait Surface {
    type Error;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the text call.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;
}

/// [`Surface`] backed by a browser canvas 2D context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = JsValue;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.fill_text(text, x, y)
    }
}

/// Draw the full scene: grid first, then the border polygon on top.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_scene<S: Surface>(
    surface: &mut S,
    camera: &Camera,
    config: &MapConfig,
    viewport: Viewport,
) -> Result<(), S::Error> {
    draw_grid(surface, camera, config, viewport)?;
    draw_border(surface, camera, &config.border_pixels());
    Ok(())
}

// =============================================================
// Grid
// =============================================================

/// Screen positions of the grid lines along one axis, from the first line at
/// or after 0 up to (excluding) `limit`.
///
/// `offset` is the camera offset on that axis in world pixels.
#[must_use]
pub fn grid_line_positions(offset: f64, scale: f64, cell_size: f64, limit: f64) -> Vec<f64> {
    let step = cell_size * scale;
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let first = scale * (offset - cell_size * (offset / cell_size).floor());
    (0u32..)
        .map(|i| first + step * f64::from(i))
        .take_while(|&pos| pos < limit)
        .collect()
}

/// Cell index whose leading edge sits at screen position `pos`.
#[allow(clippy::cast_possible_truncation)]
fn cell_index(pos: f64, offset: f64, scale: f64, cell_size: f64) -> i64 {
    ((pos / scale - offset) / cell_size).round() as i64
}

/// Clear the viewport and draw grid lines and, in debug mode, cell labels.
///
/// # Errors
///
/// Returns `Err` if a label cannot be drawn.
pub fn draw_grid<S: Surface>(
    surface: &mut S,
    camera: &Camera,
    config: &MapConfig,
    viewport: Viewport,
) -> Result<(), S::Error> {
    surface.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    let show_lines = config.draw_grid && camera.scale > config.no_grid_scale_threshold;
    if !show_lines && !config.debug_mode {
        return Ok(());
    }

    surface.save();
    surface.begin_path();
    surface.set_fill_style(LABEL_COLOR);
    surface.set_font(&format!("{}px serif", camera.apply_scale(LABEL_FONT_PX)));
    surface.set_text_align("center");

    let result = draw_grid_lines(surface, camera, config, viewport, show_lines);

    surface.set_stroke_style(GRID_LINE_COLOR);
    surface.stroke();
    surface.restore();
    result
}

/// Path the grid lines and fill the debug labels; the caller strokes.
fn draw_grid_lines<S: Surface>(
    surface: &mut S,
    camera: &Camera,
    config: &MapConfig,
    viewport: Viewport,
    show_lines: bool,
) -> Result<(), S::Error> {
    let scale = camera.scale;
    let cell_size = config.cell_size;
    let half_cell = camera.apply_scale(cell_size) / 2.0;
    let nudge = camera.apply_scale(LABEL_BASELINE_NUDGE);

    for x in grid_line_positions(camera.offset.x, scale, cell_size, viewport.width) {
        if show_lines {
            surface.move_to(x, 0.0);
            surface.line_to(x, viewport.height);
        }
        if config.debug_mode {
            let cell = cell_index(x, camera.offset.x, scale, cell_size);
            surface.fill_text(&cell.to_string(), x + half_cell, half_cell + nudge)?;
        }
    }
    for y in grid_line_positions(camera.offset.y, scale, cell_size, viewport.height) {
        if show_lines {
            surface.move_to(0.0, y);
            surface.line_to(viewport.width, y);
        }
        if config.debug_mode {
            let cell = cell_index(y, camera.offset.y, scale, cell_size);
            surface.fill_text(&cell.to_string(), half_cell, y + half_cell + nudge)?;
        }
    }
    Ok(())
}

// =============================================================
// Border
// =============================================================

/// Whether the border would be culled: its transformed maximum x or maximum
/// y lies left of / above the screen origin.
///
/// Only the top/left sides are checked; polygons off the bottom/right still draw.
#[must_use]
pub fn border_culled(camera: &Camera, vertices: &[Point]) -> bool {
    let max_x = vertices.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = vertices.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    camera.to_screen_x(max_x) < 0.0 || camera.to_screen_y(max_y) < 0.0
}

/// Stroke a closed polygon through `vertices` (world pixels).
pub fn draw_border<S: Surface>(surface: &mut S, camera: &Camera, vertices: &[Point]) {
    if vertices.is_empty() || border_culled(camera, vertices) {
        return;
    }

    surface.save();
    surface.set_stroke_style(BORDER_COLOR);
    surface.begin_path();
    for (i, from) in vertices.iter().enumerate() {
        let to = vertices[(i + 1) % vertices.len()];
        surface.move_to(camera.to_screen_x(from.x), camera.to_screen_y(from.y));
        surface.line_to(camera.to_screen_x(to.x), camera.to_screen_y(to.y));
    }
    surface.stroke();
    surface.restore();
}
