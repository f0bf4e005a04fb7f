use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Cell, Point, Viewport};
use crate::config::MapConfig;
use crate::input::{Button, Cursor, DragState, WheelDelta, Zoom};
use crate::render::{self, CanvasSurface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SetCursor(Cursor),
    RenderNeeded,
}

/// Camera and drag state plus the rules that keep them in bounds.
///
/// Holds everything that doesn't depend on the canvas element, so it can be
/// tested without WASM/browser dependencies.
#[derive(Debug, Clone)]
pub struct ViewportController {
    pub config: MapConfig,
    pub camera: Camera,
    pub drag: DragState,
    pub viewport: Viewport,
}

impl ViewportController {
    /// Create a controller for a validated config and the initial viewport size.
    ///
    /// The camera starts at the origin with `initial_scale`, raised to the
    /// scale floor when the viewport is wider than the map at that scale.
    #[must_use]
    pub fn new(config: MapConfig, viewport: Viewport) -> Self {
        let mut controller = Self {
            config,
            camera: Camera::default(),
            drag: DragState::Idle,
            viewport,
        };
        controller.camera.scale = controller.clamp_scale(controller.config.initial_scale);
        controller
    }

    // --- Limits ---

    /// Smallest scale at which the map still spans the viewport width.
    #[must_use]
    pub fn min_scale_limit(&self) -> f64 {
        self.viewport.width / self.config.map_extent()
    }

    /// `max(min_scale, min_scale_limit)`.
    #[must_use]
    pub fn scale_floor(&self) -> f64 {
        self.config.min_scale.max(self.min_scale_limit())
    }

    /// Clamp a scale into `[scale_floor, max_scale]`; the floor wins if they cross.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.min(self.config.max_scale).max(self.scale_floor())
    }

    /// Clamp an offset so the visible region stays inside the map.
    #[must_use]
    pub fn clamp_offset(&self, offset: Point) -> Point {
        let extent = self.config.map_extent();
        Point {
            x: clamp_axis(offset.x, extent, self.viewport.width, self.camera.scale),
            y: clamp_axis(offset.y, extent, self.viewport.height, self.camera.scale),
        }
    }

    // --- Viewport ---

    /// Resynchronize the viewport size after a resize.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        self.camera.scale = self.clamp_scale(self.camera.scale);
        self.camera.offset = self.clamp_offset(self.camera.offset);
        log::trace!(
            "viewport resized to {}x{}, scale {}",
            viewport.width,
            viewport.height,
            self.camera.scale
        );
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    /// Middle-button press starts a pan gesture.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Middle || self.drag.is_dragging() {
            return Vec::new();
        }
        self.drag = DragState::Dragging {
            start_screen: screen_pt,
            start_offset: self.camera.offset,
        };
        vec![Action::SetCursor(Cursor::Grabbing)]
    }

    /// While dragging, recompute the offset from the gesture start and clamp it.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let DragState::Dragging { start_screen, start_offset } = self.drag else {
            return Vec::new();
        };
        let cam = self.camera;
        let raw = Point {
            x: (start_offset.x + cam.screen_dist_to_world(screen_pt.x - start_screen.x)).floor(),
            y: (start_offset.y + cam.screen_dist_to_world(screen_pt.y - start_screen.y)).floor(),
        };
        self.camera.offset = self.clamp_offset(raw);
        vec![Action::RenderNeeded]
    }

    /// Middle-button release ends the pan gesture.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Middle {
            return Vec::new();
        }
        self.drag = DragState::Idle;
        vec![Action::SetCursor(Cursor::Auto)]
    }

    /// Step the scale in or out. Zoom stays anchored at the world origin.
    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        let step = self.config.zoom_step;
        let scale = self.camera.scale;
        self.camera.scale = match delta.zoom() {
            Some(Zoom::In) => self.clamp_scale(scale + step),
            Some(Zoom::Out) => self.clamp_scale(scale - step),
            None => scale,
        };
        log::trace!("wheel dy={} scale {} -> {}", delta.dy, scale, self.camera.scale);
        vec![Action::RenderNeeded]
    }

    /// Jump the camera so `target` (world pixels) sits at the top-left corner.
    ///
    /// The offset is written as given, without clamping.
    pub fn set_drag_position(&mut self, target: Point) -> Vec<Action> {
        self.camera.offset = Point::new(-target.x, -target.y);
        log::debug!("camera offset set to ({}, {})", self.camera.offset.x, self.camera.offset.y);
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// The grid cell under a screen point. May lie outside the map.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at(&self, screen_pt: Point) -> Cell {
        let world = self.camera.screen_to_world(screen_pt);
        let cell_size = self.config.cell_size;
        Cell::new((world.x / cell_size).floor() as i32, (world.y / cell_size).floor() as i32)
    }
}

/// Clamp one offset axis to `[-(extent - view / scale), 0]`.
///
/// When the map is narrower than the view the lower bound collapses to 0.
fn clamp_axis(offset: f64, extent: f64, view: f64, scale: f64) -> f64 {
    let lower = (-(extent - view / scale)).min(0.0);
    offset.clamp(lower, 0.0)
}

/// The full map engine. Wraps `ViewportController` and owns the browser canvas.
pub struct MapEngine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: ViewportController,
}

impl MapEngine {
    /// Create an engine bound to a canvas and its 2D context, sized to the
    /// canvas element's client box.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, config: MapConfig) -> Self {
        let viewport = sync_canvas_size(&canvas);
        Self { canvas, ctx, core: ViewportController::new(config, viewport) }
    }

    // --- Viewport ---

    /// Resize the backing store to the element size and update the viewport.
    pub fn sync_viewport(&mut self) -> Vec<Action> {
        let viewport = sync_canvas_size(&self.canvas);
        self.core.set_viewport(viewport)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(delta)
    }

    pub fn set_drag_position(&mut self, target: Point) -> Vec<Action> {
        self.core.set_drag_position(target)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), wasm_bindgen::JsValue> {
        let mut surface = CanvasSurface::new(&self.ctx);
        render::draw_scene(&mut surface, &self.core.camera, &self.core.config, self.core.viewport())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn cell_at(&self, screen_pt: Point) -> Cell {
        self.core.cell_at(screen_pt)
    }
}

/// Match the canvas backing store to its CSS box and return the new viewport.
fn sync_canvas_size(canvas: &HtmlCanvasElement) -> Viewport {
    let width = u32::try_from(canvas.client_width()).unwrap_or(0);
    let height = u32::try_from(canvas.client_height()).unwrap_or(0);
    canvas.set_width(width);
    canvas.set_height(height);
    Viewport::new(f64::from(width), f64::from(height))
}
