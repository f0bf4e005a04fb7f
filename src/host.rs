//! Browser entry point: binds a `<canvas>` to a [`MapEngine`] and wires DOM events.
//!
//! The middle-button press is captured on the canvas; release, move and wheel
//! are captured on the document so a drag that leaves the canvas still ends
//! cleanly. Window resizes resize the canvas backing store before redrawing.
//! Every handler forwards to the engine and then dispatches the returned
//! [`Action`]s: cursor changes go to `document.body`, and any number of
//! render requests in one batch collapse into a single redraw.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::camera::Point;
use crate::config::MapConfig;
use crate::engine::{Action, MapEngine};
use crate::input::{Button, Cursor, WheelDelta};

/// JS handle for a mounted grid map.
#[wasm_bindgen]
pub struct GridMap {
    engine: Rc<RefCell<MapEngine>>,
    document: Document,
}

#[wasm_bindgen]
impl GridMap {
    /// Mount on the canvas with id `canvas_id`.
    ///
    /// `config_json` is an optional, possibly partial, JSON `MapConfig`.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, the canvas is missing or has no 2D
    /// context, or a listener cannot be attached.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<GridMap, JsValue> {
        install_console();

        let config = match config_json {
            Some(json) => MapConfig::from_json(&json).map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => MapConfig::default(),
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("element {canvas_id:?} is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("2d context has an unexpected type"))?;

        let engine = Rc::new(RefCell::new(MapEngine::new(canvas.clone(), ctx, config)));
        let map = GridMap { engine, document };
        map.attach_listeners(&window, &canvas)?;
        map.render()?;
        log::debug!("grid map mounted on #{canvas_id}");
        Ok(map)
    }

    /// Jump the camera so world pixel `{x, y}` sits at the top-left corner,
    /// then redraw once.
    ///
    /// # Errors
    ///
    /// Fails if `target` lacks numeric `x` / `y` fields.
    #[wasm_bindgen(js_name = setDragPosition)]
    pub fn set_drag_position(&self, target: JsValue) -> Result<(), JsValue> {
        let x = number_field(&target, "x")?;
        let y = number_field(&target, "y")?;
        let actions = self.engine.borrow_mut().set_drag_position(Point::new(x, y));
        dispatch(&self.engine, &self.document, actions);
        Ok(())
    }

    /// Redraw the scene with the current camera state.
    ///
    /// # Errors
    ///
    /// Propagates `Canvas2D` failures.
    pub fn render(&self) -> Result<(), JsValue> {
        self.engine.borrow().render()
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.engine.borrow().camera().scale
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.engine.borrow().camera().offset.x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.engine.borrow().camera().offset.y
    }

    /// `[column, row]` of the cell under a canvas-relative point.
    #[wasm_bindgen(js_name = cellAt)]
    pub fn cell_at(&self, x: f64, y: f64) -> Vec<i32> {
        let cell = self.engine.borrow().cell_at(Point::new(x, y));
        vec![cell.x, cell.y]
    }
}

impl GridMap {
    fn attach_listeners(&self, window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let on_mouse_down = {
            let engine = Rc::clone(&self.engine);
            let document = self.document.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
                let button = Button::from_dom(ev.button());
                if button == Button::Middle {
                    ev.prevent_default();
                }
                let actions = engine.borrow_mut().on_pointer_down(client_point(&ev), button);
                dispatch(&engine, &document, actions);
            })
        };
        canvas.add_event_listener_with_callback("mousedown", on_mouse_down.as_ref().unchecked_ref())?;
        on_mouse_down.forget();

        let on_mouse_up = {
            let engine = Rc::clone(&self.engine);
            let document = self.document.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
                let actions = engine
                    .borrow_mut()
                    .on_pointer_up(client_point(&ev), Button::from_dom(ev.button()));
                dispatch(&engine, &document, actions);
            })
        };
        self.document
            .add_event_listener_with_callback("mouseup", on_mouse_up.as_ref().unchecked_ref())?;
        on_mouse_up.forget();

        let on_mouse_move = {
            let engine = Rc::clone(&self.engine);
            let document = self.document.clone();
            Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
                let actions = engine.borrow_mut().on_pointer_move(client_point(&ev));
                dispatch(&engine, &document, actions);
            })
        };
        self.document
            .add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;
        on_mouse_move.forget();

        let on_wheel = {
            let engine = Rc::clone(&self.engine);
            let document = self.document.clone();
            Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
                let actions = engine.borrow_mut().on_wheel(WheelDelta { dy: ev.delta_y() });
                dispatch(&engine, &document, actions);
            })
        };
        self.document
            .add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
        on_wheel.forget();

        let on_resize = {
            let engine = Rc::clone(&self.engine);
            let document = self.document.clone();
            Closure::<dyn FnMut()>::new(move || {
                let actions = engine.borrow_mut().sync_viewport();
                dispatch(&engine, &document, actions);
            })
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();

        Ok(())
    }
}

/// Apply engine actions: cursor changes immediately, at most one redraw.
fn dispatch(engine: &RefCell<MapEngine>, document: &Document, actions: Vec<Action>) {
    let mut render_needed = false;
    for action in actions {
        match action {
            Action::SetCursor(cursor) => set_body_cursor(document, cursor),
            Action::RenderNeeded => render_needed = true,
        }
    }
    if render_needed {
        if let Err(err) = engine.borrow().render() {
            log::warn!("render failed: {err:?}");
        }
    }
}

fn set_body_cursor(document: &Document, cursor: Cursor) {
    let Some(body) = document.body() else {
        return;
    };
    if let Err(err) = body.style().set_property("cursor", cursor.as_css()) {
        log::warn!("failed to set cursor {}: {err:?}", cursor.as_css());
    }
}

fn client_point(ev: &MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

fn number_field(target: &JsValue, name: &str) -> Result<f64, JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))?
        .as_f64()
        .ok_or_else(|| JsValue::from_str(&format!("setDragPosition: `{name}` must be a number")))
}

/// Route `log` output and panics to the browser console.
fn install_console() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        log::debug!("console logger already installed: {err}");
    }
}
