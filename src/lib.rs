//! Pannable, zoomable grid map rendered to a 2D canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! camera model (offset + scale), the middle-button drag and wheel zoom
//! controls, and the immediate-mode redraw of the grid and the border
//! polygon. The browser is touched only by [`host`], which wires DOM events to
//! the engine, and by the canvas adapter in [`render`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::ViewportController`] and the canvas-owning [`engine::MapEngine`] |
//! | [`camera`] | Camera state and world/screen coordinate transforms |
//! | [`input`] | Mouse buttons, wheel deltas and the drag state machine |
//! | [`render`] | Grid and border drawing against the [`render::Surface`] trait |
//! | [`config`] | Runtime map options and their validation |
//! | [`host`] | `wasm_bindgen` entry point and DOM listener wiring |
//! | [`consts`] | Default sizes, scale limits and colors |

pub mod camera;
pub mod config;
pub mod consts;
pub mod engine;
pub mod host;
pub mod input;
pub mod render;
