//! Input model: mouse buttons, wheel deltas, cursors and the drag state machine.
//!
//! `DragState` is the active pan gesture tracked between middle-button press
//! and release. It carries the press position and the camera offset at press
//! time, so every move recomputes the offset from the start of the gesture
//! instead of accumulating per-event deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::MIDDLE_BUTTON_ID;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click); drives panning.
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` id.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            MIDDLE_BUTTON_ID => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Vertical scroll amount (negative = wheel rolled away from the user).
    pub dy: f64,
}

/// Zoom direction derived from a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

impl WheelDelta {
    #[must_use]
    pub fn zoom(self) -> Option<Zoom> {
        if self.dy < 0.0 {
            Some(Zoom::In)
        } else if self.dy > 0.0 {
            Some(Zoom::Out)
        } else {
            None
        }
    }
}

/// Cursor affordance requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Auto,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Pan gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for a middle-button press.
    #[default]
    Idle,
    /// The user is panning the map with the middle button held.
    Dragging {
        /// Screen position of the press that started the gesture.
        start_screen: Point,
        /// Camera offset at the moment of the press.
        start_offset: Point,
    },
}

impl DragState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
