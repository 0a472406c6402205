//! Input model: pointer buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying the context needed to turn each pointer-move into an
//! incremental pose change. Which element is selected lives beside it in
//! [`crate::engine::EngineCore`] and outlives any single drag.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geom::Point;
use crate::hit::Gesture;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the selected element.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A gesture is being applied to `id`.
    Dragging {
        /// Element being manipulated.
        id: ElementId,
        /// What the pointer deltas do.
        gesture: Gesture,
        /// Viewport-local pointer position at the previous event.
        last_screen: Point,
    },
}

impl InputState {
    /// The active gesture, or `None` while idle.
    #[must_use]
    pub fn gesture(&self) -> Option<Gesture> {
        match self {
            Self::Idle => None,
            Self::Dragging { gesture, .. } => Some(*gesture),
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
