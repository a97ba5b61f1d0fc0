//! Reserved input event ids, raw input records and the bodies emitted for
//! them.

use serde::{Deserialize, Serialize};
use tickbus_events::Event;

/// A key was pressed. Body: [`KeyCode`].
pub const KEY_DOWN: Event = Event(-4);
/// A key was released. Body: [`KeyCode`].
pub const KEY_UP: Event = Event(-3);
/// A pointer was pressed. Body: [`Point`] of the press.
pub const TOUCHED: Event = Event(-2);
/// A pointer was released. Body: [`Slide`] from press to release.
pub const SLIDE: Event = Event(-1);

/// Platform key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub i32);

/// Screen-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Build a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Press-to-release gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Last known press position.
    pub from: Point,
    /// Release position.
    pub to: Point,
}

impl Slide {
    /// Displacement from press to release.
    #[must_use]
    pub fn delta(&self) -> Point {
        Point::new(self.to.x - self.from.x, self.to.y - self.from.y)
    }
}

/// Raw callback from the host's input layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Key pressed.
    KeyDown {
        /// Platform key code.
        keycode: i32,
    },
    /// Key released.
    KeyUp {
        /// Platform key code.
        keycode: i32,
    },
    /// Pointer pressed.
    PointerDown {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
        /// Pointer index (finger or mouse).
        pointer: u32,
        /// Mouse button.
        button: u32,
    },
    /// Pointer moved while pressed.
    PointerDragged {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
        /// Pointer index.
        pointer: u32,
    },
    /// Pointer released.
    PointerUp {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
        /// Pointer index.
        pointer: u32,
        /// Mouse button.
        button: u32,
    },
}
