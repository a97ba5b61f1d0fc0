//! Stateful translation of raw input into bus emissions.

use std::collections::HashMap;
use std::sync::Arc;

use tickbus_events::{Body, Emitter, Event};
use tracing::trace;

use crate::codes::{InputEvent, KEY_DOWN, KEY_UP, KeyCode, Point, SLIDE, Slide, TOUCHED};

/// Turns [`InputEvent`]s into reserved bus events.
///
/// Remembers the last press position per pointer so a release can be
/// reported as a [`Slide`].
#[derive(Debug, Default)]
pub struct InputTranslator {
    presses: HashMap<u32, Point>,
}

impl InputTranslator {
    /// Translator with no pointer pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw input.
    ///
    /// Returns `true` when an event was emitted; `false` leaves the input to
    /// whatever other consumer the host chains after the bus.
    pub fn handle(&mut self, emitter: &mut Emitter, input: &InputEvent) -> bool {
        match *input {
            InputEvent::KeyDown { keycode } => {
                emit_key(emitter, KEY_DOWN, keycode);
                true
            }
            InputEvent::KeyUp { keycode } => {
                emit_key(emitter, KEY_UP, keycode);
                true
            }
            InputEvent::PointerDown { x, y, pointer, .. } => {
                let at = Point::new(x, y);
                self.presses.insert(pointer, at);
                trace!(pointer, x, y, "pointer down");
                let payload = emitter.acquire().with_value(at);
                emitter.emit_payload(TOUCHED, payload);
                true
            }
            InputEvent::PointerDragged { x, y, pointer } => {
                if let Some(press) = self.presses.get_mut(&pointer) {
                    *press = Point::new(x, y);
                }
                false
            }
            InputEvent::PointerUp { x, y, pointer, .. } => {
                let to = Point::new(x, y);
                let from = self.presses.remove(&pointer).unwrap_or(to);
                trace!(pointer, x, y, "pointer up");
                let payload = emitter.acquire().with_value(Slide { from, to });
                emitter.emit_payload(SLIDE, payload);
                true
            }
        }
    }

    /// Whether `pointer` is currently held down.
    #[must_use]
    pub fn is_pressed(&self, pointer: u32) -> bool {
        self.presses.contains_key(&pointer)
    }

    /// Forget all held pointers, e.g. after the window lost focus.
    pub fn reset(&mut self) {
        self.presses.clear();
    }
}

fn emit_key(emitter: &mut Emitter, event: Event, keycode: i32) {
    trace!(event = %event, keycode, "key");
    emitter.emit_data(event, || Some(Arc::new(KeyCode(keycode)) as Body));
}
