//! Scripted input replayed by the frame loop in place of a real window.

use tickbus_input::InputEvent;

/// Key that makes the demo player take a hit.
pub const HIT_KEY: i32 = 62;

/// Inputs keyed by the frame (1-based) before whose `update` they are fed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<(u64, InputEvent)>,
}

impl InputScript {
    /// Script from `(frame, input)` steps; order within a frame is kept.
    #[must_use]
    pub fn new(mut steps: Vec<(u64, InputEvent)>) -> Self {
        steps.sort_by_key(|(frame, _)| *frame);
        Self { steps }
    }

    /// A key tap followed by a horizontal swipe, then a second tap.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            (2, InputEvent::KeyDown { keycode: HIT_KEY }),
            (3, InputEvent::KeyUp { keycode: HIT_KEY }),
            (
                5,
                InputEvent::PointerDown {
                    x: 20.0,
                    y: 200.0,
                    pointer: 0,
                    button: 0,
                },
            ),
            (
                6,
                InputEvent::PointerDragged {
                    x: 60.0,
                    y: 200.0,
                    pointer: 0,
                },
            ),
            (
                7,
                InputEvent::PointerUp {
                    x: 240.0,
                    y: 205.0,
                    pointer: 0,
                    button: 0,
                },
            ),
            (40, InputEvent::KeyDown { keycode: HIT_KEY }),
            (41, InputEvent::KeyUp { keycode: HIT_KEY }),
        ])
    }

    /// Inputs scheduled for `frame`.
    pub fn inputs_for(&self, frame: u64) -> impl Iterator<Item = &InputEvent> {
        self.steps
            .iter()
            .skip_while(move |(at, _)| *at < frame)
            .take_while(move |(at, _)| *at == frame)
            .map(|(_, input)| input)
    }

    /// Number of scripted inputs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
