//! Canned listeners and name tables.

use std::sync::Arc;

use tickbus_events::{
    Emitter, Event, EventNames, EventPayload, ListenerError, ListenerHandle, ListenerResult,
};

/// Listener that always fails with [`ListenerError::Rejected`].
#[must_use]
pub fn failing_listener(reason: &'static str) -> ListenerHandle {
    Arc::new(
        move |_: Event, _: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
            Err(ListenerError::rejected(reason))
        },
    )
}

/// Listener that emits `follow_up` (carrying the same target) every time it
/// runs.
#[must_use]
pub fn emitting_listener(follow_up: Event) -> ListenerHandle {
    Arc::new(
        move |_: Event, payload: &mut EventPayload, emitter: &mut Emitter| -> ListenerResult {
            match payload.target() {
                Some(target) => emitter.emit_to(follow_up, target),
                None => emitter.emit(follow_up),
            }
            Ok(())
        },
    )
}

/// Build a name table from `(id, name)` pairs.
#[must_use]
pub fn names(pairs: &[(i32, &str)]) -> EventNames {
    pairs
        .iter()
        .map(|&(id, name)| (Event(id), name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_builds_lookup_table() {
        let table = names(&[(1, "a"), (2, "b")]);
        assert_eq!(table.name(Event(2)), "b");
        assert_eq!(table.len(), 2);
    }
}
