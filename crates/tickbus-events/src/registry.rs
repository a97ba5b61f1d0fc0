//! Listener registry: event id to ordered callbacks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::emitter::Emitter;
use crate::error::{ListenerError, ListenerResult};
use crate::payloads::{Event, EventPayload};

/// Receiver of dispatched occurrences.
///
/// Listeners may mutate the payload they are handed (the next listener for
/// the same occurrence sees the change) and may emit through `emitter`; such
/// emissions are delivered on a later update.
pub trait EventListener: Send + Sync {
    /// Handle one occurrence of `event`.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener could not handle the occurrence; the
    /// bus's failure policy decides what happens next.
    fn on_event(
        &self,
        event: Event,
        payload: &mut EventPayload,
        emitter: &mut Emitter,
    ) -> ListenerResult;
}

impl<F> EventListener for F
where
    F: Fn(Event, &mut EventPayload, &mut Emitter) -> ListenerResult + Send + Sync,
{
    fn on_event(
        &self,
        event: Event,
        payload: &mut EventPayload,
        emitter: &mut Emitter,
    ) -> ListenerResult {
        self(event, payload, emitter)
    }
}

/// Shared handle to a registered listener.
pub type ListenerHandle = Arc<dyn EventListener>;

/// Failure raised by one listener during [`ListenerRegistry::dispatch`].
#[derive(Debug)]
pub(crate) struct ListenerFailure {
    pub(crate) position: usize,
    pub(crate) error: ListenerError,
}

/// Mapping from event id to listeners in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<Event, Vec<ListenerHandle>>,
}

impl ListenerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the sequence of every id in `events`.
    ///
    /// No deduplication: registering a listener twice for one id makes it run
    /// twice per occurrence.
    pub fn register(&mut self, listener: ListenerHandle, events: &[Event]) {
        for &event in events {
            self.listeners
                .entry(event)
                .or_default()
                .push(Arc::clone(&listener));
        }
    }

    /// Number of registrations for `event`.
    #[must_use]
    pub fn listener_count(&self, event: Event) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    /// Whether at least one listener is registered for `event`.
    #[must_use]
    pub fn contains(&self, event: Event) -> bool {
        self.listener_count(event) > 0
    }

    /// Event ids with at least one registration, ascending.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.listeners.keys().copied().collect();
        events.sort_unstable();
        events
    }

    /// Invoke every listener of `event` in registration order.
    ///
    /// With `stop_on_failure` the first failing listener ends the walk.
    /// Returns the number of invocations plus any failures observed.
    pub(crate) fn dispatch(
        &self,
        event: Event,
        payload: &mut EventPayload,
        emitter: &mut Emitter,
        stop_on_failure: bool,
    ) -> (usize, Vec<ListenerFailure>) {
        let Some(listeners) = self.listeners.get(&event) else {
            return (0, Vec::new());
        };

        let mut invoked = 0;
        let mut failures = Vec::new();
        for (position, listener) in listeners.iter().enumerate() {
            invoked += 1;
            if let Err(error) = listener.on_event(event, payload, emitter) {
                failures.push(ListenerFailure { position, error });
                if stop_on_failure {
                    break;
                }
            }
        }
        (invoked, failures)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<Event, usize> = self
            .listeners
            .iter()
            .map(|(event, listeners)| (*event, listeners.len()))
            .collect();
        formatter
            .debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

/// Builder accumulating `(event ids, callback)` pairs for bulk registration.
///
/// Replayed in insertion order by [`crate::EventBus::registers`].
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(Vec<Event>, ListenerHandle)>,
}

impl Listeners {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback for every id in `events`.
    #[must_use]
    pub fn on_events<F>(mut self, events: &[Event], callback: F) -> Self
    where
        F: Fn(Event, &mut EventPayload, &mut Emitter) -> ListenerResult + Send + Sync + 'static,
    {
        self.entries.push((events.to_vec(), Arc::new(callback)));
        self
    }

    /// Add an existing listener handle for every id in `events`.
    #[must_use]
    pub fn on_events_with(mut self, events: &[Event], listener: ListenerHandle) -> Self {
        self.entries.push((events.to_vec(), listener));
        self
    }

    /// Number of accumulated pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair was added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(Vec<Event>, ListenerHandle)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PayloadPool;
    use crate::topics::EventNames;
    use std::sync::Mutex;

    fn emitter() -> Emitter {
        Emitter::new(PayloadPool::default(), Arc::new(EventNames::default()))
    }

    fn tagging(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> ListenerHandle {
        let log = Arc::clone(log);
        Arc::new(move |_: Event, _: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
            log.lock().expect("log mutex").push(tag);
            Ok(())
        })
    }

    #[test]
    fn dispatch_preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.register(tagging(&log, "first"), &[Event(5)]);
        registry.register(tagging(&log, "second"), &[Event(5)]);

        let mut emitter = emitter();
        let mut payload = EventPayload::new();
        let (invoked, failures) = registry.dispatch(Event(5), &mut payload, &mut emitter, false);

        assert_eq!(invoked, 2);
        assert!(failures.is_empty());
        assert_eq!(*log.lock().expect("log mutex"), vec!["first", "second"]);
    }

    #[test]
    fn duplicate_registration_runs_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = tagging(&log, "dup");
        let mut registry = ListenerRegistry::new();
        registry.register(Arc::clone(&listener), &[Event(1)]);
        registry.register(listener, &[Event(1)]);

        let mut emitter = emitter();
        let mut payload = EventPayload::new();
        registry.dispatch(Event(1), &mut payload, &mut emitter, false);
        assert_eq!(log.lock().expect("log mutex").len(), 2);
        assert_eq!(registry.listener_count(Event(1)), 2);
    }

    #[test]
    fn dispatch_without_listeners_is_noop() {
        let registry = ListenerRegistry::new();
        let mut emitter = emitter();
        let mut payload = EventPayload::new();
        let (invoked, failures) = registry.dispatch(Event(3), &mut payload, &mut emitter, true);
        assert_eq!(invoked, 0);
        assert!(failures.is_empty());
        assert!(!registry.contains(Event(3)));
    }

    #[test]
    fn stop_on_failure_skips_remaining_listeners() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.register(
            Arc::new(
                |_: Event, _: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
                    Err(ListenerError::rejected("boom"))
                },
            ),
            &[Event(2)],
        );
        registry.register(tagging(&log, "after"), &[Event(2)]);

        let mut emitter = emitter();
        let mut payload = EventPayload::new();
        let (invoked, failures) = registry.dispatch(Event(2), &mut payload, &mut emitter, true);
        assert_eq!(invoked, 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position, 0);
        assert!(log.lock().expect("log mutex").is_empty());

        let (invoked, failures) = registry.dispatch(Event(2), &mut payload, &mut emitter, false);
        assert_eq!(invoked, 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(*log.lock().expect("log mutex"), vec!["after"]);
    }

    #[test]
    fn builder_keeps_pairs_in_order() {
        let listeners = Listeners::new()
            .on_events(&[Event(1)], |_, _, _| Ok(()))
            .on_events(&[Event(2), Event(3)], |_, _, _| Ok(()));
        assert_eq!(listeners.len(), 2);
        let entries = listeners.into_entries();
        assert_eq!(entries[0].0, vec![Event(1)]);
        assert_eq!(entries[1].0, vec![Event(2), Event(3)]);
    }

    #[test]
    fn events_are_listed_ascending() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.register(tagging(&log, "x"), &[Event(9), Event(-1), Event(4)]);
        assert_eq!(registry.events(), vec![Event(-1), Event(4), Event(9)]);
    }
}
