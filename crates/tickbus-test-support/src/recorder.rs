//! Recording listeners.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tickbus_events::{
    Body, Emitter, Entity, Event, EventListener, EventPayload, ListenerHandle, ListenerResult,
};

/// Snapshot of one listener invocation.
#[derive(Clone)]
pub struct Invocation {
    /// Label of the recorder that observed the call.
    pub label: &'static str,
    /// Event passed to the listener.
    pub event: Event,
    /// Event id stamped on the payload.
    pub payload_event: Event,
    /// Target carried by the payload.
    pub target: Option<Entity>,
    /// Body carried by the payload (aliased, not copied).
    pub body: Option<Body>,
}

impl Invocation {
    /// Borrow the recorded body as a concrete type.
    #[must_use]
    pub fn body_as<T: 'static>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|body| body.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Invocation")
            .field("label", &self.label)
            .field("event", &self.event)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Shared, ordered log of invocations across any number of recorders.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Invocation>>>,
}

impl Journal {
    /// Empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends every invocation to this journal under `label`.
    #[must_use]
    pub fn recorder(&self, label: &'static str) -> ListenerHandle {
        Arc::new(Recorder {
            label,
            journal: self.clone(),
        })
    }

    /// Copy of all recorded invocations in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<Invocation> {
        self.lock().clone()
    }

    /// Events in call order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.lock().iter().map(|entry| entry.event).collect()
    }

    /// Recorder labels in call order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.lock().iter().map(|entry| entry.label).collect()
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, invocation: Invocation) {
        self.lock().push(invocation);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Invocation>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Recorder {
    label: &'static str,
    journal: Journal,
}

impl EventListener for Recorder {
    fn on_event(
        &self,
        event: Event,
        payload: &mut EventPayload,
        _emitter: &mut Emitter,
    ) -> ListenerResult {
        self.journal.push(Invocation {
            label: self.label,
            event,
            payload_event: payload.event(),
            target: payload.target(),
            body: payload.body().cloned(),
        });
        Ok(())
    }
}
