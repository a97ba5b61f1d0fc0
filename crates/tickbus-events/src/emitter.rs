//! Producer-facing side of the bus: the live immediate and delayed queues.
//!
//! Every operation here only enqueues. Nothing is delivered until the next
//! [`crate::EventBus::update`] call, including emissions made by listeners
//! while a dispatch pass is running.

use std::sync::Arc;

use tracing::trace;

use crate::payloads::{Body, Entity, Event, EventPayload};
use crate::pool::{PayloadPool, PoolStats};
use crate::topics::EventNames;

/// Event waiting in the immediate queue.
#[derive(Debug)]
pub(crate) struct Queued {
    pub(crate) event: Event,
    pub(crate) payload: EventPayload,
}

/// Countdown entry for an event scheduled with `emit_later`.
#[derive(Debug)]
pub struct DelayedEntry {
    pub(crate) delay: f32,
    pub(crate) elapsed: f32,
    pub(crate) event: Event,
    pub(crate) payload: EventPayload,
}

impl DelayedEntry {
    /// Seconds left before the entry fires.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        (self.delay - self.elapsed).max(0.0)
    }

    /// Update time accumulated since the entry was scheduled.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the accumulated update time has reached the delay.
    pub(crate) const fn is_due(&self) -> bool {
        self.elapsed >= self.delay
    }

    /// Event the entry will dispatch.
    #[must_use]
    pub const fn event(&self) -> Event {
        self.event
    }

    /// Payload that will accompany the event.
    #[must_use]
    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }
}

/// Live queues plus the payload pool they draw from.
#[derive(Debug)]
pub struct Emitter {
    pub(crate) immediate: Vec<Queued>,
    pub(crate) delayed: Vec<DelayedEntry>,
    pub(crate) pool: PayloadPool,
    names: Arc<EventNames>,
}

impl Emitter {
    pub(crate) const fn new(pool: PayloadPool, names: Arc<EventNames>) -> Self {
        Self {
            immediate: Vec::new(),
            delayed: Vec::new(),
            pool,
            names,
        }
    }

    /// Draw a reset payload from the pool so the caller can fill it in before
    /// handing it to one of the `*_payload` emit calls.
    pub fn acquire(&mut self) -> EventPayload {
        self.pool.acquire()
    }

    /// Queue `event` with an empty pooled payload.
    pub fn emit(&mut self, event: Event) {
        let payload = self.pool.acquire();
        self.emit_payload(event, payload);
    }

    /// Queue `event` with a caller-prepared payload.
    pub fn emit_payload(&mut self, event: Event, mut payload: EventPayload) {
        payload.stamp(event);
        trace!(event = %event, name = self.names.name(event), "queued event");
        self.immediate.push(Queued { event, payload });
    }

    /// Queue `event` addressed to `target`.
    pub fn emit_to(&mut self, event: Event, target: Entity) {
        let payload = self.pool.acquire();
        self.emit_payload_to(event, target, payload);
    }

    /// Queue `event` with a caller-prepared payload addressed to `target`.
    pub fn emit_payload_to(&mut self, event: Event, target: Entity, mut payload: EventPayload) {
        payload.set_target(Some(target));
        self.emit_payload(event, payload);
    }

    /// Queue one occurrence of `event` per target.
    ///
    /// Each target receives its own payload wrapper; only the body value is
    /// shared between them. The supplied wrapper goes straight back to the
    /// pool.
    pub fn broadcast(&mut self, event: Event, targets: &[Entity], payload: EventPayload) {
        for &target in targets {
            let mut copy = self.pool.acquire();
            copy.set_body(payload.body().cloned());
            self.emit_payload_to(event, target, copy);
        }
        self.pool.release(payload);
    }

    /// Queue `event` with a body produced by `factory`, evaluated immediately.
    pub fn emit_data<F>(&mut self, event: Event, factory: F)
    where
        F: FnOnce() -> Option<Body>,
    {
        let mut payload = self.pool.acquire();
        payload.set_body(factory());
        self.emit_payload(event, payload);
    }

    /// Schedule `event` to fire once `delay` seconds of update time elapsed.
    pub fn emit_later(&mut self, delay: f32, event: Event) {
        let payload = self.pool.acquire();
        self.emit_later_payload(delay, event, payload);
    }

    /// Schedule `event` with a caller-prepared payload.
    ///
    /// A NaN delay is treated as 0 so the entry still fires.
    pub fn emit_later_payload(&mut self, delay: f32, event: Event, mut payload: EventPayload) {
        let delay = if delay.is_nan() { 0.0 } else { delay };
        payload.stamp(event);
        trace!(event = %event, name = self.names.name(event), delay, "scheduled event");
        self.delayed.push(DelayedEntry {
            delay,
            elapsed: 0.0,
            event,
            payload,
        });
    }

    /// Schedule `event` addressed to `target`.
    pub fn emit_later_to(&mut self, delay: f32, event: Event, target: Entity) {
        let payload = self.pool.acquire();
        self.emit_later_payload_to(delay, event, target, payload);
    }

    /// Schedule `event` with a caller-prepared payload addressed to `target`.
    pub fn emit_later_payload_to(
        &mut self,
        delay: f32,
        event: Event,
        target: Entity,
        mut payload: EventPayload,
    ) {
        payload.set_target(Some(target));
        self.emit_later_payload(delay, event, payload);
    }

    /// Number of events waiting for the next dispatch pass.
    #[must_use]
    pub const fn pending_immediate(&self) -> usize {
        self.immediate.len()
    }

    /// Number of scheduled events whose countdown has not fired yet.
    #[must_use]
    pub const fn pending_delayed(&self) -> usize {
        self.delayed.len()
    }

    /// Scheduled entries in scheduling order.
    pub fn scheduled(&self) -> impl Iterator<Item = &DelayedEntry> {
        self.delayed.iter()
    }

    /// Payload pool counters.
    #[must_use]
    pub const fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Diagnostic names shared with the dispatcher.
    #[must_use]
    pub fn names(&self) -> &EventNames {
        &self.names
    }
}
