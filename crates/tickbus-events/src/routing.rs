//! Per-frame dispatcher.
//!
//! # Design
//! - Emissions land in the live queues owned by [`Emitter`]; `update` moves
//!   the ready subset into scratch batches before any listener runs, so a
//!   listener emitting mid-pass only ever feeds the next frame.
//! - Batches are stable-sorted by event id, delayed entries run before
//!   immediate ones, and every dispatched payload is recycled once the pass
//!   ends. An aborted pass requeues what it did not reach.
//! - Scratch buffers are kept between frames to avoid per-frame allocation.

use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::emitter::{DelayedEntry, Emitter, Queued};
use crate::error::{EventBusError, EventBusResult, ListenerError};
use crate::payloads::{Event, EventPayload};
use crate::pool::{PayloadPool, PoolSettings, PoolStats};
use crate::registry::{ListenerHandle, ListenerRegistry, Listeners};
use crate::topics::EventNames;

/// What a dispatch pass does when a listener returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and keep dispatching.
    #[default]
    Isolate,
    /// Stop the pass and report the failure from `update`.
    Abort,
}

/// Construction-time settings for an [`EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// Payload pool sizing.
    pub pool: PoolSettings,
    /// Listener failure handling.
    pub failure_policy: FailurePolicy,
}

/// Summary of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DispatchReport {
    /// Sequence number of the pass, starting at 1.
    pub frame: u64,
    /// Delayed entries delivered this pass.
    pub delayed: usize,
    /// Immediate entries delivered this pass.
    pub immediate: usize,
    /// Listener invocations performed.
    pub invocations: usize,
    /// Listener failures observed.
    pub failures: usize,
}

impl DispatchReport {
    /// Total occurrences delivered by the pass.
    #[must_use]
    pub const fn dispatched(&self) -> usize {
        self.delayed + self.immediate
    }
}

/// Frame-driven event bus.
///
/// Producers enqueue through [`Self::emitter`]; the owning loop calls
/// [`Self::update`] once per frame with the elapsed time in seconds.
#[derive(Debug)]
pub struct EventBus {
    emitter: Emitter,
    registry: ListenerRegistry,
    names: Arc<EventNames>,
    failure_policy: FailurePolicy,
    ready: Vec<DelayedEntry>,
    scheduled: Vec<DelayedEntry>,
    batch: Vec<Queued>,
    frame: u64,
}

impl EventBus {
    /// Bus with default settings and no diagnostic names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(BusSettings::default(), EventNames::default())
    }

    /// Bus with default settings and the supplied diagnostic names.
    #[must_use]
    pub fn with_names(names: EventNames) -> Self {
        Self::with_settings(BusSettings::default(), names)
    }

    /// Fully configured bus.
    #[must_use]
    pub fn with_settings(settings: BusSettings, names: EventNames) -> Self {
        let names = Arc::new(names);
        Self {
            emitter: Emitter::new(PayloadPool::new(settings.pool), Arc::clone(&names)),
            registry: ListenerRegistry::new(),
            names,
            failure_policy: settings.failure_policy,
            ready: Vec::new(),
            scheduled: Vec::new(),
            batch: Vec::new(),
            frame: 0,
        }
    }

    /// Producer entry point: emit, broadcast and schedule events.
    pub const fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    /// Append `listener` to every id in `events`.
    pub fn register(&mut self, listener: ListenerHandle, events: &[Event]) {
        self.registry.register(listener, events);
    }

    /// Replay a [`Listeners`] builder through [`Self::register`], pair by pair.
    pub fn registers(&mut self, listeners: Listeners) -> &mut Self {
        for (events, listener) in listeners.into_entries() {
            self.register(listener, &events);
        }
        self
    }

    /// Registered listeners.
    #[must_use]
    pub const fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Diagnostic names.
    #[must_use]
    pub fn names(&self) -> &EventNames {
        &self.names
    }

    /// Active failure policy.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Number of completed `update` calls.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Payload pool counters.
    #[must_use]
    pub const fn pool_stats(&self) -> PoolStats {
        self.emitter.pool_stats()
    }

    /// Events waiting in the live immediate queue.
    #[must_use]
    pub const fn pending_immediate(&self) -> usize {
        self.emitter.pending_immediate()
    }

    /// Scheduled events still counting down.
    #[must_use]
    pub const fn pending_delayed(&self) -> usize {
        self.emitter.pending_delayed()
    }

    /// Drop every queued immediate and delayed entry, recycling their
    /// payloads. Returns how many entries were discarded.
    pub fn clear(&mut self) -> usize {
        let immediate = mem::take(&mut self.emitter.immediate);
        let delayed = mem::take(&mut self.emitter.delayed);
        let discarded = immediate.len() + delayed.len();
        for queued in immediate {
            self.emitter.pool.release(queued.payload);
        }
        for entry in delayed {
            self.emitter.pool.release(entry.payload);
        }
        if discarded > 0 {
            debug!(discarded, "cleared pending events");
        }
        discarded
    }

    /// Run one dispatch pass.
    ///
    /// Ticks the delayed countdowns by `delta` seconds, snapshots the ready
    /// delayed entries and the whole immediate queue, sorts both batches by
    /// event id (stable), delivers delayed first then immediate, and recycles
    /// every delivered payload. A negative or non-finite `delta` counts as 0.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns
    /// [`EventBusError::ListenerAborted`] for the first failing listener.
    /// Later listeners of that occurrence are skipped; the occurrences the
    /// pass never reached are requeued for the next `update`.
    pub fn update(&mut self, delta: f32) -> EventBusResult<DispatchReport> {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.frame += 1;
        let mut report = DispatchReport {
            frame: self.frame,
            ..DispatchReport::default()
        };

        // tick and partition; pending entries go back to the live list
        mem::swap(&mut self.emitter.delayed, &mut self.scheduled);
        for mut entry in self.scheduled.drain(..) {
            entry.elapsed += delta;
            if entry.is_due() {
                self.ready.push(entry);
            } else {
                self.emitter.delayed.push(entry);
            }
        }

        // snapshot the immediate queue; the live queue is now empty
        mem::swap(&mut self.emitter.immediate, &mut self.batch);

        self.ready.sort_by_key(|entry| entry.event);
        self.batch.sort_by_key(|queued| queued.event);

        if !self.ready.is_empty() || !self.batch.is_empty() {
            trace!(
                frame = self.frame,
                delayed = self.ready.len(),
                immediate = self.batch.len(),
                "dispatch pass"
            );
        }

        let stop_on_failure = self.failure_policy == FailurePolicy::Abort;
        let mut abort: Option<(Event, ListenerError)> = None;
        let mut delivered = 0;

        let delayed = self.ready.iter_mut().map(|entry| (entry.event, &mut entry.payload));
        let immediate = self
            .batch
            .iter_mut()
            .map(|queued| (queued.event, &mut queued.payload));
        for (event, payload) in delayed.chain(immediate) {
            let outcome = deliver(
                &self.registry,
                &self.names,
                &mut self.emitter,
                event,
                payload,
                stop_on_failure,
            );
            delivered += 1;
            report.invocations += outcome.invocations;
            report.failures += outcome.failures;
            if let Some(error) = outcome.abort {
                abort = Some((event, error));
                break;
            }
        }

        report.delayed = delivered.min(self.ready.len());
        report.immediate = delivered - report.delayed;
        let requeued = self.requeue_undelivered(report.delayed, report.immediate);

        for entry in self.ready.drain(..) {
            self.emitter.pool.release(entry.payload);
        }
        for queued in self.batch.drain(..) {
            self.emitter.pool.release(queued.payload);
        }

        match abort {
            Some((event, source)) => {
                warn!(
                    frame = self.frame,
                    event = %event,
                    name = self.names.name(event),
                    requeued,
                    "dispatch pass aborted"
                );
                Err(EventBusError::ListenerAborted {
                    event,
                    name: self.names.name(event).to_string(),
                    frame: self.frame,
                    requeued,
                    report,
                    source,
                })
            }
            None => Ok(report),
        }
    }

    /// Put the entries an aborted pass never reached back at the head of the
    /// live queues, in dispatch order. Due delayed entries stay due, so they
    /// fire on the next pass ahead of anything scheduled since.
    fn requeue_undelivered(&mut self, delayed: usize, immediate: usize) -> usize {
        let mut requeued = 0;
        if delayed < self.ready.len() {
            let mut tail: Vec<DelayedEntry> = self.ready.drain(delayed..).collect();
            requeued += tail.len();
            tail.append(&mut self.emitter.delayed);
            self.emitter.delayed = tail;
        }
        if immediate < self.batch.len() {
            let mut tail: Vec<Queued> = self.batch.drain(immediate..).collect();
            requeued += tail.len();
            tail.append(&mut self.emitter.immediate);
            self.emitter.immediate = tail;
        }
        requeued
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

struct Delivery {
    invocations: usize,
    failures: usize,
    abort: Option<ListenerError>,
}

fn deliver(
    registry: &ListenerRegistry,
    names: &EventNames,
    emitter: &mut Emitter,
    event: Event,
    payload: &mut EventPayload,
    stop_on_failure: bool,
) -> Delivery {
    debug!(event = %event, name = names.name(event), "emit");
    let (invocations, failures) = registry.dispatch(event, payload, emitter, stop_on_failure);
    let failed = failures.len();
    let mut abort = None;
    for failure in failures {
        warn!(
            event = %event,
            name = names.name(event),
            listener = failure.position,
            error = %failure.error,
            "listener failed"
        );
        if stop_on_failure {
            abort = Some(failure.error);
        }
    }
    Delivery {
        invocations,
        failures: failed,
        abort,
    }
}
