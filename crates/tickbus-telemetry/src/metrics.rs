//! Prometheus collectors fed from dispatch passes.
//!
//! # Design
//! - Collector registration stays private; callers only see `observe_*`
//!   helpers, [`Metrics::render`] and [`Metrics::snapshot`].
//! - Counters accumulate across frames while gauges mirror the bus state
//!   after the most recent pass.

use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;
use tickbus_events::{DispatchReport, EventBus, EventBusError};

use crate::error::{CollectorStage, Result, TelemetryError};

const KIND_IMMEDIATE: &str = "immediate";
const KIND_DELAYED: &str = "delayed";

/// Prometheus registry with the bus collectors registered.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    frames_total: IntCounter,
    events_dispatched_total: IntCounterVec,
    listener_invocations_total: IntCounter,
    listener_failures_total: IntCounter,
    dispatch_aborts_total: IntCounter,
    pending_immediate: IntGauge,
    pending_delayed: IntGauge,
    pool_free: IntGauge,
    pool_outstanding: IntGauge,
    frame_delta_ms: IntGauge,
}

/// Point-in-time view of the collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Dispatch passes observed.
    pub frames_total: u64,
    /// Immediate events dispatched.
    pub immediate_dispatched_total: u64,
    /// Delayed events dispatched.
    pub delayed_dispatched_total: u64,
    /// Listener invocations performed.
    pub listener_invocations_total: u64,
    /// Listener failures observed.
    pub listener_failures_total: u64,
    /// Passes stopped by a listener failure.
    pub dispatch_aborts_total: u64,
    /// Immediate queue length after the last pass.
    pub pending_immediate: i64,
    /// Delayed queue length after the last pass.
    pub pending_delayed: i64,
    /// Idle pooled payloads after the last pass.
    pub pool_free: i64,
    /// Payloads held by queues after the last pass.
    pub pool_outstanding: i64,
    /// Most recent frame delta in milliseconds.
    pub frame_delta_ms: i64,
}

impl Metrics {
    /// Build the registry and register every collector.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Collector`] if a collector cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let frames_total = counter("tickbus_frames_total", "Dispatch passes run")?;
        let events_dispatched_total = IntCounterVec::new(
            Opts::new(
                "tickbus_events_dispatched_total",
                "Events taken into a dispatch pass by queue",
            ),
            &["kind"],
        )
        .map_err(|source| TelemetryError::Collector {
            name: "tickbus_events_dispatched_total",
            stage: CollectorStage::Build,
            source,
        })?;
        let listener_invocations_total = counter(
            "tickbus_listener_invocations_total",
            "Listener callbacks invoked",
        )?;
        let listener_failures_total = counter(
            "tickbus_listener_failures_total",
            "Listener callbacks that returned an error",
        )?;
        let dispatch_aborts_total = counter(
            "tickbus_dispatch_aborts_total",
            "Dispatch passes stopped by a listener failure",
        )?;
        let pending_immediate = gauge(
            "tickbus_pending_immediate",
            "Events waiting for the next pass",
        )?;
        let pending_delayed = gauge(
            "tickbus_pending_delayed",
            "Scheduled events still counting down",
        )?;
        let pool_free = gauge("tickbus_pool_free", "Idle payloads in the pool")?;
        let pool_outstanding = gauge(
            "tickbus_pool_outstanding",
            "Payloads held by queued events",
        )?;
        let frame_delta_ms = gauge(
            "tickbus_frame_delta_ms",
            "Clamped delta passed to the last update (ms)",
        )?;

        register(&registry, "tickbus_frames_total", &frames_total)?;
        register(
            &registry,
            "tickbus_events_dispatched_total",
            &events_dispatched_total,
        )?;
        register(
            &registry,
            "tickbus_listener_invocations_total",
            &listener_invocations_total,
        )?;
        register(
            &registry,
            "tickbus_listener_failures_total",
            &listener_failures_total,
        )?;
        register(&registry, "tickbus_dispatch_aborts_total", &dispatch_aborts_total)?;
        register(&registry, "tickbus_pending_immediate", &pending_immediate)?;
        register(&registry, "tickbus_pending_delayed", &pending_delayed)?;
        register(&registry, "tickbus_pool_free", &pool_free)?;
        register(&registry, "tickbus_pool_outstanding", &pool_outstanding)?;
        register(&registry, "tickbus_frame_delta_ms", &frame_delta_ms)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                frames_total,
                events_dispatched_total,
                listener_invocations_total,
                listener_failures_total,
                dispatch_aborts_total,
                pending_immediate,
                pending_delayed,
                pool_free,
                pool_outstanding,
                frame_delta_ms,
            }),
        })
    }

    /// Record a completed pass and the bus state it left behind.
    pub fn observe_frame(&self, report: &DispatchReport, bus: &EventBus) {
        let inner = &self.inner;
        inner.frames_total.inc();
        inner
            .events_dispatched_total
            .with_label_values(&[KIND_IMMEDIATE])
            .inc_by(to_u64(report.immediate));
        inner
            .events_dispatched_total
            .with_label_values(&[KIND_DELAYED])
            .inc_by(to_u64(report.delayed));
        inner
            .listener_invocations_total
            .inc_by(to_u64(report.invocations));
        inner.listener_failures_total.inc_by(to_u64(report.failures));
        self.observe_bus(bus);
    }

    /// Record a pass that a listener failure stopped early, counting what it
    /// delivered before stopping.
    pub fn observe_abort(&self, error: &EventBusError, bus: &EventBus) {
        self.observe_frame(error.report(), bus);
        self.inner.dispatch_aborts_total.inc();
    }

    /// Record the delta handed to the last `update`.
    pub fn observe_frame_delta(&self, delta: Duration) {
        self.inner.frame_delta_ms.set(Self::duration_to_ms(delta));
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Encode`] if encoding fails, or
    /// [`TelemetryError::NotUtf8`] if the buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|source| TelemetryError::Encode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::NotUtf8 { source })
    }

    /// Current values of every collector.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = &self.inner;
        MetricsSnapshot {
            frames_total: inner.frames_total.get(),
            immediate_dispatched_total: inner
                .events_dispatched_total
                .with_label_values(&[KIND_IMMEDIATE])
                .get(),
            delayed_dispatched_total: inner
                .events_dispatched_total
                .with_label_values(&[KIND_DELAYED])
                .get(),
            listener_invocations_total: inner.listener_invocations_total.get(),
            listener_failures_total: inner.listener_failures_total.get(),
            dispatch_aborts_total: inner.dispatch_aborts_total.get(),
            pending_immediate: inner.pending_immediate.get(),
            pending_delayed: inner.pending_delayed.get(),
            pool_free: inner.pool_free.get(),
            pool_outstanding: inner.pool_outstanding.get(),
            frame_delta_ms: inner.frame_delta_ms.get(),
        }
    }

    fn observe_bus(&self, bus: &EventBus) {
        let pool = bus.pool_stats();
        let inner = &self.inner;
        inner.pending_immediate.set(to_i64(bus.pending_immediate()));
        inner.pending_delayed.set(to_i64(bus.pending_delayed()));
        inner.pool_free.set(to_i64(pool.free));
        inner.pool_outstanding.set(to_i64(pool.outstanding));
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }
}

fn counter(name: &'static str, help: &str) -> Result<IntCounter> {
    IntCounter::with_opts(Opts::new(name, help))
        .map_err(|source| TelemetryError::Collector {
            name,
            stage: CollectorStage::Build,
            source,
        })
}

fn gauge(name: &'static str, help: &str) -> Result<IntGauge> {
    IntGauge::with_opts(Opts::new(name, help))
        .map_err(|source| TelemetryError::Collector {
            name,
            stage: CollectorStage::Build,
            source,
        })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Collector {
            name,
            stage: CollectorStage::Register,
            source,
        })
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbus_events::{
        BusSettings, Emitter, Event, EventNames, EventPayload, FailurePolicy, ListenerError,
        ListenerResult,
    };

    #[test]
    fn duration_to_ms_saturates_on_large_values() {
        let duration = Duration::from_secs(u64::MAX / 2);
        assert_eq!(Metrics::duration_to_ms(duration), i64::MAX);
    }

    #[test]
    fn observe_frame_accumulates_counters_and_mirrors_gauges() -> Result<()> {
        let metrics = Metrics::new()?;
        let mut bus = EventBus::new();
        bus.emitter().emit(Event(1));
        bus.emitter().emit_later(1.0, Event(2));
        bus.emitter().emit_later(0.0, Event(3));

        let report = bus.update(0.5).expect("update");
        metrics.observe_frame(&report, &bus);
        metrics.observe_frame_delta(Duration::from_millis(16));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_total, 1);
        assert_eq!(snapshot.immediate_dispatched_total, 1);
        assert_eq!(snapshot.delayed_dispatched_total, 1);
        assert_eq!(snapshot.listener_invocations_total, 0);
        assert_eq!(snapshot.pending_immediate, 0);
        assert_eq!(snapshot.pending_delayed, 1);
        assert_eq!(snapshot.pool_outstanding, 1);
        assert_eq!(snapshot.frame_delta_ms, 16);

        Ok(())
    }

    #[test]
    fn observe_abort_counts_the_partial_pass() -> Result<()> {
        let metrics = Metrics::new()?;
        let mut bus = EventBus::with_settings(
            BusSettings {
                failure_policy: FailurePolicy::Abort,
                ..BusSettings::default()
            },
            EventNames::default(),
        );
        bus.register(
            Arc::new(|_: Event, _: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
                Ok(())
            }),
            &[Event(1)],
        );
        bus.register(
            Arc::new(|_: Event, _: &mut EventPayload, _: &mut Emitter| -> ListenerResult {
                Err(ListenerError::rejected("broken"))
            }),
            &[Event(2)],
        );
        bus.emitter().emit(Event(1));
        bus.emitter().emit(Event(2));
        bus.emitter().emit(Event(3));

        let err = bus.update(0.0).expect_err("abort");
        metrics.observe_abort(&err, &bus);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_total, 1);
        assert_eq!(snapshot.dispatch_aborts_total, 1);
        assert_eq!(snapshot.immediate_dispatched_total, 2);
        assert_eq!(snapshot.listener_invocations_total, 2);
        assert_eq!(snapshot.listener_failures_total, 1);
        assert_eq!(snapshot.pending_immediate, 1);
        Ok(())
    }

    #[test]
    fn render_exposes_collector_names() -> Result<()> {
        let metrics = Metrics::new()?;
        let bus = EventBus::new();
        metrics.observe_frame(&DispatchReport::default(), &bus);

        let rendered = metrics.render()?;
        assert!(rendered.contains("tickbus_frames_total 1"));
        assert!(rendered.contains("tickbus_events_dispatched_total{kind=\"immediate\"} 0"));
        assert!(rendered.contains("tickbus_pool_free"));
        Ok(())
    }

    #[test]
    fn snapshot_serialises_to_json() -> Result<()> {
        let metrics = Metrics::new()?;
        let value = serde_json::to_value(metrics.snapshot()).expect("serialise snapshot");
        assert_eq!(value["frames_total"], 0);
        assert_eq!(value["pool_outstanding"], 0);
        Ok(())
    }
}
