//! Fixed-rate host loop driving [`EventBus::update`].
//!
//! # Design
//! - Ticks on a `tokio::time::interval` at the configured rate.
//! - The measured wall-clock delta is clamped to `max_delta` so a stalled
//!   process does not fire every pending timer in one burst.
//! - Scripted input for a frame is translated before that frame's update.

use std::time::Duration;

use tickbus_config::FrameSettings;
use tickbus_events::{DispatchReport, EventBus};
use tickbus_input::InputTranslator;
use tickbus_telemetry::{Metrics, frame_span};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::script::InputScript;

/// Owns the bus and everything that feeds it once per frame.
pub struct FrameLoop {
    bus: EventBus,
    translator: InputTranslator,
    script: InputScript,
    metrics: Metrics,
    settings: FrameSettings,
    frame: u64,
}

impl FrameLoop {
    /// Loop around a fully registered bus.
    #[must_use]
    pub fn new(
        bus: EventBus,
        script: InputScript,
        metrics: Metrics,
        settings: FrameSettings,
    ) -> Self {
        Self {
            bus,
            translator: InputTranslator::new(),
            script,
            metrics,
            settings,
            frame: 0,
        }
    }

    /// Run `frames` frames at the configured rate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Bus`] when a dispatch pass is aborted by a
    /// listener failure.
    pub async fn run(&mut self, frames: u64) -> AppResult<()> {
        let mut ticker = interval(self.settings.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;
        let mut last = Instant::now();

        for _ in 0..frames {
            ticker.tick().await;
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;
            self.step(elapsed)?;
        }
        Ok(())
    }

    /// Advance one frame by `elapsed` wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Bus`] when the pass is aborted.
    pub fn step(&mut self, elapsed: Duration) -> AppResult<DispatchReport> {
        self.frame += 1;
        let delta = self.settings.clamp(elapsed.as_secs_f32());
        let span = frame_span(self.frame, delta);
        let _entered = span.enter();

        for input in self.script.inputs_for(self.frame) {
            if !self.translator.handle(self.bus.emitter(), input) {
                debug!(?input, "input not consumed");
            }
        }

        self.metrics
            .observe_frame_delta(Duration::from_secs_f32(delta));
        match self.bus.update(delta) {
            Ok(report) => {
                self.metrics.observe_frame(&report, &self.bus);
                Ok(report)
            }
            Err(err) => {
                self.metrics.observe_abort(&err, &self.bus);
                warn!(error = %err, event = %err.event(), "frame aborted");
                Err(AppError::bus("frame.update", err))
            }
        }
    }

    /// The driven bus.
    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Frames stepped so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}
