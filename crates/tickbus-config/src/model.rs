//! Serde models for the configuration document.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tickbus_events::{BusSettings, Event, EventNames};
use tickbus_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::defaults::{DEFAULT_FPS, DEFAULT_MAX_DELTA};

/// Root configuration document.
///
/// Every section is optional in the source file; missing sections take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickbusConfig {
    /// Pool sizing and listener failure policy.
    pub bus: BusSettings,
    /// Logger settings.
    pub logging: LoggingSettings,
    /// Host loop timing.
    pub frame: FrameSettings,
    /// Diagnostic names keyed by event id.
    pub event_names: BTreeMap<i32, String>,
}

impl TickbusConfig {
    /// Name table for [`tickbus_events::EventBus::with_settings`].
    #[must_use]
    pub fn names(&self) -> EventNames {
        self.event_names
            .iter()
            .map(|(&id, name)| (Event(id), name.clone()))
            .collect()
    }
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format; inferred from the build profile when absent.
    pub format: Option<LogFormat>,
}

impl LoggingSettings {
    /// Configured format, or the build-profile default.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format.unwrap_or_else(LogFormat::infer)
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Host loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSettings {
    /// Target frames per second.
    pub fps: u32,
    /// Upper bound, in seconds, on the delta passed to one `update`.
    pub max_delta: f32,
}

impl FrameSettings {
    /// Interval between frames.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Clamp a measured delta into `[0, max_delta]`.
    #[must_use]
    pub const fn clamp(&self, delta: f32) -> f32 {
        delta.max(0.0).min(self.max_delta)
    }
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}
