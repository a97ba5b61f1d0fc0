//! Host errors.
//!
//! Every variant names the host step that failed (`step`) and keeps the
//! library error as its source. Messages stay fixed; the step label and
//! source carry the detail.

use thiserror::Error;

use tickbus_config::ConfigError;
use tickbus_events::EventBusError;
use tickbus_telemetry::TelemetryError;

/// Result alias for host operations.
pub type AppResult<T> = Result<T, AppError>;

/// Failure raised by the demo host.
#[derive(Debug, Error)]
pub enum AppError {
    /// Loading or validating the configuration failed.
    #[error("could not load tickbus configuration")]
    Config {
        /// Host step, e.g. `config.load`.
        step: &'static str,
        /// Loader error.
        source: ConfigError,
    },
    /// Installing logging or rendering metrics failed.
    #[error("could not set up telemetry")]
    Telemetry {
        /// Host step, e.g. `telemetry.init`.
        step: &'static str,
        /// Telemetry error.
        source: TelemetryError,
    },
    /// A listener aborted a dispatch pass.
    #[error("frame dispatch aborted")]
    Bus {
        /// Host step, e.g. `frame.update`.
        step: &'static str,
        /// Bus error.
        source: EventBusError,
    },
}

impl AppError {
    pub(crate) const fn config(step: &'static str, source: ConfigError) -> Self {
        Self::Config { step, source }
    }

    pub(crate) const fn telemetry(step: &'static str, source: TelemetryError) -> Self {
        Self::Telemetry { step, source }
    }

    pub(crate) const fn bus(step: &'static str, source: EventBusError) -> Self {
        Self::Bus { step, source }
    }

    /// Label of the host step that failed.
    #[must_use]
    pub const fn step(&self) -> &'static str {
        match self {
            Self::Config { step, .. } | Self::Telemetry { step, .. } | Self::Bus { step, .. } => {
                step
            }
        }
    }
}
