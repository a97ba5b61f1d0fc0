//! Logging initialisation.
//!
//! # Design
//! - One entry point installs the global subscriber in pretty or JSON form.
//! - `RUST_LOG` takes precedence over the configured level.
//! - The build identifier is recorded once so every span reports the same
//!   value.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

use crate::error::{Result, TelemetryError};

/// Level used when neither `RUST_LOG` nor configuration provide one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::SubscriberInstall`] when a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    // first caller wins; later values are ignored
    let _ = BUILD_SHA.set(config.build_sha.to_string());

    tracing_subscriber::registry()
        .with(level_filter(config.level))
        .with(output_layer(config.format))
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Build identifier recorded by [`init_logging`], or `dev`.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive, e.g. `info` or `tickbus_events=debug`.
    pub level: &'a str,
    /// Output format.
    pub format: LogFormat,
    /// Build identifier attached to the application span.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Structured JSON objects, one per line.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Pretty in debug builds, JSON otherwise.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().compact().with_target(false).boxed(),
    }
}
