//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Step of collector setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStage {
    /// Constructing the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: TryInitError,
    },
    /// A Prometheus collector could not be set up.
    Collector {
        /// Metric name.
        name: &'static str,
        /// Failing step.
        stage: CollectorStage,
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The registry could not be encoded.
    Encode {
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The encoded exposition was not UTF-8.
    NotUtf8 {
        /// Underlying conversion error.
        source: FromUtf8Error,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::SubscriberInstall { .. } => "failed to install tracing subscriber",
            Self::Collector {
                stage: CollectorStage::Build,
                ..
            } => "failed to build metrics collector",
            Self::Collector {
                stage: CollectorStage::Register,
                ..
            } => "failed to register metrics collector",
            Self::Encode { .. } => "failed to encode metrics",
            Self::NotUtf8 { .. } => "metrics exposition was not valid utf-8",
        };
        formatter.write_str(message)
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::Collector { source, .. } | Self::Encode { source } => Some(source),
            Self::NotUtf8 { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector(stage: CollectorStage) -> TelemetryError {
        TelemetryError::Collector {
            name: "tickbus_frames_total",
            stage,
            source: PrometheusError::Msg("duplicate".to_string()),
        }
    }

    #[test]
    fn collector_message_names_the_stage() {
        assert_eq!(
            collector(CollectorStage::Build).to_string(),
            "failed to build metrics collector"
        );
        assert_eq!(
            collector(CollectorStage::Register).to_string(),
            "failed to register metrics collector"
        );
        assert!(collector(CollectorStage::Build).source().is_some());
    }

    #[test]
    fn encoding_errors_keep_their_source() {
        let Err(utf8) = String::from_utf8(vec![0xff, 0xfe]) else {
            panic!("bytes are not utf-8");
        };
        let err = TelemetryError::NotUtf8 { source: utf8 };
        assert_eq!(err.to_string(), "metrics exposition was not valid utf-8");
        assert!(err.source().is_some());

        let err = TelemetryError::Encode {
            source: PrometheusError::Msg("encode".to_string()),
        };
        assert_eq!(err.to_string(), "failed to encode metrics");
    }
}
