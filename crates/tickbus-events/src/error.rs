//! Event bus error primitives.

use thiserror::Error;

use crate::payloads::Event;
use crate::routing::DispatchReport;

/// Error returned by a listener that could not handle an occurrence.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Listener refused the occurrence.
    #[error("listener rejected event")]
    Rejected {
        /// Human-readable explanation supplied by the listener.
        reason: String,
    },
    /// Listener hit an underlying failure.
    #[error("listener failed")]
    Failed {
        /// Source error raised inside the listener.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ListenerError {
    /// Convenience constructor for [`Self::Rejected`].
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Self::Failed`].
    #[must_use]
    pub fn failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed {
            source: source.into(),
        }
    }
}

/// Result returned by listeners.
pub type ListenerResult = Result<(), ListenerError>;

/// Error returned by a dispatch pass.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// A listener failed while the bus runs under the abort policy.
    #[error("dispatch aborted by listener failure")]
    ListenerAborted {
        /// Event whose listener failed.
        event: Event,
        /// Diagnostic name of the event.
        name: String,
        /// Frame number of the aborted pass.
        frame: u64,
        /// Occurrences the pass did not reach, requeued for the next pass.
        requeued: usize,
        /// What the pass delivered before it stopped.
        report: DispatchReport,
        /// Failure reported by the listener.
        source: ListenerError,
    },
}

impl EventBusError {
    /// Event associated with the failure.
    #[must_use]
    pub const fn event(&self) -> Event {
        match self {
            Self::ListenerAborted { event, .. } => *event,
        }
    }

    /// Partial report of the pass that failed.
    #[must_use]
    pub const fn report(&self) -> &DispatchReport {
        match self {
            Self::ListenerAborted { report, .. } => report,
        }
    }
}

/// Result wrapper for dispatch passes.
pub type EventBusResult<T> = Result<T, EventBusError>;
