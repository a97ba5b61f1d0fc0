//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a tickbus configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration file")]
    Io {
        /// Loader step, e.g. `config.read`.
        operation: &'static str,
        /// File that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// File extension did not map to a known format.
    #[error("unsupported configuration format")]
    UnsupportedFormat {
        /// Offending file path.
        path: PathBuf,
    },
    /// YAML document could not be deserialised.
    #[error("invalid YAML configuration")]
    Yaml {
        /// Source file, when the document came from disk.
        path: Option<PathBuf>,
        /// Source parser error.
        source: serde_yaml::Error,
    },
    /// JSON document could not be deserialised.
    #[error("invalid JSON configuration")]
    Json {
        /// Source file, when the document came from disk.
        path: Option<PathBuf>,
        /// Source parser error.
        source: serde_json::Error,
    },
    /// A field failed validation.
    #[error("invalid configuration field")]
    InvalidField {
        /// Config section, e.g. `frame`.
        section: &'static str,
        /// Field name within the section.
        field: String,
        /// Rejected value, rendered.
        value: Option<String>,
        /// Short reason code.
        reason: &'static str,
    },
    /// Environment override held an unusable value.
    #[error("invalid environment override")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value read from the environment.
        value: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid_field(
        section: &'static str,
        field: impl Into<String>,
        value: Option<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            section,
            field: field.into(),
            value,
            reason,
        }
    }
}

/// Result alias for loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
