//! Loading configuration from disk and the process environment.
//!
//! # Design
//! - The file format follows the extension: `.yaml`/`.yml` or `.json`.
//! - Environment reads are gathered into [`EnvOverrides`] once so the
//!   merge logic stays a pure function.
//! - Every load path ends in [`validate`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::defaults::{CONFIG_PATH_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use crate::error::{ConfigError, ConfigResult};
use crate::model::TickbusConfig;
use crate::validate::{parse_log_format, validate};

/// Serialisation formats accepted for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl ConfigFormat {
    /// Pick a format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Deserialise a document without validating it.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] or [`ConfigError::Json`] when the document
/// does not match the schema.
pub fn parse_config(contents: &str, format: ConfigFormat) -> ConfigResult<TickbusConfig> {
    parse_document(contents, format, None)
}

/// Read, parse and validate a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension,
/// fails to parse, or fails validation.
pub fn load_config(path: &Path) -> ConfigResult<TickbusConfig> {
    let format = ConfigFormat::from_path(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "config.read",
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_document(&contents, format, Some(path))?;
    validate(&config)?;
    info!(path = %path.display(), ?format, "configuration loaded");
    Ok(config)
}

/// Values read from `TICKBUS_*` environment variables.
///
/// Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `TICKBUS_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// `TICKBUS_LOG_LEVEL`.
    pub log_level: Option<String>,
    /// `TICKBUS_LOG_FORMAT`.
    pub log_format: Option<String>,
}

impl EnvOverrides {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            config_path: env_value(CONFIG_PATH_ENV).map(PathBuf::from),
            log_level: env_value(LOG_LEVEL_ENV),
            log_format: env_value(LOG_FORMAT_ENV),
        }
    }

    /// Apply the logging overrides on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when the format override is not
    /// `json` or `pretty`.
    pub fn apply(&self, mut config: TickbusConfig) -> ConfigResult<TickbusConfig> {
        if let Some(level) = &self.log_level {
            debug!(env = LOG_LEVEL_ENV, value = %level, "log level overridden");
            config.logging.level.clone_from(level);
        }
        if let Some(format) = &self.log_format {
            config.logging.format = Some(parse_log_format(format)?);
        }
        Ok(config)
    }
}

/// Load from the file named in `overrides` (defaults when absent), then
/// apply the logging overrides and validate the result.
///
/// # Errors
///
/// Propagates file, parse, override and validation failures.
pub fn load_with(overrides: &EnvOverrides) -> ConfigResult<TickbusConfig> {
    let base = match &overrides.config_path {
        Some(path) => load_config(path)?,
        None => {
            debug!("no configuration file supplied; using defaults");
            TickbusConfig::default()
        }
    };
    let config = overrides.apply(base)?;
    validate(&config)?;
    Ok(config)
}

/// [`load_with`] using the current process environment.
///
/// # Errors
///
/// See [`load_with`].
pub fn load_from_env() -> ConfigResult<TickbusConfig> {
    load_with(&EnvOverrides::from_env())
}

fn parse_document(
    contents: &str,
    format: ConfigFormat,
    path: Option<&Path>,
) -> ConfigResult<TickbusConfig> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
            path: path.map(Path::to_path_buf),
            source,
        }),
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|source| ConfigError::Json {
            path: path.map(Path::to_path_buf),
            source,
        }),
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
