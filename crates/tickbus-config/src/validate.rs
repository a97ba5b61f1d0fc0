//! Validation and parsing helpers applied after a document is loaded.

use tickbus_telemetry::LogFormat;

use crate::defaults::LOG_FORMAT_ENV;
use crate::error::{ConfigError, ConfigResult};
use crate::model::TickbusConfig;

/// Check cross-field constraints serde cannot express.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] naming the first offending field.
pub fn validate(config: &TickbusConfig) -> ConfigResult<()> {
    let frame = &config.frame;
    if frame.fps == 0 {
        return Err(ConfigError::invalid_field(
            "frame",
            "fps",
            Some(frame.fps.to_string()),
            "must_be_positive",
        ));
    }
    if !frame.max_delta.is_finite() || frame.max_delta <= 0.0 {
        return Err(ConfigError::invalid_field(
            "frame",
            "max_delta",
            Some(frame.max_delta.to_string()),
            "must_be_positive",
        ));
    }

    let pool = &config.bus.pool;
    if pool.max_free < pool.initial_capacity {
        return Err(ConfigError::invalid_field(
            "bus",
            "pool.max_free",
            Some(pool.max_free.to_string()),
            "must_cover_initial_capacity",
        ));
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::invalid_field(
            "logging",
            "level",
            None,
            "must_not_be_empty",
        ));
    }

    if let Some((id, _)) = config
        .event_names
        .iter()
        .find(|(_, name)| name.trim().is_empty())
    {
        return Err(ConfigError::invalid_field(
            "event_names",
            id.to_string(),
            None,
            "must_not_be_empty",
        ));
    }
    Ok(())
}

/// Parse a `TICKBUS_LOG_FORMAT` value.
pub(crate) fn parse_log_format(value: &str) -> ConfigResult<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" => Ok(LogFormat::Pretty),
        _ => Err(ConfigError::InvalidEnv {
            name: LOG_FORMAT_ENV,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbus_events::PoolSettings;

    fn reason(result: ConfigResult<()>) -> Option<(&'static str, String, &'static str)> {
        match result {
            Err(ConfigError::InvalidField {
                section,
                field,
                reason,
                ..
            }) => Some((section, field, reason)),
            _ => None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&TickbusConfig::default()).is_ok());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut config = TickbusConfig::default();
        config.frame.fps = 0;
        assert_eq!(
            reason(validate(&config)),
            Some(("frame", "fps".to_string(), "must_be_positive"))
        );
    }

    #[test]
    fn non_positive_max_delta_is_rejected() {
        let mut config = TickbusConfig::default();
        config.frame.max_delta = f32::NAN;
        assert_eq!(
            reason(validate(&config)),
            Some(("frame", "max_delta".to_string(), "must_be_positive"))
        );
    }

    #[test]
    fn pool_must_hold_its_prefill() {
        let mut config = TickbusConfig::default();
        config.bus.pool = PoolSettings {
            initial_capacity: 10,
            max_free: 2,
        };
        assert_eq!(
            reason(validate(&config)),
            Some(("bus", "pool.max_free".to_string(), "must_cover_initial_capacity"))
        );
    }

    #[test]
    fn blank_names_and_levels_are_rejected() {
        let mut config = TickbusConfig::default();
        config.event_names.insert(7, "  ".to_string());
        assert_eq!(
            reason(validate(&config)),
            Some(("event_names", "7".to_string(), "must_not_be_empty"))
        );

        let mut config = TickbusConfig::default();
        config.logging.level = String::new();
        assert_eq!(
            reason(validate(&config)),
            Some(("logging", "level".to_string(), "must_not_be_empty"))
        );
    }

    #[test]
    fn log_format_parsing_is_case_insensitive() {
        assert!(matches!(parse_log_format("JSON"), Ok(LogFormat::Json)));
        assert!(matches!(parse_log_format(" pretty "), Ok(LogFormat::Pretty)));
        assert!(matches!(
            parse_log_format("xml"),
            Err(ConfigError::InvalidEnv { name: LOG_FORMAT_ENV, .. })
        ));
    }
}
