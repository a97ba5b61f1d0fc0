//! Default values and environment variable names.

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "TICKBUS_CONFIG";
/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "TICKBUS_LOG_LEVEL";
/// Environment variable overriding `logging.format` (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "TICKBUS_LOG_FORMAT";

/// Host loop rate in frames per second.
pub const DEFAULT_FPS: u32 = 60;
/// Largest delta, in seconds, handed to a single `update`.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;
