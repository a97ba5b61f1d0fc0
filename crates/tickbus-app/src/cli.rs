//! Command-line arguments for the demo host.

use std::path::PathBuf;

use clap::Parser;
use tickbus_config::defaults::CONFIG_PATH_ENV;

/// Frames run when `--frames` is not given.
pub const DEFAULT_FRAMES: u64 = 120;

/// Drive the demo scene through a fixed number of frames.
#[derive(Debug, Clone, Parser)]
#[command(name = "tickbus", version, about)]
pub struct Cli {
    /// YAML or JSON configuration file.
    #[arg(long, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,
    /// Number of frames to run before exiting.
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    pub frames: u64,
    /// Print the Prometheus exposition of the run's metrics on exit.
    #[arg(long)]
    pub print_metrics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "tickbus",
            "--config",
            "bus.yaml",
            "--frames",
            "10",
            "--print-metrics",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("bus.yaml")));
        assert_eq!(cli.frames, 10);
        assert!(cli.print_metrics);
    }
}
