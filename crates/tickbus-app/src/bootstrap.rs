//! Host wiring: configuration, logging, metrics, bus and scene.

use clap::Parser;
use tickbus_config::{EnvOverrides, TickbusConfig, load_with};
use tickbus_events::{EventBus, EventNames};
use tickbus_telemetry::{
    GlobalContextGuard, LoggingConfig, Metrics, MetricsSnapshot, init_logging,
};
use tracing::info;

use crate::cli::Cli;
use crate::demo::{self, Scene, SceneStats};
use crate::error::{AppError, AppResult};
use crate::frame::FrameLoop;
use crate::script::InputScript;

/// Everything the demo run needs, resolved before logging starts.
pub struct BootstrapDependencies {
    /// Validated configuration.
    pub config: TickbusConfig,
    /// Collectors fed by the frame loop.
    pub metrics: Metrics,
    /// Input replayed into the bus.
    pub script: InputScript,
    /// Frames to run.
    pub frames: u64,
    /// Render the Prometheus exposition at the end of the run.
    pub print_metrics: bool,
}

impl BootstrapDependencies {
    /// Resolve configuration from the CLI and the `TICKBUS_*` environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] or [`AppError::Telemetry`] when the
    /// configuration or the metrics registry cannot be built.
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let mut overrides = EnvOverrides::from_env();
        if let Some(path) = &cli.config {
            overrides.config_path = Some(path.clone());
        }
        let config = load_with(&overrides).map_err(|err| AppError::config("config.load", err))?;
        let metrics =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self {
            config,
            metrics,
            script: InputScript::demo(),
            frames: cli.frames,
            print_metrics: cli.print_metrics,
        })
    }
}

/// Outcome of a demo run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames stepped.
    pub frames: u64,
    /// Scene counters at the end of the run.
    pub scene: SceneStats,
    /// Collector values at the end of the run.
    pub metrics: MetricsSnapshot,
    /// Prometheus exposition, when requested.
    pub exposition: Option<String>,
}

/// Entry point for the demo binary.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, or a dispatch pass
/// fails.
pub async fn run_app() -> AppResult<()> {
    let cli = Cli::parse();
    let dependencies = BootstrapDependencies::from_cli(&cli)?;
    let logging = LoggingConfig {
        level: &dependencies.config.logging.level,
        format: dependencies.config.logging.format(),
        build_sha: option_env!("TICKBUS_BUILD_SHA").unwrap_or("dev"),
    };
    init_logging(&logging).map_err(|err| AppError::telemetry("telemetry.init", err))?;

    let summary = run_app_with(dependencies).await?;
    if let Some(exposition) = summary.exposition {
        print!("{exposition}");
    }
    Ok(())
}

/// Run the demo scene with injected dependencies.
///
/// # Errors
///
/// Returns [`AppError::Bus`] if a pass is aborted, or
/// [`AppError::Telemetry`] if the exposition cannot be rendered.
pub async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<RunSummary> {
    let _context = GlobalContextGuard::new("demo");
    let BootstrapDependencies {
        config,
        metrics,
        script,
        frames,
        print_metrics,
    } = dependencies;

    info!(
        frames,
        fps = config.frame.fps,
        policy = ?config.bus.failure_policy,
        "tickbus demo starting"
    );

    let mut bus = EventBus::with_settings(config.bus, scene_names(&config));
    let scene = Scene::new();
    bus.registers(scene.listeners());

    let mut frame_loop = FrameLoop::new(bus, script, metrics.clone(), config.frame);
    frame_loop.run(frames).await?;

    let stats = scene.stats();
    info!(
        hits = stats.hits,
        respawns = stats.respawns,
        waves = stats.waves.len(),
        pending_delayed = frame_loop.bus().pending_delayed(),
        "tickbus demo finished"
    );

    let exposition = if print_metrics {
        Some(
            metrics
                .render()
                .map_err(|err| AppError::telemetry("telemetry.render", err))?,
        )
    } else {
        None
    };

    Ok(RunSummary {
        frames: frame_loop.frame(),
        scene: stats,
        metrics: metrics.snapshot(),
        exposition,
    })
}

/// Scene defaults overlaid with the configured names.
fn scene_names(config: &TickbusConfig) -> EventNames {
    let mut names: EventNames = demo::NAMES.into_iter().collect();
    names.overlay(config.names());
    names
}
