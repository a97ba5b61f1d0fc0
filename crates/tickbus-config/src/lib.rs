#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Configuration for processes hosting a tickbus event bus.
//!
//! Layout: `model.rs` (serde models), `defaults.rs` (default values and
//! environment variable names), `loader.rs` (file and environment loading),
//! `validate.rs` (checks applied after loading), `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, EnvOverrides, load_config, load_from_env, load_with, parse_config};
pub use model::{FrameSettings, LoggingSettings, TickbusConfig};
pub use validate::validate;
