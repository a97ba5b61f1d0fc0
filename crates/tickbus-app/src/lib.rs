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

//! Demo host for the tickbus event bus.
//!
//! Layout: `cli.rs` (arguments), `bootstrap.rs` (configuration, logging and
//! bus wiring), `frame.rs` (fixed-rate update loop), `script.rs` (scripted
//! input), `demo.rs` (scene listeners), `error.rs`.

pub mod bootstrap;
pub mod cli;
pub mod demo;
pub mod error;
pub mod frame;
pub mod script;

pub use bootstrap::{BootstrapDependencies, RunSummary, run_app, run_app_with};
pub use cli::Cli;
pub use error::{AppError, AppResult};
