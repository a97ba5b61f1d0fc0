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

//! Shared test helpers used across integration suites.
//! Layout: recorder.rs (recording listeners), fixtures.rs (canned listeners and names).

pub mod fixtures;
pub mod recorder;

pub use fixtures::{emitting_listener, failing_listener, names};
pub use recorder::{Invocation, Journal};
