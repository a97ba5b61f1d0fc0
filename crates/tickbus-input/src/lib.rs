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

//! Raw input to bus event translation.
//!
//! The host's windowing layer hands every key and pointer callback to an
//! [`InputTranslator`], which turns them into reserved bus events. Reserved
//! ids are negative so they are delivered ahead of application events in
//! the same dispatch pass.

pub mod codes;
pub mod translator;

pub use codes::{InputEvent, KEY_DOWN, KEY_UP, KeyCode, Point, SLIDE, Slide, TOUCHED};
pub use translator::InputTranslator;
