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
#![allow(clippy::module_name_repetitions)]

//! Frame-driven event bus for real-time update loops.
//!
//! Producers enqueue events (immediately or after a countdown) through the
//! [`Emitter`]; the owning loop calls [`EventBus::update`] once per frame,
//! which delivers a sorted snapshot of the ready events to the registered
//! listeners and recycles their payloads into a pool.
//!
//! Layout: `payloads.rs` (ids, entities, payloads), `pool.rs` (payload
//! recycling), `emitter.rs` (live queues), `registry.rs` (listeners),
//! `routing.rs` (dispatcher), `topics.rs` (diagnostic names), `error.rs`.

pub mod emitter;
pub mod error;
pub mod payloads;
pub mod pool;
pub mod registry;
pub mod routing;
pub mod topics;

pub use emitter::{DelayedEntry, Emitter};
pub use error::{EventBusError, EventBusResult, ListenerError, ListenerResult};
pub use payloads::{Body, Entity, Event, EventPayload};
pub use pool::{PayloadPool, PoolSettings, PoolStats};
pub use registry::{EventListener, ListenerHandle, ListenerRegistry, Listeners};
pub use routing::{BusSettings, DispatchReport, EventBus, FailurePolicy};
pub use topics::{EventNames, UNKNOWN_EVENT_NAME};
