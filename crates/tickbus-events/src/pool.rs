//! Recyclable payload storage.
//!
//! # Design
//! - Released payloads are reset and kept for reuse so steady-state frames do
//!   not allocate payload wrappers.
//! - Idle instances beyond `max_free` are dropped instead of retained.

use serde::{Deserialize, Serialize};

use crate::payloads::EventPayload;

/// Default number of payloads allocated up front.
pub const DEFAULT_POOL_CAPACITY: usize = 64;
/// Default ceiling on idle payloads retained by the pool.
pub const DEFAULT_POOL_MAX_FREE: usize = 4_096;

/// Sizing knobs for the payload pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Payloads allocated when the pool is constructed.
    pub initial_capacity: usize,
    /// Maximum number of idle payloads kept for reuse.
    pub max_free: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_POOL_CAPACITY,
            max_free: DEFAULT_POOL_MAX_FREE,
        }
    }
}

/// Point-in-time counters describing pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolStats {
    /// Payload instances constructed over the pool's lifetime.
    pub allocated: usize,
    /// Idle payloads ready for reuse.
    pub free: usize,
    /// Payloads handed out and not yet released.
    pub outstanding: usize,
    /// Highest idle count observed.
    pub peak_free: usize,
}

/// Pool of reset [`EventPayload`] instances.
#[derive(Debug)]
pub struct PayloadPool {
    free: Vec<EventPayload>,
    max_free: usize,
    allocated: usize,
    outstanding: usize,
    peak_free: usize,
}

impl PayloadPool {
    /// Build a pool, pre-allocating `initial_capacity` payloads.
    #[must_use]
    pub fn new(settings: PoolSettings) -> Self {
        let prefill = settings.initial_capacity.min(settings.max_free);
        let free: Vec<EventPayload> = (0..prefill).map(|_| EventPayload::new()).collect();
        Self {
            max_free: settings.max_free,
            allocated: free.len(),
            outstanding: 0,
            peak_free: free.len(),
            free,
        }
    }

    /// Hand out a reset payload, reusing an idle one when available.
    pub fn acquire(&mut self) -> EventPayload {
        self.outstanding += 1;
        if let Some(payload) = self.free.pop() {
            return payload;
        }
        self.allocated += 1;
        EventPayload::new()
    }

    /// Reset a payload and return it to the pool.
    ///
    /// Payloads not obtained from [`Self::acquire`] are accepted too; they are
    /// simply adopted by the pool.
    pub fn release(&mut self, mut payload: EventPayload) {
        payload.reset();
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.free.len() < self.max_free {
            self.free.push(payload);
            self.peak_free = self.peak_free.max(self.free.len());
        }
    }

    /// Current usage counters.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated,
            free: self.free.len(),
            outstanding: self.outstanding,
            peak_free: self.peak_free,
        }
    }
}

impl Default for PayloadPool {
    fn default() -> Self {
        Self::new(PoolSettings::default())
    }
}
