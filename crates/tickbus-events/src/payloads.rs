//! Event identifiers and the recyclable payload carried alongside them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Integer identifier naming a kind of occurrence.
///
/// Ordering is significant: a dispatch pass invokes listeners in ascending
/// identifier order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Event(pub i32);

impl Event {
    /// Sentinel stored in a payload that is idle in the pool.
    pub const UNSET: Self = Self(i32::MIN);

    /// Raw identifier value.
    #[must_use]
    pub const fn id(self) -> i32 {
        self.0
    }

    /// Whether this is the reset sentinel.
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == i32::MIN
    }
}

impl From<i32> for Event {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque handle to an entity owned by the host's ECS.
///
/// The bus never dereferences it; it is only carried to listeners.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Wrap a raw ECS handle.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw ECS handle.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// Type-erased body value. Cloning aliases the same underlying value.
pub type Body = Arc<dyn Any + Send + Sync>;

/// Recyclable record carried alongside an event occurrence.
///
/// Payloads are owned by the bus from the moment they are passed to an emit
/// call until the dispatch pass that delivered them returns them to the pool.
#[derive(Clone)]
pub struct EventPayload {
    event: Event,
    target: Option<Entity>,
    body: Option<Body>,
}

impl EventPayload {
    /// Fresh payload in its reset state.
    ///
    /// Prefer [`crate::Emitter::acquire`] so the instance is drawn from the pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            event: Event::UNSET,
            target: None,
            body: None,
        }
    }

    /// Event the payload was emitted for, or [`Event::UNSET`] before emission.
    #[must_use]
    pub const fn event(&self) -> Event {
        self.event
    }

    /// Entity the occurrence is addressed to, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Body value, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Borrow the body as a concrete type, returning `None` when the body is
    /// absent or of another type.
    #[must_use]
    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|body| body.downcast_ref::<T>())
    }

    /// Address the payload to an entity.
    pub const fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    /// Replace the body with an already shared value.
    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    /// Store a concrete value as the body.
    pub fn set_value<T: Any + Send + Sync>(&mut self, value: T) {
        self.body = Some(Arc::new(value));
    }

    /// Builder-style variant of [`Self::set_target`].
    #[must_use]
    pub const fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// Builder-style variant of [`Self::set_value`].
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.set_value(value);
        self
    }

    /// Restore sentinel defaults before the instance re-enters the pool.
    pub fn reset(&mut self) {
        self.event = Event::UNSET;
        self.target = None;
        self.body = None;
    }

    /// Whether every field holds its sentinel value.
    #[must_use]
    pub const fn is_reset(&self) -> bool {
        self.event.is_unset() && self.target.is_none() && self.body.is_none()
    }

    pub(crate) const fn stamp(&mut self, event: Event) {
        self.event = event;
    }
}

impl Default for EventPayload {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EventPayload")
            .field("event", &self.event)
            .field("target", &self.target)
            .field("body", &self.body.as_ref().map(|_| ".."))
            .finish()
    }
}
