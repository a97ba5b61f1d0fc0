//! Human-readable event names used only in diagnostics.

use std::collections::HashMap;

use crate::payloads::Event;

/// Placeholder rendered for identifiers missing from the mapping.
pub const UNKNOWN_EVENT_NAME: &str = "unknown";

/// Optional `event id -> name` mapping supplied at construction.
///
/// Lookups never influence dispatch; an incomplete or empty mapping only
/// changes what appears in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventNames {
    names: HashMap<Event, String>,
}

impl EventNames {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the name for `event`.
    pub fn insert(&mut self, event: Event, name: impl Into<String>) {
        self.names.insert(event, name.into());
    }

    /// Copy every name from `other`, replacing existing ones.
    pub fn overlay(&mut self, other: Self) {
        self.names.extend(other.names);
    }

    /// Name for `event`, or [`UNKNOWN_EVENT_NAME`].
    #[must_use]
    pub fn name(&self, event: Event) -> &str {
        self.names.get(&event).map_or(UNKNOWN_EVENT_NAME, String::as_str)
    }

    /// Number of named events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no event is named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(Event, N)> for EventNames {
    fn from_iter<I: IntoIterator<Item = (Event, N)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(event, name)| (event, name.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_falls_back_to_placeholder() {
        let names: EventNames = [(Event(1), "a")].into_iter().collect();
        assert_eq!(names.name(Event(1)), "a");
        assert_eq!(names.name(Event(2)), UNKNOWN_EVENT_NAME);
    }

    #[test]
    fn insert_replaces_existing_name() {
        let mut names = EventNames::new();
        assert!(names.is_empty());
        names.insert(Event(4), "first");
        names.insert(Event(4), "second");
        assert_eq!(names.len(), 1);
        assert_eq!(names.name(Event(4)), "second");
    }

    #[test]
    fn overlay_replaces_and_adds_names() {
        let mut names: EventNames = [(Event(1), "hit"), (Event(2), "respawn")].into_iter().collect();
        names.overlay([(Event(1), "ouch"), (Event(9), "extra")].into_iter().collect());
        assert_eq!(names.name(Event(1)), "ouch");
        assert_eq!(names.name(Event(2)), "respawn");
        assert_eq!(names.name(Event(9)), "extra");
        assert_eq!(names.len(), 3);
    }
}
