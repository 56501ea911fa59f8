// --- File: crates/atelier_booking/src/slots.rs ---
//! The catalog of bookable time-of-day slots and the availability filter.

use atelier_config::{BookingConfig, DEFAULT_SLOTS};
use std::collections::HashSet;
use tracing::warn;

/// Ordered list of the slots offered on every date.
///
/// Order is the order of configuration and is the order every availability
/// answer uses. Never empty, never holds the same slot twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<String>,
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SlotCatalog {
    /// Builds a catalog from an ordered list. Repeated entries keep their
    /// first position; an empty list yields the default catalog.
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let slots: Vec<String> = slots
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if slots.is_empty() {
            warn!("Empty slot catalog configured, using default slots");
            return Self::default();
        }
        Self { slots }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(&config.slots)
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Catalog slots not present in `booked`, in catalog order.
    ///
    /// Entries of `booked` that are not catalog slots are ignored.
    pub fn available<S: AsRef<str>>(&self, booked: &[S]) -> Vec<String> {
        let booked: HashSet<&str> = booked.iter().map(|s| s.as_ref()).collect();
        self.slots
            .iter()
            .filter(|slot| !booked.contains(slot.as_str()))
            .cloned()
            .collect()
    }
}
