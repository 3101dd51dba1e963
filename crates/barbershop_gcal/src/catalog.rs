// --- File: crates/barbershop_gcal/src/catalog.rs ---
//! The fixed list of daily appointment start times.

use chrono::{Duration, NaiveTime};
use std::collections::HashSet;

/// Daily appointment start times, 09:00 to 19:00 with a lunch break at 13:00.
pub const SLOT_CATALOG: [&str; 10] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
];

/// Every appointment lasts one hour.
pub fn slot_duration() -> Duration {
    Duration::hours(1)
}

/// Formats a time of day the way slots are labelled.
pub fn slot_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses `HH:MM` and returns the time only if it is a catalog slot.
pub fn parse_slot(label: &str) -> Option<NaiveTime> {
    let time = NaiveTime::parse_from_str(label.trim(), "%H:%M").ok()?;
    SLOT_CATALOG
        .contains(&slot_label(time).as_str())
        .then_some(time)
}

/// Catalog minus `occupied`, in catalog order.
pub fn free_slots(occupied: &HashSet<String>) -> Vec<&'static str> {
    SLOT_CATALOG
        .iter()
        .copied()
        .filter(|slot| !occupied.contains(*slot))
        .collect()
}
