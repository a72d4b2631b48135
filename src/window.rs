//! Trailing time-window filter.

use chrono::{DateTime, TimeDelta, Utc};

use crate::source::RawEntry;

/// The inclusive lower bound entries are judged against.
///
/// Built once per run from a single `now` sample so every entry of every
/// source is compared with the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: DateTime<Utc>,
}

impl Window {
    /// Window covering `length` up to and including `now`.
    pub fn ending_at(now: DateTime<Utc>, length: TimeDelta) -> Self {
        let start = now.checked_sub_signed(length).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Whether `entry` is recent enough.  Entries with no timestamp never are.
    pub fn contains(&self, entry: &RawEntry) -> bool {
        entry
            .effective_timestamp()
            .is_some_and(|ts| ts >= self.start)
    }

    /// Keep the recent entries, in their original order.
    pub fn filter(&self, entries: Vec<RawEntry>) -> Vec<RawEntry> {
        entries.into_iter().filter(|e| self.contains(e)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
