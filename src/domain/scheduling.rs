//! Time-slot arithmetic for appointment scheduling
//!
//! An appointment occupies a half-open interval `[start, end)` where the end
//! is always derived from the start plus the durations of the booked
//! activities. Callers never supply an end time directly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open booking interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Derive the slot covered by an appointment starting at `start`:
    /// the end is the start plus the sum of all activity durations,
    /// summed without intermediate rounding.
    ///
    /// An empty duration list yields `end == start`. Such a zero-width slot
    /// overlaps nothing; the API layer rejects appointments without
    /// activities so it never reaches the store.
    pub fn from_start(start: DateTime<Utc>, durations: impl IntoIterator<Item = Duration>) -> Self {
        let total = durations
            .into_iter()
            .fold(Duration::zero(), |acc, d| acc + d);
        Self {
            start,
            end: start + total,
        }
    }

    /// Two slots overlap when each starts before the other ends.
    /// Touching endpoints (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ── Tests ──────────────────────────────────────────────────────
