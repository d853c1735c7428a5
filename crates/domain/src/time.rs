//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `started_at`, sample times, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole seconds elapsed between `since` and `until`, clamped at zero.
#[must_use]
pub fn elapsed_seconds(since: Timestamp, until: Timestamp) -> u64 {
    u64::try_from((until - since).num_seconds()).unwrap_or(0)
}
