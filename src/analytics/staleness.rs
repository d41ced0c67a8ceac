//! Staleness predicate and SLA arithmetic.

use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// The SLA as a duration. Saturates rather than overflowing.
pub fn sla_window(sla_hours: i64) -> ChronoDuration {
    ChronoDuration::try_hours(sla_hours).unwrap_or(if sla_hours < 0 {
        ChronoDuration::MIN
    } else {
        ChronoDuration::MAX
    })
}

/// Whether a source is stale as of `now`.
///
/// A source that has never been checked is always stale. Otherwise it is stale
/// only when its last check is *strictly* more than `sla_hours` old, so a check
/// exactly `sla_hours` ago still counts as fresh.
pub fn is_stale(last_checked_at: Option<DateTime<Utc>>, sla_hours: i64, now: DateTime<Utc>) -> bool {
    match last_checked_at {
        None => true,
        Some(last) => now.signed_duration_since(last) > sla_window(sla_hours),
    }
}

/// Whole hours elapsed since `last`, rounded down.
pub fn hours_since(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now.signed_duration_since(last);
    let hours = elapsed.num_hours();
    if elapsed < ChronoDuration::zero() && elapsed != ChronoDuration::hours(hours) {
        hours - 1
    } else {
        hours
    }
}

/// When the next check is due, or `None` if the source was never checked.
pub fn next_due_at(last_checked_at: Option<DateTime<Utc>>, sla_hours: i64) -> Option<DateTime<Utc>> {
    last_checked_at.and_then(|last| last.checked_add_signed(sla_window(sla_hours)))
}
