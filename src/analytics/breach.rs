//! SLA breach counting over a check history.

use super::staleness::sla_window;
use chrono::{DateTime, Utc};

/// Count the gaps between consecutive checks that exceed the SLA.
///
/// `ordered_checks` must already be sorted ascending; this function does not
/// sort. A gap exactly equal to the SLA is not a breach. Out-of-order input is
/// not rejected: a backward step is a negative gap and never counts.
pub fn count_breaches(ordered_checks: &[DateTime<Utc>], sla_hours: i64) -> usize {
    let allowed = sla_window(sla_hours);
    ordered_checks
        .windows(2)
        .filter(|pair| pair[1].signed_duration_since(pair[0]) > allowed)
        .count()
}
