//! Freshness analytics.
//!
//! Everything in here is pure: callers hand in already-fetched sources and
//! check history together with an explicit `now`, and get derived health
//! records back. No I/O, no clock reads.

mod breach;
mod owner_health;
mod reports;
mod source_health;
mod staleness;

pub use breach::*;
pub use owner_health::*;
pub use reports::*;
pub use source_health::*;
pub use staleness::*;

use crate::db::CheckRecord;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Trailing window used to tally recent check outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub days: i64,
    pub now: DateTime<Utc>,
}

impl AnalysisWindow {
    pub fn new(days: i64, now: DateTime<Utc>) -> Self {
        Self { days, now }
    }

    /// Inclusive lower bound of the window.
    pub fn start(&self) -> DateTime<Utc> {
        ChronoDuration::try_days(self.days)
            .and_then(|span| self.now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The part of `history` that falls within `[start, now]`.
    ///
    /// `history` must be sorted by `checked_at` ascending.
    pub fn recent<'a>(&self, history: &'a [CheckRecord]) -> &'a [CheckRecord] {
        let start = self.start();
        let lo = history.partition_point(|c| c.checked_at < start);
        let hi = history.partition_point(|c| c.checked_at <= self.now);
        &history[lo..hi.max(lo)]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::db::{CheckRecord, CheckStatus, SourceMeta};
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn hours(h: i64) -> ChronoDuration {
        ChronoDuration::hours(h)
    }

    pub fn source(id: i64, name: &str, owner: &str, sla_hours: i64) -> SourceMeta {
        SourceMeta {
            id,
            name: name.to_string(),
            owner: owner.to_string(),
            sla_hours,
            notes: None,
        }
    }

    pub fn check(id: i64, source_id: i64, checked_at: DateTime<Utc>, status: CheckStatus) -> CheckRecord {
        CheckRecord {
            id,
            source_id,
            checked_at,
            status,
            details: None,
        }
    }
}
