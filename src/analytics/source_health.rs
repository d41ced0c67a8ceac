//! Per-source health over an analysis window.

use super::breach::count_breaches;
use super::staleness::{hours_since, is_stale};
use super::AnalysisWindow;
use crate::db::{CheckRecord, CheckStatus, SourceMeta};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Derived health snapshot for one source. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceHealth {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub sla_hours: i64,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub hours_since_last: Option<i64>,
    pub last_status: Option<CheckStatus>,
    pub is_stale: bool,
    /// Outcome tallies within the window.
    pub ok_count: usize,
    pub warning_count: usize,
    pub failed_count: usize,
    /// SLA breaches over the full history, not just the window.
    pub breach_count: usize,
    /// Checks within the window.
    pub total_checks: usize,
}

/// Counts of each check outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub ok: usize,
    pub warning: usize,
    pub failed: usize,
}

impl StatusTally {
    pub fn from_checks<'a>(checks: impl IntoIterator<Item = &'a CheckRecord>) -> Self {
        checks
            .into_iter()
            .fold(Self::default(), |tally, check| tally.with(check.status))
    }

    fn with(mut self, status: CheckStatus) -> Self {
        match status {
            CheckStatus::Ok => self.ok += 1,
            CheckStatus::Warning => self.warning += 1,
            CheckStatus::Failed => self.failed += 1,
        }
        self
    }

    pub fn total(&self) -> usize {
        self.ok + self.warning + self.failed
    }
}

/// The most recent check. Equal timestamps are resolved in favour of the later
/// insert (higher id).
pub fn latest_check(history: &[CheckRecord]) -> Option<&CheckRecord> {
    history.iter().max_by_key(|check| (check.checked_at, check.id))
}

impl SourceHealth {
    /// Build health from the source's full history and its in-window subset.
    ///
    /// `history` must be sorted by `(checked_at, id)` ascending.
    pub fn from_history(
        source: &SourceMeta,
        history: &[CheckRecord],
        recent: &[CheckRecord],
        now: DateTime<Utc>,
    ) -> Self {
        let last = latest_check(history);
        let last_checked_at = last.map(|check| check.checked_at);
        let tally = StatusTally::from_checks(recent);
        let timestamps: Vec<DateTime<Utc>> = history.iter().map(|check| check.checked_at).collect();

        Self {
            id: source.id,
            name: source.name.clone(),
            owner: source.owner.clone(),
            sla_hours: source.sla_hours,
            last_checked_at,
            hours_since_last: last_checked_at.map(|at| hours_since(at, now)),
            last_status: last.map(|check| check.status),
            is_stale: is_stale(last_checked_at, source.sla_hours, now),
            ok_count: tally.ok,
            warning_count: tally.warning,
            failed_count: tally.failed,
            breach_count: count_breaches(&timestamps, source.sla_hours),
            total_checks: tally.total(),
        }
    }
}

/// Health for every source, ordered by name.
///
/// Sources missing from `history` are treated as never checked.
pub fn build_source_health(
    sources: &[SourceMeta],
    history: &HashMap<i64, Vec<CheckRecord>>,
    window: &AnalysisWindow,
) -> Vec<SourceHealth> {
    let mut health: Vec<SourceHealth> = sources
        .iter()
        .map(|source| {
            let checks = history.get(&source.id).map(Vec::as_slice).unwrap_or_default();
            SourceHealth::from_history(source, checks, window.recent(checks), window.now)
        })
        .collect();

    health.sort_by(|a, b| a.name.cmp(&b.name));
    health
}
