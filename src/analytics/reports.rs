//! Condensed views built on top of source health: stale listing, window
//! summary and the per-source rollup.

use super::owner_health::same_owner;
use super::source_health::{latest_check, SourceHealth};
use super::staleness::{is_stale, next_due_at};
use crate::db::{CheckRecord, CheckStatus, SourceMeta};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A source that has missed its SLA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleSource {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub sla_hours: i64,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl From<&SourceHealth> for StaleSource {
    fn from(health: &SourceHealth) -> Self {
        Self {
            id: health.id,
            name: health.name.clone(),
            owner: health.owner.clone(),
            sla_hours: health.sla_hours,
            last_checked_at: health.last_checked_at,
        }
    }
}

/// Stale sources, in the order given.
pub fn stale_sources(health: &[SourceHealth]) -> Vec<StaleSource> {
    health
        .iter()
        .filter(|source| source.is_stale)
        .map(StaleSource::from)
        .collect()
}

/// Window-wide outcome totals plus the current stale list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub days: i64,
    pub ok_count: usize,
    pub warning_count: usize,
    pub failed_count: usize,
    pub stale_sources: Vec<StaleSource>,
}

impl SummaryReport {
    pub fn from_health(days: i64, health: &[SourceHealth]) -> Self {
        Self {
            days,
            ok_count: health.iter().map(|source| source.ok_count).sum(),
            warning_count: health.iter().map(|source| source.warning_count).sum(),
            failed_count: health.iter().map(|source| source.failed_count).sum(),
            stale_sources: stale_sources(health),
        }
    }
}

/// Latest check for a source and when the next one is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRollup {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub sla_hours: i64,
    pub last_status: Option<CheckStatus>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_details: Option<String>,
    pub is_stale: bool,
    pub next_due_at: Option<DateTime<Utc>>,
}

/// One rollup per source, ordered by name.
pub fn build_rollups(
    sources: &[SourceMeta],
    history: &HashMap<i64, Vec<CheckRecord>>,
    now: DateTime<Utc>,
) -> Vec<SourceRollup> {
    let mut rollups: Vec<SourceRollup> = sources
        .iter()
        .map(|source| {
            let last = history
                .get(&source.id)
                .and_then(|checks| latest_check(checks));
            let last_checked_at = last.map(|check| check.checked_at);

            SourceRollup {
                id: source.id,
                name: source.name.clone(),
                owner: source.owner.clone(),
                sla_hours: source.sla_hours,
                last_status: last.map(|check| check.status),
                last_checked_at,
                last_details: last.and_then(|check| check.details.clone()),
                is_stale: is_stale(last_checked_at, source.sla_hours, now),
                next_due_at: next_due_at(last_checked_at, source.sla_hours),
            }
        })
        .collect();

    rollups.sort_by(|a, b| a.name.cmp(&b.name));
    rollups
}

/// Keep only rollups whose owner matches `owner`, ignoring case.
pub fn filter_by_owner(rollups: Vec<SourceRollup>, owner: &str) -> Vec<SourceRollup> {
    rollups
        .into_iter()
        .filter(|rollup| same_owner(&rollup.owner, owner))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::*;
    use crate::analytics::{build_source_health, AnalysisWindow};

    fn sample() -> (Vec<SourceMeta>, HashMap<i64, Vec<CheckRecord>>) {
        let sources = vec![
            source(1, "Award Disbursement Feed", "Finance", 12),
            source(2, "Mentor Availability Sheet", "Mentor Lead", 72),
            source(3, "Scholar Application Export", "scholar ops", 24),
        ];
        let mut history = HashMap::new();
        history.insert(
            1,
            vec![
                check(1, 1, t0() - hours(20), CheckStatus::Ok),
                CheckRecord {
                    details: Some("No feed received".to_string()),
                    ..check(2, 1, t0() - hours(13), CheckStatus::Failed)
                },
            ],
        );
        history.insert(2, vec![check(3, 2, t0() - hours(1), CheckStatus::Warning)]);
        (sources, history)
    }

    #[test]
    fn test_summary_and_stale_list() {
        let (sources, history) = sample();
        let health = build_source_health(&sources, &history, &AnalysisWindow::new(7, t0()));

        let report = SummaryReport::from_health(7, &health);
        assert_eq!(report.days, 7);
        assert_eq!(report.ok_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.failed_count, 1);

        let stale: Vec<_> = report.stale_sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(stale, vec!["Award Disbursement Feed", "Scholar Application Export"]);
        assert_eq!(report.stale_sources[1].last_checked_at, None);
    }

    #[test]
    fn test_rollups() {
        let (sources, history) = sample();
        let rollups = build_rollups(&sources, &history, t0());
        assert_eq!(rollups.len(), 3);

        let award = &rollups[0];
        assert_eq!(award.last_status, Some(CheckStatus::Failed));
        assert_eq!(award.last_details.as_deref(), Some("No feed received"));
        assert_eq!(award.next_due_at, Some(t0() - hours(1)));
        assert!(award.is_stale);

        let mentor = &rollups[1];
        assert!(!mentor.is_stale);
        assert_eq!(mentor.next_due_at, Some(t0() + hours(71)));

        let scholar = &rollups[2];
        assert_eq!(scholar.last_checked_at, None);
        assert_eq!(scholar.next_due_at, None);
        assert!(scholar.is_stale);
    }

    #[test]
    fn test_filter_by_owner_ignores_case() {
        let (sources, history) = sample();
        let rollups = build_rollups(&sources, &history, t0());

        let scholar = filter_by_owner(rollups.clone(), "Scholar Ops");
        assert_eq!(scholar.len(), 1);
        assert_eq!(scholar[0].name, "Scholar Application Export");

        assert!(filter_by_owner(rollups, "Nobody").is_empty());
    }
}
