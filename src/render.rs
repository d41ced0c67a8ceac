//! Plain-text rendering of reports for the terminal.

use crate::analytics::{OwnerHealth, SourceHealth, SourceRollup, StaleSource, SummaryReport};
use crate::db::{CheckRecord, CheckStatus};

use chrono::{DateTime, Utc};
use std::io::{self, Write};

fn stamp(time: Option<DateTime<Utc>>, missing: &str) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%SZ").to_string())
        .unwrap_or_else(|| missing.to_string())
}

fn status_label(status: Option<CheckStatus>, missing: &str) -> String {
    status.map(|s| s.to_string()).unwrap_or_else(|| missing.to_string())
}

fn fresh_label(is_stale: bool) -> &'static str {
    if is_stale {
        "stale"
    } else {
        "fresh"
    }
}

pub fn stale<W: Write>(out: &mut W, sources: &[StaleSource]) -> io::Result<()> {
    if sources.is_empty() {
        return writeln!(out, "No stale sources detected.");
    }

    writeln!(out, "Stale sources:")?;
    for source in sources {
        writeln!(
            out,
            "- {} (owner: {}, SLA: {}h, last: {})",
            source.name,
            source.owner,
            source.sla_hours,
            stamp(source.last_checked_at, "never")
        )?;
    }
    Ok(())
}

pub fn summary<W: Write>(out: &mut W, report: &SummaryReport) -> io::Result<()> {
    writeln!(out, "Summary for last {} days:", report.days)?;
    writeln!(out, "- ok: {}", report.ok_count)?;
    writeln!(out, "- warning: {}", report.warning_count)?;
    writeln!(out, "- failed: {}", report.failed_count)?;
    writeln!(out, "- stale sources: {}", report.stale_sources.len())?;
    for source in &report.stale_sources {
        writeln!(
            out,
            "  - {} (owner: {}, last: {})",
            source.name,
            source.owner,
            stamp(source.last_checked_at, "never")
        )?;
    }
    Ok(())
}

pub fn rollup<W: Write>(out: &mut W, rollups: &[SourceRollup]) -> io::Result<()> {
    if rollups.is_empty() {
        return writeln!(out, "No sources registered.");
    }

    writeln!(out, "Source rollup:")?;
    for source in rollups {
        writeln!(out, "- {} ({}, SLA: {}h)", source.name, source.owner, source.sla_hours)?;
        writeln!(
            out,
            "  last: {} | status: {} | next due: {} | {}",
            stamp(source.last_checked_at, "never"),
            status_label(source.last_status, "n/a"),
            stamp(source.next_due_at, "n/a"),
            fresh_label(source.is_stale)
        )?;
        if let Some(details) = source.last_details.as_deref().filter(|d| !d.trim().is_empty()) {
            writeln!(out, "  details: {}", details)?;
        }
    }
    Ok(())
}

pub fn status<W: Write>(out: &mut W, rollups: &[SourceRollup]) -> io::Result<()> {
    if rollups.is_empty() {
        return writeln!(out, "No sources found.");
    }

    writeln!(out, "Source status:")?;
    for source in rollups {
        writeln!(
            out,
            "- {} (owner: {}, SLA: {}h, last: {}, status: {})",
            source.name,
            source.owner,
            source.sla_hours,
            stamp(source.last_checked_at, "never"),
            status_label(source.last_status, "none")
        )?;
    }
    Ok(())
}

pub fn history<W: Write>(out: &mut W, source_name: &str, checks: &[CheckRecord]) -> io::Result<()> {
    writeln!(out, "Recent checks for {}:", source_name)?;
    if checks.is_empty() {
        return writeln!(out, "  (no checks yet)");
    }

    for check in checks {
        let details = match check.details.as_deref() {
            Some(d) if !d.trim().is_empty() => format!(" | {}", d),
            _ => String::new(),
        };
        writeln!(
            out,
            "- {} | {}{}",
            stamp(Some(check.checked_at), ""),
            check.status,
            details
        )?;
    }
    Ok(())
}

pub fn source_health<W: Write>(out: &mut W, health: &[SourceHealth], days: i64) -> io::Result<()> {
    if health.is_empty() {
        return writeln!(out, "No sources registered.");
    }

    writeln!(out, "Source health for last {} days:", days)?;
    for source in health {
        let age = source
            .hours_since_last
            .map(|h| format!("{}h", h))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "- {} ({}, SLA: {}h, {})",
            source.name,
            source.owner,
            source.sla_hours,
            fresh_label(source.is_stale)
        )?;
        writeln!(
            out,
            "  last: {} | status: {} | age: {}",
            stamp(source.last_checked_at, "never"),
            status_label(source.last_status, "none"),
            age
        )?;
        writeln!(
            out,
            "  checks: {} (ok {}, warning {}, failed {}) | breaches: {}",
            source.total_checks,
            source.ok_count,
            source.warning_count,
            source.failed_count,
            source.breach_count
        )?;
    }
    Ok(())
}

pub fn owner_summary<W: Write>(out: &mut W, owners: &[OwnerHealth], days: i64) -> io::Result<()> {
    if owners.is_empty() {
        return writeln!(out, "No owners registered.");
    }

    writeln!(out, "Owner summary for last {} days:", days)?;
    for owner in owners {
        writeln!(
            out,
            "- {} (sources: {}, stale: {})",
            owner.owner, owner.source_count, owner.stale_count
        )?;
        writeln!(
            out,
            "  checks: ok {}, warning {}, failed {} | latest: {}",
            owner.ok_count,
            owner.warning_count,
            owner.failed_count,
            stamp(owner.last_checked_at, "never")
        )?;
    }
    Ok(())
}

pub fn owner_health<W: Write>(out: &mut W, owners: &[OwnerHealth], days: i64) -> io::Result<()> {
    if owners.is_empty() {
        return writeln!(out, "No owners registered.");
    }

    writeln!(out, "Owner health for last {} days:", days)?;
    for owner in owners {
        writeln!(
            out,
            "- {} (sources: {}, stale: {})",
            owner.owner, owner.source_count, owner.stale_count
        )?;
        writeln!(
            out,
            "  last: {} | status: {} | breaches: {}",
            stamp(owner.last_checked_at, "never"),
            status_label(owner.last_status, "none"),
            owner.breach_count
        )?;
        writeln!(
            out,
            "  checks: {} (ok {}, warning {}, failed {})",
            owner.total_checks(),
            owner.ok_count,
            owner.warning_count,
            owner.failed_count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn owner(name: &str) -> OwnerHealth {
        OwnerHealth {
            owner: name.to_string(),
            source_count: 3,
            stale_count: 1,
            ok_count: 4,
            warning_count: 1,
            failed_count: 0,
            breach_count: 2,
            last_checked_at: Some(Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap()),
            last_status: Some(CheckStatus::Warning),
        }
    }

    #[test]
    fn test_owner_summary_handles_empty_list() {
        let output = render(|out| owner_summary(out, &[], 7));
        assert!(output.contains("No owners registered."));
    }

    #[test]
    fn test_owner_summary_renders_metrics() {
        let output = render(|out| owner_summary(out, &[owner("Scholar Ops")], 7));
        assert!(output.contains("Owner summary for last 7 days:"));
        assert!(output.contains("- Scholar Ops (sources: 3, stale: 1)"));
        assert!(output.contains("checks: ok 4, warning 1, failed 0 | latest: 2026-01-02 00:00:00Z"));
    }

    #[test]
    fn test_owner_health_renders_metrics() {
        let output = render(|out| owner_health(out, &[owner("Data Ops")], 14));
        assert!(output.contains("Owner health for last 14 days:"));
        assert!(output.contains("- Data Ops (sources: 3, stale: 1)"));
        assert!(output.contains("status: warning | breaches: 2"));
        assert!(output.contains("checks: 5 (ok 4, warning 1, failed 0)"));
    }

    #[test]
    fn test_source_health_never_checked() {
        let health = SourceHealth {
            id: 1,
            name: "Prospect Feed".to_string(),
            owner: "Pipeline".to_string(),
            sla_hours: 24,
            last_checked_at: None,
            hours_since_last: None,
            last_status: None,
            is_stale: true,
            ok_count: 0,
            warning_count: 0,
            failed_count: 0,
            breach_count: 0,
            total_checks: 0,
        };
        let output = render(|out| source_health(out, &[health], 7));
        assert!(output.contains("- Prospect Feed (Pipeline, SLA: 24h, stale)"));
        assert!(output.contains("last: never | status: none | age: n/a"));
    }

    #[test]
    fn test_stale_empty_and_history_empty() {
        assert_eq!(render(|out| stale(out, &[])), "No stale sources detected.\n");
        assert_eq!(
            render(|out| history(out, "Feed", &[])),
            "Recent checks for Feed:\n  (no checks yet)\n"
        );
    }

    #[test]
    fn test_history_line() {
        let check = CheckRecord {
            id: 1,
            source_id: 1,
            checked_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
            status: CheckStatus::Failed,
            details: Some("timeout".to_string()),
        };
        let output = render(|out| history(out, "Feed", &[check]));
        assert!(output.contains("- 2026-03-04 05:06:07Z | failed | timeout"));
    }
}
