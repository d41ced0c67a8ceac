//! Owner-level rollup of per-source health.

use super::source_health::SourceHealth;
use crate::db::CheckStatus;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate health across every source an owner is accountable for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerHealth {
    /// Owner spelling of the first source seen for this owner.
    pub owner: String,
    pub source_count: usize,
    pub stale_count: usize,
    pub ok_count: usize,
    pub warning_count: usize,
    pub failed_count: usize,
    pub breach_count: usize,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_status: Option<CheckStatus>,
}

impl OwnerHealth {
    pub fn total_checks(&self) -> usize {
        self.ok_count + self.warning_count + self.failed_count
    }

    /// Reduce one owner's sources. `members` must be non-empty.
    fn from_members(members: &[&SourceHealth]) -> Self {
        let owner = members
            .first()
            .map(|source| source.owner.clone())
            .unwrap_or_default();

        // Strict comparison keeps the earliest member on ties.
        let last = members
            .iter()
            .filter_map(|source| source.last_checked_at.map(|at| (at, source.last_status)))
            .fold(None, |best: Option<(DateTime<Utc>, Option<CheckStatus>)>, candidate| {
                match best {
                    Some((at, _)) if at >= candidate.0 => best,
                    _ => Some(candidate),
                }
            });

        Self {
            owner,
            source_count: members.len(),
            stale_count: members.iter().filter(|source| source.is_stale).count(),
            ok_count: members.iter().map(|source| source.ok_count).sum(),
            warning_count: members.iter().map(|source| source.warning_count).sum(),
            failed_count: members.iter().map(|source| source.failed_count).sum(),
            breach_count: members.iter().map(|source| source.breach_count).sum(),
            last_checked_at: last.map(|(at, _)| at),
            last_status: last.and_then(|(_, status)| status),
        }
    }
}

/// Grouping key for owner names.
pub fn owner_key(owner: &str) -> String {
    owner.to_lowercase()
}

/// Whether two owner names refer to the same owner.
pub fn same_owner(a: &str, b: &str) -> bool {
    owner_key(a) == owner_key(b)
}

/// Group sources by owner (case-insensitively) and fold each group.
///
/// Input order decides each owner's display spelling, so pass sources in name
/// order. Output is ordered by owner display name.
pub fn build_owner_health(sources: &[SourceHealth]) -> Vec<OwnerHealth> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&SourceHealth>> = Vec::new();

    for source in sources {
        let slot = *slots.entry(owner_key(&source.owner)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(source);
    }

    let mut owners: Vec<OwnerHealth> = groups
        .iter()
        .map(|members| OwnerHealth::from_members(members))
        .collect();
    owners.sort_by(|a, b| a.owner.cmp(&b.owner));
    owners
}
