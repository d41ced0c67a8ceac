//! Database model types.

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome of a single freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warning => "warning",
            CheckStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected status string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("status must be one of: ok, warning, failed (got '{0}')")]
pub struct StatusParseError(pub String);

impl FromStr for CheckStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(CheckStatus::Ok),
            "warning" => Ok(CheckStatus::Warning),
            "failed" => Ok(CheckStatus::Failed),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

impl ToSql for CheckStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CheckStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: StatusParseError| FromSqlError::Other(Box::new(e)))
    }
}

/// A monitored data source and its freshness policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub id: i64,
    pub name: String,
    pub owner: String,
    /// Maximum allowed hours between successful checks.
    pub sla_hours: i64,
    pub notes: Option<String>,
}

/// Fields for registering a new source.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSource {
    pub name: String,
    pub owner: String,
    pub sla_hours: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// What to do with a source's notes during an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotesUpdate {
    #[default]
    Keep,
    Set(String),
    Clear,
}

/// Partial update of a source; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SourceUpdate {
    pub owner: Option<String>,
    pub sla_hours: Option<i64>,
    pub notes: NotesUpdate,
}

impl SourceUpdate {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.sla_hours.is_none() && self.notes == NotesUpdate::Keep
    }
}

/// A single logged check. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    pub id: i64,
    pub source_id: i64,
    pub checked_at: DateTime<Utc>,
    pub status: CheckStatus,
    pub details: Option<String>,
}
