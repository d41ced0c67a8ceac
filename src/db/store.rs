//! SQLite database store implementation.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use super::models::*;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

const MIGRATIONS: &[(&str, &str)] = &[(
    "000001_init",
    include_str!("../../migrations/000001_init.up.sql"),
)];

/// Database error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Source '{0}' not found")]
    SourceNotFound(String),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
#[error("unparseable timestamp '{0}'")]
struct BadTimestamp(String);

/// Thread-safe database store.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database at `path` and bring the schema up to date.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        for (name, sql) in MIGRATIONS {
            conn.execute_batch(sql)
                .map_err(|e| StoreError::Migration(format!("{} failed: {}", name, e)))?;
            tracing::debug!("Store: applied migration {}", name);
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert sample sources and one check each, but only into an empty database.
    pub fn seed_if_empty(&self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let count: i64 = {
            let conn = self.conn()?;
            conn.query_row("SELECT COUNT(*) FROM sources", [], |r| r.get(0))?
        };
        if count > 0 {
            return Ok(false);
        }

        let samples = [
            ("Scholar Application Export", "Scholar Ops", 24, "Daily export from CRM.", CheckStatus::Ok, "Export landed on time."),
            ("Mentor Availability Sheet", "Mentor Lead", 72, "Updated manually by mentor team.", CheckStatus::Warning, "Missing two mentors this week."),
            ("Award Disbursement Feed", "Finance", 12, "Bank feed refresh cadence.", CheckStatus::Failed, "No feed received in 24 hours."),
        ];

        for (name, owner, sla_hours, notes, status, details) in samples {
            self.add_source(
                &NewSource {
                    name: name.to_string(),
                    owner: owner.to_string(),
                    sla_hours,
                    notes: Some(notes.to_string()),
                },
                now,
            )?;
            self.log_check(name, status, Some(details), now)?;
        }

        tracing::info!("Store: seeded {} sample sources", samples.len());
        Ok(true)
    }

    // --- Sources ---

    /// Register a source. Returns `false` if a source with that name already exists.
    pub fn add_source(&self, source: &NewSource, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO sources (name, owner, sla_hours, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO NOTHING",
            params![
                source.name,
                source.owner,
                source.sla_hours,
                source.notes,
                format_db_time(now),
            ],
        )?;
        tracing::debug!("Store: add_source {} (inserted={})", source.name, inserted > 0);
        Ok(inserted > 0)
    }

    /// Apply a partial update. Returns `false` when no source has that name.
    pub fn update_source(&self, name: &str, update: &SourceUpdate) -> Result<bool, StoreError> {
        let (notes_specified, notes) = match &update.notes {
            NotesUpdate::Keep => (false, None),
            NotesUpdate::Set(notes) => (true, Some(notes.as_str())),
            NotesUpdate::Clear => (true, None),
        };

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE sources SET
                owner = COALESCE(?1, owner),
                sla_hours = COALESCE(?2, sla_hours),
                notes = CASE WHEN ?3 THEN ?4 ELSE notes END
             WHERE name = ?5",
            params![update.owner, update.sla_hours, notes_specified, notes, name],
        )?;
        tracing::debug!("Store: update_source {} (matched={})", name, updated > 0);
        Ok(updated > 0)
    }

    /// Delete a source and all of its checks.
    pub fn remove_source(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let Some(id) = source_id(&conn, name)? else {
            return Ok(false);
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM checks WHERE source_id = ?1", params![id])?;
        tx.execute("DELETE FROM sources WHERE id = ?1", params![id])?;
        tx.commit()?;

        tracing::debug!("Store: removed source {} (id={})", name, id);
        Ok(true)
    }

    /// All sources, ordered by name.
    pub fn get_sources(&self) -> Result<Vec<SourceMeta>, StoreError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, owner, sla_hours, notes FROM sources ORDER BY name")?;

        let sources = stmt
            .query_map([], |row| {
                Ok(SourceMeta {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    owner: row.get(2)?,
                    sla_hours: row.get(3)?,
                    notes: row.get(4)?,
                })
            })?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(sources)
    }

    // --- Checks ---

    /// Record a check against the named source and return its id.
    pub fn log_check(
        &self,
        source_name: &str,
        status: CheckStatus,
        details: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let source_id = source_id(&conn, source_name)?
            .ok_or_else(|| StoreError::SourceNotFound(source_name.to_string()))?;

        conn.execute(
            "INSERT INTO checks (source_id, status, checked_at, details) VALUES (?1, ?2, ?3, ?4)",
            params![source_id, status, format_db_time(checked_at), details],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!("Store: logged {} check #{} for {}", status, id, source_name);
        Ok(id)
    }

    /// Every check, grouped by source id.
    ///
    /// Each group is ordered by `(checked_at, id)` ascending, which is the order the
    /// breach counter requires.
    pub fn get_check_history(&self) -> Result<HashMap<i64, Vec<CheckRecord>>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, source_id, checked_at, status, details FROM checks
             ORDER BY source_id, checked_at, id",
        )?;

        let mut history: HashMap<i64, Vec<CheckRecord>> = HashMap::new();
        let rows = stmt.query_map([], check_from_row)?;
        for row in rows {
            let check = row?;
            history.entry(check.source_id).or_default().push(check);
        }

        Ok(history)
    }

    /// The latest `limit` checks for a source, newest first.
    pub fn get_source_history(&self, name: &str, limit: i64) -> Result<Vec<CheckRecord>, StoreError> {
        let conn = self.conn()?;
        let source_id =
            source_id(&conn, name)?.ok_or_else(|| StoreError::SourceNotFound(name.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT id, source_id, checked_at, status, details FROM checks
             WHERE source_id = ?1 ORDER BY checked_at DESC, id DESC LIMIT ?2",
        )?;
        let checks = stmt
            .query_map(params![source_id, limit], check_from_row)?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(checks)
    }
}

fn source_id(conn: &Connection, name: &str) -> Result<Option<i64>, StoreError> {
    let id = conn
        .query_row("SELECT id FROM sources WHERE name = ?1", params![name], |row| row.get(0))
        .optional()?;
    Ok(id)
}

fn check_from_row(row: &Row<'_>) -> SqlResult<CheckRecord> {
    Ok(CheckRecord {
        id: row.get(0)?,
        source_id: row.get(1)?,
        checked_at: time_column(row, 2)?,
        status: row.get(3)?,
        details: row.get(4)?,
    })
}

fn time_column(row: &Row<'_>, idx: usize) -> SqlResult<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_db_time(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(BadTimestamp(raw)))
    })
}

fn format_db_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parse a datetime string written by `format_db_time`.
fn parse_db_time(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .ok()
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use tempfile::NamedTempFile;

    fn open() -> (NamedTempFile, Store) {
        let tmp = NamedTempFile::new().unwrap();
        let store = Store::new(tmp.path()).unwrap();
        (tmp, store)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn new_source(name: &str, owner: &str, sla_hours: i64) -> NewSource {
        NewSource {
            name: name.to_string(),
            owner: owner.to_string(),
            sla_hours,
            notes: None,
        }
    }

    #[test]
    fn test_source_crud() {
        let (_tmp, store) = open();

        assert!(store.add_source(&new_source("CRM Export", "Data Ops", 24), t0()).unwrap());
        // Duplicate names are ignored
        assert!(!store.add_source(&new_source("CRM Export", "Other", 1), t0()).unwrap());

        let update = SourceUpdate {
            sla_hours: Some(48),
            notes: NotesUpdate::Set("nightly".to_string()),
            ..Default::default()
        };
        assert!(store.update_source("CRM Export", &update).unwrap());
        assert!(!store.update_source("Missing", &update).unwrap());

        let sources = store.get_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].owner, "Data Ops");
        assert_eq!(sources[0].sla_hours, 48);
        assert_eq!(sources[0].notes.as_deref(), Some("nightly"));

        let clear = SourceUpdate {
            notes: NotesUpdate::Clear,
            ..Default::default()
        };
        store.update_source("CRM Export", &clear).unwrap();
        assert_eq!(store.get_sources().unwrap()[0].notes, None);

        store.log_check("CRM Export", CheckStatus::Ok, None, t0()).unwrap();
        assert!(store.remove_source("CRM Export").unwrap());
        assert!(!store.remove_source("CRM Export").unwrap());
        assert!(store.get_sources().unwrap().is_empty());
        assert!(store.get_check_history().unwrap().is_empty());
    }

    #[test]
    fn test_sources_ordered_by_name() {
        let (_tmp, store) = open();
        for name in ["b-feed", "A-feed", "a-feed"] {
            store.add_source(&new_source(name, "Ops", 12), t0()).unwrap();
        }
        let names: Vec<_> = store.get_sources().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["A-feed", "a-feed", "b-feed"]);
    }

    #[test]
    fn test_log_check_unknown_source() {
        let (_tmp, store) = open();
        let err = store
            .log_check("Nope", CheckStatus::Failed, Some("x"), t0())
            .unwrap_err();
        assert!(matches!(err, StoreError::SourceNotFound(name) if name == "Nope"));
    }

    #[test]
    fn test_check_history_is_ordered() {
        let (_tmp, store) = open();
        store.add_source(&new_source("Feed", "Ops", 12), t0()).unwrap();
        store.add_source(&new_source("Other", "Ops", 12), t0()).unwrap();

        let later = t0() + ChronoDuration::hours(5);
        let first = store.log_check("Feed", CheckStatus::Warning, None, later).unwrap();
        store.log_check("Feed", CheckStatus::Ok, Some("early"), t0()).unwrap();
        let tied = store.log_check("Feed", CheckStatus::Failed, None, later).unwrap();
        store.log_check("Other", CheckStatus::Ok, None, t0()).unwrap();

        let history = store.get_check_history().unwrap();
        assert_eq!(history.len(), 2);

        let sources = store.get_sources().unwrap();
        let feed = &history[&sources[0].id];
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].checked_at, t0());
        assert_eq!(feed[0].details.as_deref(), Some("early"));
        assert_eq!(feed[1].id, first);
        assert_eq!(feed[2].id, tied);
        assert_eq!(feed[2].status, CheckStatus::Failed);
    }

    #[test]
    fn test_source_history_newest_first_with_limit() {
        let (_tmp, store) = open();
        store.add_source(&new_source("Feed", "Ops", 12), t0()).unwrap();
        for hour in 0..5 {
            store
                .log_check("Feed", CheckStatus::Ok, None, t0() + ChronoDuration::hours(hour))
                .unwrap();
        }

        let recent = store.get_source_history("Feed", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].checked_at, t0() + ChronoDuration::hours(4));
        assert_eq!(recent[1].checked_at, t0() + ChronoDuration::hours(3));

        assert!(matches!(
            store.get_source_history("Missing", 2),
            Err(StoreError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_seed_if_empty_runs_once() {
        let (_tmp, store) = open();
        assert!(store.seed_if_empty(t0()).unwrap());
        assert!(!store.seed_if_empty(t0()).unwrap());

        let sources = store.get_sources().unwrap();
        assert_eq!(sources.len(), 3);
        let history = store.get_check_history().unwrap();
        assert_eq!(history.values().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let store = Store::new(tmp.path()).unwrap();
            store.add_source(&new_source("Feed", "Ops", 12), t0()).unwrap();
        }
        let store = Store::new(tmp.path()).unwrap();
        assert_eq!(store.get_sources().unwrap().len(), 1);
    }

    #[test]
    fn test_db_time_keeps_nanoseconds() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + ChronoDuration::nanoseconds(123_456_789);
        assert_eq!(format_db_time(expected), "2024-01-15 10:30:00.123456789");
        assert_eq!(parse_db_time(&format_db_time(expected)), Some(expected));
        assert_eq!(parse_db_time("2024-01-15T10:30:00Z"), None);
        assert_eq!(parse_db_time("yesterday"), None);
    }
}
