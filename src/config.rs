//! Configuration module for Freshness Warden.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WardenConfig {
    /// Path to the SQLite database file (default: "freshness-warden.db")
    pub db_path: String,
    /// HTTP port for `serve` (default: 8080)
    pub http_port: u16,
    /// Default analysis window in days (default: 7)
    pub window_days: i64,
    /// Default number of checks shown by `source-history` (default: 10)
    pub history_limit: i64,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            db_path: "freshness-warden.db".to_string(),
            http_port: 8080,
            window_days: 7,
            history_limit: 10,
        }
    }
}

impl WardenConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FRESHNESS_DB_PATH`: Database file path (default: "freshness-warden.db")
    /// - `FRESHNESS_HTTP_PORT`: HTTP port (default: 8080)
    /// - `FRESHNESS_WINDOW_DAYS`: Analysis window in days (default: 7)
    /// - `FRESHNESS_HISTORY_LIMIT`: Checks listed by `source-history` (default: 10)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(db_path) = lookup("FRESHNESS_DB_PATH").filter(|p| !p.trim().is_empty()) {
            cfg.db_path = db_path;
        }
        if let Some(port) = parse_var(&lookup, "FRESHNESS_HTTP_PORT", |_: &u16| true) {
            cfg.http_port = port;
        }
        if let Some(days) = parse_var(&lookup, "FRESHNESS_WINDOW_DAYS", |d: &i64| *d > 0) {
            cfg.window_days = days;
        }
        if let Some(limit) = parse_var(&lookup, "FRESHNESS_HISTORY_LIMIT", |l: &i64| *l > 0) {
            cfg.history_limit = limit;
        }

        cfg
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> WardenConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WardenConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let cfg = WardenConfig::default();
        assert_eq!(cfg.db_path, "freshness-warden.db");
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.window_days, 7);
        assert_eq!(cfg.history_limit, 10);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = load_from(&[
            ("FRESHNESS_DB_PATH", "/tmp/warden.db"),
            ("FRESHNESS_HTTP_PORT", "9090"),
            ("FRESHNESS_WINDOW_DAYS", "14"),
            ("FRESHNESS_HISTORY_LIMIT", " 25 "),
        ]);
        assert_eq!(cfg.db_path, "/tmp/warden.db");
        assert_eq!(cfg.http_port, 9090);
        assert_eq!(cfg.window_days, 14);
        assert_eq!(cfg.history_limit, 25);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let cfg = load_from(&[
            ("FRESHNESS_DB_PATH", "  "),
            ("FRESHNESS_HTTP_PORT", "not-a-port"),
            ("FRESHNESS_WINDOW_DAYS", "0"),
            ("FRESHNESS_HISTORY_LIMIT", "-3"),
        ]);
        assert_eq!(cfg.db_path, "freshness-warden.db");
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.window_days, 7);
        assert_eq!(cfg.history_limit, 10);
    }
}
