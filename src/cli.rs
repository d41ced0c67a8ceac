//! CLI argument definitions using clap derive API

use crate::db::CheckStatus;
use clap::{Args, Parser, Subcommand};

/// Freshness Warden - track data source freshness against owner SLAs
#[derive(Parser, Debug)]
#[command(name = "freshness-warden")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database path (overrides FRESHNESS_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schema and seed sample sources into an empty database
    InitDb,

    /// Register a new source
    AddSource(AddSourceArgs),

    /// Record a check against a source
    LogCheck(LogCheckArgs),

    /// Show the latest check for each source
    Status(StatusArgs),

    /// Show latest check, details and next due time for each source
    Rollup,

    /// List sources that have missed their SLA
    ListStale,

    /// Show recent checks for one source
    SourceHistory(SourceHistoryArgs),

    /// Per-source health over a trailing window
    SourceHealth(WindowArgs),

    /// Condensed per-owner counts over a trailing window
    OwnerSummary(WindowArgs),

    /// Per-owner health over a trailing window
    OwnerHealth(WindowArgs),

    /// Change a source's owner, SLA or notes
    UpdateSource(UpdateSourceArgs),

    /// Delete a source and its checks
    RemoveSource(RemoveSourceArgs),

    /// Outcome totals and stale sources over a trailing window
    Summary(WindowArgs),

    /// Serve the JSON API
    Serve(ServeArgs),
}

/// Arguments for the add-source command
#[derive(Args, Debug)]
pub struct AddSourceArgs {
    /// Unique source name
    #[arg(long)]
    pub name: String,

    /// Owning team or person
    #[arg(long)]
    pub owner: String,

    /// Maximum allowed hours between checks
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub sla_hours: i64,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Arguments for the log-check command
#[derive(Args, Debug)]
pub struct LogCheckArgs {
    /// Source name
    #[arg(long)]
    pub source: String,

    /// Check outcome: ok, warning or failed
    #[arg(long)]
    pub status: CheckStatus,

    /// Free-form details
    #[arg(long)]
    pub details: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show sources for this owner (case-insensitive)
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for the source-history command
#[derive(Args, Debug)]
pub struct SourceHistoryArgs {
    /// Source name
    #[arg(long)]
    pub name: String,

    /// Number of checks to show (default: FRESHNESS_HISTORY_LIMIT)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub limit: Option<i64>,
}

/// Trailing analysis window shared by the report commands
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Window size in days (default: FRESHNESS_WINDOW_DAYS)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub days: Option<i64>,
}

/// Arguments for the update-source command
#[derive(Args, Debug)]
pub struct UpdateSourceArgs {
    /// Source name
    #[arg(long)]
    pub name: String,

    /// New owner
    #[arg(long)]
    pub owner: Option<String>,

    /// New SLA in hours
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub sla_hours: Option<i64>,

    /// Replace notes
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,

    /// Remove notes
    #[arg(long)]
    pub clear_notes: bool,
}

/// Arguments for the remove-source command
#[derive(Args, Debug)]
pub struct RemoveSourceArgs {
    /// Source name
    #[arg(long)]
    pub name: String,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: FRESHNESS_HTTP_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}
