//! Command implementations.

mod reports;
mod serve;
mod sources;

use crate::cli::Commands;
use crate::config::WardenConfig;
use crate::db::{Store, StoreError};

use chrono::{DateTime, Utc};
use std::io::{self, Write};
use thiserror::Error;

/// Command failures reported to the operator.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Provide at least one of --owner, --sla-hours, --notes, or --clear-notes.")]
    NothingToUpdate,
}

/// Everything a command needs besides its own arguments.
#[derive(Clone)]
pub struct Context {
    pub store: Store,
    pub config: WardenConfig,
    /// Reference time for every freshness calculation in this invocation.
    pub now: DateTime<Utc>,
}

/// Run one command, writing human-readable output to `out`.
pub async fn execute<W: Write>(
    command: &Commands,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    match command {
        Commands::InitDb => sources::init_db(ctx, out),
        Commands::AddSource(args) => sources::add_source(args, ctx, out),
        Commands::LogCheck(args) => sources::log_check(args, ctx, out),
        Commands::UpdateSource(args) => sources::update_source(args, ctx, out),
        Commands::RemoveSource(args) => sources::remove_source(args, ctx, out),
        Commands::Status(args) => reports::status(args, ctx, out),
        Commands::Rollup => reports::rollup(ctx, out),
        Commands::ListStale => reports::list_stale(ctx, out),
        Commands::SourceHistory(args) => reports::source_history(args, ctx, out),
        Commands::SourceHealth(args) => reports::source_health(args, ctx, out),
        Commands::OwnerSummary(args) => reports::owner_summary(args, ctx, out),
        Commands::OwnerHealth(args) => reports::owner_health(args, ctx, out),
        Commands::Summary(args) => reports::summary(args, ctx, out),
        Commands::Serve(args) => serve::execute(args, ctx).await,
    }
}

/// Trimmed value of a required text option; blank values are rejected.
fn required(flag: &str, value: &str) -> Result<String, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "Missing required option --{}.",
            flag
        )));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional text option; blank counts as absent.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
