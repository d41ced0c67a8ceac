//! Read-only report commands.

use super::{required, CommandError, Context};
use crate::analytics::{
    build_owner_health, build_rollups, build_source_health, filter_by_owner, stale_sources,
    AnalysisWindow, SourceHealth, SummaryReport,
};
use crate::cli::{SourceHistoryArgs, StatusArgs, WindowArgs};
use crate::render;

use std::io::Write;

/// Resolve the window size, falling back to the configured default.
fn window(args: &WindowArgs, ctx: &Context) -> AnalysisWindow {
    AnalysisWindow::new(args.days.unwrap_or(ctx.config.window_days), ctx.now)
}

fn load_health(window: &AnalysisWindow, ctx: &Context) -> Result<Vec<SourceHealth>, CommandError> {
    let sources = ctx.store.get_sources()?;
    let history = ctx.store.get_check_history()?;
    let health = build_source_health(&sources, &history, window);
    tracing::debug!(
        "Computed health for {} sources over {} days",
        health.len(),
        window.days
    );
    Ok(health)
}

pub fn status<W: Write>(args: &StatusArgs, ctx: &Context, out: &mut W) -> Result<(), CommandError> {
    let sources = ctx.store.get_sources()?;
    let history = ctx.store.get_check_history()?;
    let mut rollups = build_rollups(&sources, &history, ctx.now);
    if let Some(owner) = args.owner.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
        rollups = filter_by_owner(rollups, owner);
    }
    render::status(out, &rollups)?;
    Ok(())
}

pub fn rollup<W: Write>(ctx: &Context, out: &mut W) -> Result<(), CommandError> {
    let sources = ctx.store.get_sources()?;
    let history = ctx.store.get_check_history()?;
    render::rollup(out, &build_rollups(&sources, &history, ctx.now))?;
    Ok(())
}

pub fn list_stale<W: Write>(ctx: &Context, out: &mut W) -> Result<(), CommandError> {
    // Staleness ignores the window; any size works here.
    let health = load_health(&AnalysisWindow::new(ctx.config.window_days, ctx.now), ctx)?;
    render::stale(out, &stale_sources(&health))?;
    Ok(())
}

pub fn source_history<W: Write>(
    args: &SourceHistoryArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let name = required("name", &args.name)?;
    let limit = args.limit.unwrap_or(ctx.config.history_limit);
    let checks = ctx.store.get_source_history(&name, limit)?;
    render::history(out, &name, &checks)?;
    Ok(())
}

pub fn source_health<W: Write>(
    args: &WindowArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let window = window(args, ctx);
    let health = load_health(&window, ctx)?;
    render::source_health(out, &health, window.days)?;
    Ok(())
}

pub fn owner_summary<W: Write>(
    args: &WindowArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let window = window(args, ctx);
    let owners = build_owner_health(&load_health(&window, ctx)?);
    render::owner_summary(out, &owners, window.days)?;
    Ok(())
}

pub fn owner_health<W: Write>(
    args: &WindowArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let window = window(args, ctx);
    let owners = build_owner_health(&load_health(&window, ctx)?);
    render::owner_health(out, &owners, window.days)?;
    Ok(())
}

pub fn summary<W: Write>(args: &WindowArgs, ctx: &Context, out: &mut W) -> Result<(), CommandError> {
    let window = window(args, ctx);
    let report = SummaryReport::from_health(window.days, &load_health(&window, ctx)?);
    render::summary(out, &report)?;
    Ok(())
}
