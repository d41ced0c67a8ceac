//! Commands that change sources and the check log.

use super::{optional, required, CommandError, Context};
use crate::cli::{AddSourceArgs, LogCheckArgs, RemoveSourceArgs, UpdateSourceArgs};
use crate::db::{NewSource, NotesUpdate, SourceUpdate};

use std::io::Write;

pub fn init_db<W: Write>(ctx: &Context, out: &mut W) -> Result<(), CommandError> {
    if ctx.store.seed_if_empty(ctx.now)? {
        writeln!(out, "Database initialized and seeded.")?;
    } else {
        writeln!(out, "Database initialized; existing sources kept.")?;
    }
    Ok(())
}

pub fn add_source<W: Write>(
    args: &AddSourceArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let source = NewSource {
        name: required("name", &args.name)?,
        owner: required("owner", &args.owner)?,
        sla_hours: args.sla_hours,
        notes: optional(args.notes.as_deref()),
    };

    if ctx.store.add_source(&source, ctx.now)? {
        writeln!(out, "Source added.")?;
    } else {
        writeln!(out, "Source '{}' already exists; nothing changed.", source.name)?;
    }
    Ok(())
}

pub fn log_check<W: Write>(
    args: &LogCheckArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let source = required("source", &args.source)?;
    let details = optional(args.details.as_deref());

    ctx.store
        .log_check(&source, args.status, details.as_deref(), ctx.now)?;
    writeln!(out, "Check logged.")?;
    Ok(())
}

pub fn update_source<W: Write>(
    args: &UpdateSourceArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let name = required("name", &args.name)?;
    let notes = match optional(args.notes.as_deref()) {
        Some(notes) => NotesUpdate::Set(notes),
        None if args.clear_notes => NotesUpdate::Clear,
        None => NotesUpdate::Keep,
    };
    let update = SourceUpdate {
        owner: optional(args.owner.as_deref()),
        sla_hours: args.sla_hours,
        notes,
    };

    if update.is_empty() {
        return Err(CommandError::NothingToUpdate);
    }

    if ctx.store.update_source(&name, &update)? {
        writeln!(out, "Source updated.")?;
    } else {
        writeln!(out, "Source not found.")?;
    }
    Ok(())
}

pub fn remove_source<W: Write>(
    args: &RemoveSourceArgs,
    ctx: &Context,
    out: &mut W,
) -> Result<(), CommandError> {
    let name = required("name", &args.name)?;
    if ctx.store.remove_source(&name)? {
        writeln!(out, "Source removed.")?;
    } else {
        writeln!(out, "Source not found.")?;
    }
    Ok(())
}
