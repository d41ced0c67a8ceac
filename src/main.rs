//! Freshness Warden - data source freshness tracking
//!
//! Records checks against data sources and reports staleness, SLA breaches
//! and per-owner health.

mod analytics;
mod cli;
mod commands;
mod config;
mod db;
mod render;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use config::WardenConfig;
use db::Store;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for reports
    let level = if cli.global.verbose {
        "debug"
    } else if matches!(cli.command, Commands::Serve(_)) {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(format!("freshness_warden={}", level).parse()?))
        .init();

    // Load configuration
    let mut cfg = WardenConfig::load();
    if let Some(db_path) = cli.global.db.clone() {
        cfg.db_path = db_path;
    }
    tracing::debug!("Using database at {}", cfg.db_path);

    let result = match Store::new(&cfg.db_path) {
        Ok(store) => {
            let ctx = Context {
                store,
                config: cfg,
                now: Utc::now(),
            };
            let mut stdout = std::io::stdout().lock();
            commands::execute(&cli.command, &ctx, &mut stdout)
                .await
                .map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }

    Ok(())
}
