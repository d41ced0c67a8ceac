//! The `serve` command.

use super::{CommandError, Context};
use crate::cli::ServeArgs;
use crate::web::Server;

pub async fn execute(args: &ServeArgs, ctx: &Context) -> Result<(), CommandError> {
    let mut config = ctx.config.clone();
    if let Some(port) = args.port {
        config.http_port = port;
    }

    tracing::info!("Starting Freshness Warden API on port {}...", config.http_port);
    tracing::info!("Using database at {}", config.db_path);

    Server::new(config, ctx.store.clone()).start().await?;
    Ok(())
}
