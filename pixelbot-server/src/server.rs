//! pixelbot-server/src/server.rs
//!
//! Connects the gateway, starts the scheduled tasks and waits for Ctrl-C.

use tracing::{error, info};

use pixelbot_core::Error;
use pixelbot_core::platforms::discord::DiscordPlatform;
use pixelbot_core::tasks::{spawn_daily_question_task, spawn_monthly_progress_task, spawn_ping_task};

use crate::Args;
use crate::context::build_context;

pub async fn run_server(args: Args) -> Result<(), Error> {
    let (ctx, db) = build_context(&args).await?;

    let mut discord = DiscordPlatform::new(ctx.settings.bot_token.clone(), ctx.clone());
    discord.connect().await?;

    let mut tasks = vec![
        spawn_daily_question_task(ctx.clone()),
        spawn_monthly_progress_task(ctx.clone()),
    ];
    if let Some(url) = ctx.settings.ping_url.clone() {
        tasks.push(spawn_ping_task(ctx.http.clone(), url));
    }
    info!("Pixelbot running in {} channel(s)", ctx.settings.channels.len());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
    }
    info!("Ctrl-C detected; shutting down...");

    for task in &tasks {
        task.abort();
    }
    if let Err(e) = discord.disconnect().await {
        error!("Error disconnecting from Discord: {:?}", e);
    }
    db.pool().close().await;
    info!("Server shutdown complete.");
    Ok(())
}
