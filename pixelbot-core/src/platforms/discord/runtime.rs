use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};
use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};

use crate::platforms::ConnectionStatus;
use crate::services::discord::handle_interaction_create;
use crate::services::discord::slashcommands::register_global_slash_commands;
use crate::{BotContext, Error};

/// The shard runner:
///   - registers slash commands once the first shard is READY
///   - hands every interaction to its own task.
async fn shard_runner(mut shard: Shard, ctx: Arc<BotContext>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    let wanted = EventTypeFlags::READY | EventTypeFlags::INTERACTION_CREATE;
    while let Some(item) = shard.next_event(wanted).await {
        match item {
            Ok(Event::Ready(ready)) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={})",
                    ready.user.name, ready.user.id
                );
                if shard_id == 0 {
                    if let Err(e) = register_global_slash_commands(&ctx.discord, ready.application.id).await {
                        error!("Shard {shard_id} => {e}");
                    }
                }
            }
            Ok(Event::InteractionCreate(create)) => {
                let interaction = create.0;
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    let id = interaction.id;
                    if let Err(e) = handle_interaction_create(ctx, interaction).await {
                        error!("(ShardRunner) Interaction {id} failed => {e:?}");
                    }
                });
            }
            Ok(other) => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// Gateway connection for the bot. Interactions are the only events we care
/// about, so only the `GUILDS` intent is requested.
pub struct DiscordPlatform {
    pub token: String,
    pub connection_status: ConnectionStatus,
    pub shard_tasks: Vec<JoinHandle<()>>,
    pub shard_senders: Vec<MessageSender>,
    ctx: Arc<BotContext>,
}

impl DiscordPlatform {
    pub fn new(token: String, ctx: Arc<BotContext>) -> Self {
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            ctx,
        }
    }

    pub async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }

        let config = Config::new(self.token.clone(), Intents::GUILDS);

        let shards = gateway::create_recommended(&self.ctx.discord, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let ctx = self.ctx.clone();
            let handle = tokio::spawn(async move {
                shard_runner(shard, ctx).await;
            });
            self.shard_tasks.push(handle);
        }

        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());
        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        // Gracefully close shards
        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();
        Ok(())
    }
}
