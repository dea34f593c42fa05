// File: pixelbot-core/src/services/discord/mod.rs

pub mod components;
pub mod slashcommands;

use std::sync::Arc;

use tracing::trace;
use twilight_model::application::interaction::{Interaction, InteractionData};

use crate::{BotContext, Error};

/// Short diagnostic shown in chat when an interaction fails. The full error
/// goes to the log.
pub fn error_text(err: &Error) -> String {
    format!("🚨 Err!\n\n```{err}```")
}

pub(crate) fn platform_err(context: &str) -> impl FnOnce(twilight_http::Error) -> Error + '_ {
    move |e| Error::Platform(format!("{context}: {e}"))
}

/// Routes an incoming interaction to the command, button or modal handler.
pub async fn handle_interaction_create(ctx: Arc<BotContext>, interaction: Interaction) -> Result<(), Error> {
    match &interaction.data {
        Some(InteractionData::ApplicationCommand(cmd)) => {
            slashcommands::handle_command(&ctx, &interaction, cmd).await
        }
        Some(InteractionData::MessageComponent(data)) => {
            components::handle_component(&ctx, &interaction, &data.custom_id).await
        }
        Some(InteractionData::ModalSubmit(data)) => components::handle_note_modal(&ctx, &interaction, data).await,
        _ => {
            trace!("(Interactions) Ignoring interaction {:?}", interaction.kind);
            Ok(())
        }
    }
}
