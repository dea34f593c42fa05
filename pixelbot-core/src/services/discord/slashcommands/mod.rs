// File: pixelbot-core/src/services/discord/slashcommands/mod.rs

pub mod ask;
pub mod view;

use std::sync::Arc;

use tracing::{info, warn};
use twilight_http::Client as HttpClient;
use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::application_command::{CommandData, CommandOptionValue};
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

use crate::services::discord::platform_err;
use crate::{BotContext, Error};

pub async fn register_global_slash_commands(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
) -> Result<(), Error> {
    let commands = &[view::create_view_command().build(), ask::create_ask_command().build()];

    http.interaction(application_id)
        .set_global_commands(commands)
        .await
        .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;

    info!("(SlashCommands) Registered {} global command(s)", commands.len());
    Ok(())
}

/// Dispatch a slash command from an `InteractionCreate`.
pub async fn handle_command(ctx: &BotContext, interaction: &Interaction, cmd: &CommandData) -> Result<(), Error> {
    match cmd.name.as_str() {
        "view" => {
            let year = integer_option(cmd, "year");
            view::handle_view_interaction(ctx, interaction, year).await
        }
        "ask" => {
            let date = string_option(cmd, "date").unwrap_or_default();
            ask::handle_ask_interaction(ctx, interaction, &date).await
        }
        other => {
            warn!("(SlashCommands) Unrecognized command: {other}");
            ctx.discord
                .interaction(interaction.application_id)
                .create_response(
                    interaction.id,
                    &interaction.token,
                    &InteractionResponse {
                        kind: InteractionResponseType::ChannelMessageWithSource,
                        data: Some(InteractionResponseData {
                            content: Some(format!("Unrecognized command: {other}")),
                            ..Default::default()
                        }),
                    },
                )
                .await
                .map_err(platform_err("Error answering unknown command"))?;
            Ok(())
        }
    }
}

/// Acknowledge now, answer with a follow-up later.
pub(crate) async fn defer(ctx: &BotContext, interaction: &Interaction) -> Result<(), Error> {
    ctx.discord
        .interaction(interaction.application_id)
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::DeferredChannelMessageWithSource,
                data: None,
            },
        )
        .await
        .map_err(platform_err("Error deferring command"))?;
    Ok(())
}

fn integer_option(cmd: &CommandData, name: &str) -> Option<i64> {
    cmd.options.iter().find(|o| o.name == name).and_then(|o| match o.value {
        CommandOptionValue::Integer(v) => Some(v),
        _ => None,
    })
}

fn string_option(cmd: &CommandData, name: &str) -> Option<String> {
    cmd.options.iter().find(|o| o.name == name).and_then(|o| match &o.value {
        CommandOptionValue::String(v) => Some(v.clone()),
        _ => None,
    })
}
