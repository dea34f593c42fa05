// File: pixelbot-core/src/services/discord/slashcommands/ask.rs

use tracing::{error, info};
use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::Interaction;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use crate::services::discord::components::sentiment_components;
use crate::services::discord::slashcommands::defer;
use crate::services::discord::{error_text, platform_err};
use crate::{BotContext, Error};

/// `/ask <date>`
pub fn create_ask_command() -> CommandBuilder {
    CommandBuilder::new("ask", "Re-ask a date", CommandType::ChatInput)
        .option(StringBuilder::new("date", "Date to ask about, in the configured date format").required(true))
}

/// Posts the daily question for an arbitrary date. Nothing is stored unless
/// the date parses and the question was posted.
pub async fn handle_ask_interaction(ctx: &BotContext, interaction: &Interaction, date: &str) -> Result<(), Error> {
    defer(ctx, interaction).await?;
    let client = ctx.discord.interaction(interaction.application_id);

    let parsed = ctx.dates.parse_ask_date(date).and_then(|record| {
        let question = ctx.dates.daily_question_text(&record)?;
        Ok((record, question))
    });
    let (mut record, question) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => {
            error!("(Ask) Error when interpreting date for ask command: {err:?}");
            client
                .create_followup(&interaction.token)
                .content(&error_text(&err))
                .await
                .map_err(platform_err("Error reporting invalid date"))?;
            return Ok(());
        }
    };

    let message = client
        .create_followup(&interaction.token)
        .content(&question)
        .components(&sentiment_components(&ctx.settings))
        .await
        .map_err(platform_err("Error posting question"))?
        .model()
        .await
        .map_err(|e| Error::Platform(format!("Error reading posted question: {e}")))?;

    record.message_id = Some(message.id.to_string());
    ctx.dates.save(&record).await?;
    info!("(Ask) Asked about {} in message {}", record.date, message.id);
    Ok(())
}
