// File: pixelbot-core/src/services/discord/slashcommands/view.rs

use chrono::Datelike;
use tracing::error;
use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::Interaction;
use twilight_model::http::attachment::Attachment;
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder};

use crate::render::IMAGE_FILENAME;
use crate::services::discord::slashcommands::defer;
use crate::services::discord::{error_text, platform_err};
use crate::utils::time::today_in;
use crate::{BotContext, Error};

/// `/view [year]`
pub fn create_view_command() -> CommandBuilder {
    CommandBuilder::new("view", "Display the image for a given year", CommandType::ChatInput)
        .option(IntegerBuilder::new("year", "Year to display (defaults to the current year)").required(false))
}

/// Renders the year and posts it; the current year when none is given.
pub async fn handle_view_interaction(
    ctx: &BotContext,
    interaction: &Interaction,
    year: Option<i64>,
) -> Result<(), Error> {
    defer(ctx, interaction).await?;
    let client = ctx.discord.interaction(interaction.application_id);

    let year = match year {
        Some(y) => i32::try_from(y).map_err(|_| Error::Validation(format!("{y} is not a year"))),
        None => Ok(today_in(ctx.settings.timezone).year()),
    };
    let rendered = match year {
        Ok(y) => ctx.renderer.render_year(y).await.map(|png| (y, png)),
        Err(e) => Err(e),
    };

    match rendered {
        Ok((year, png)) => {
            let attachment = Attachment::from_bytes(IMAGE_FILENAME.to_string(), png, 1);
            client
                .create_followup(&interaction.token)
                .content(&ctx.dates.view_result_text(year))
                .attachments(&[attachment])
                .await
                .map_err(platform_err("Error sending year image"))?;
        }
        Err(err) => {
            error!("(View) Error when downloading image: {err:?}");
            client
                .create_followup(&interaction.token)
                .content(&error_text(&err))
                .await
                .map_err(platform_err("Error reporting view failure"))?;
        }
    }
    Ok(())
}
