// File: pixelbot-core/src/services/discord/components.rs
//
// Buttons and the note modal. The sentiment buttons sit on the daily
// question; once answered the message swaps to the "answered" row
// (add note / edit).

use tracing::{debug, error, info};
use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::modal::ModalInteractionData;
use twilight_model::channel::message::component::{
    ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle,
};
use twilight_model::channel::message::{EmojiReactionType, MessageFlags};
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType};

use pixelbot_common::models::SentimentOption;

use crate::config::Settings;
use crate::services::discord::{error_text, platform_err};
use crate::{BotContext, Error};

pub const SENTIMENT_PREFIX: &str = "sentiment:";
pub const NOTE_BUTTON_ID: &str = "note";
pub const CHANGE_BUTTON_ID: &str = "change";
pub const NOTE_MODAL_ID: &str = "note_modal";
pub const NOTE_INPUT_ID: &str = "note";

/// Discord fits at most five buttons in one action row and five rows in a
/// message; options past the 25th are not shown.
const BUTTONS_PER_ROW: usize = 5;
const MAX_ROWS: usize = 5;

fn button(custom_id: String, label: &str, emoji: Option<&str>, style: ButtonStyle) -> Component {
    Component::Button(Button {
        custom_id: Some(custom_id),
        disabled: false,
        emoji: emoji
            .filter(|e| !e.is_empty())
            .map(|e| EmojiReactionType::Unicode { name: e.to_string() }),
        label: Some(label.to_string()),
        style,
        url: None,
        sku_id: None,
    })
}

/// One button per selectable option, laid out in rows of five.
pub fn sentiment_components(settings: &Settings) -> Vec<Component> {
    let buttons: Vec<Component> = settings
        .selectable_buttons()
        .map(|o| {
            button(
                format!("{SENTIMENT_PREFIX}{}", o.label),
                &o.label,
                Some(&o.emoji),
                ButtonStyle::Secondary,
            )
        })
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .take(MAX_ROWS)
        .map(|row| Component::ActionRow(ActionRow { components: row.to_vec() }))
        .collect()
}

pub fn answered_components(settings: &Settings) -> Vec<Component> {
    vec![Component::ActionRow(ActionRow {
        components: vec![
            button(NOTE_BUTTON_ID.to_string(), &settings.note_button_text, None, ButtonStyle::Success),
            button(CHANGE_BUTTON_ID.to_string(), &settings.edit_button_text, None, ButtonStyle::Danger),
        ],
    })]
}

pub fn note_modal(settings: &Settings) -> InteractionResponseData {
    InteractionResponseData {
        custom_id: Some(NOTE_MODAL_ID.to_string()),
        title: Some(settings.note_modal_title.clone()),
        components: Some(vec![Component::ActionRow(ActionRow {
            components: vec![Component::TextInput(TextInput {
                custom_id: NOTE_INPUT_ID.to_string(),
                label: settings.note_modal_label.clone(),
                max_length: None,
                min_length: None,
                placeholder: Some(settings.note_modal_placeholder.clone()),
                required: Some(true),
                style: TextInputStyle::Paragraph,
                value: None,
            })],
        })]),
        ..Default::default()
    }
}

/// Label of the sentiment behind a button id, if it is one.
pub fn sentiment_label(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(SENTIMENT_PREFIX)
}

/// Text typed into the note field of a submitted modal.
pub fn submitted_note(data: &ModalInteractionData) -> Option<&str> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find(|c| c.custom_id == NOTE_INPUT_ID)
        .and_then(|c| c.value.as_deref())
}

fn message_id(interaction: &Interaction) -> Result<String, Error> {
    interaction
        .message
        .as_ref()
        .map(|m| m.id.to_string())
        .ok_or_else(|| Error::Platform("interaction is not attached to a message".into()))
}

pub async fn handle_component(ctx: &BotContext, interaction: &Interaction, custom_id: &str) -> Result<(), Error> {
    if let Some(label) = sentiment_label(custom_id) {
        return handle_sentiment(ctx, interaction, label).await;
    }
    match custom_id {
        NOTE_BUTTON_ID => handle_note_button(ctx, interaction).await,
        CHANGE_BUTTON_ID => handle_change_button(ctx, interaction).await,
        other => {
            debug!("(Components) Unknown component id '{other}'");
            Ok(())
        }
    }
}

async fn handle_sentiment(ctx: &BotContext, interaction: &Interaction, label: &str) -> Result<(), Error> {
    let client = ctx.discord.interaction(interaction.application_id);
    let mut record = ctx.dates.load(&message_id(interaction)?).await?;

    client
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::DeferredUpdateMessage,
                data: None,
            },
        )
        .await
        .map_err(platform_err("Error deferring sentiment button"))?;
    client
        .update_response(&interaction.token)
        .content(Some("⌛"))
        .components(Some(&[]))
        .await
        .map_err(platform_err("Error marking message as pending"))?;

    let answered = answered_components(&ctx.settings);
    let outcome = async {
        ctx.dates.answer(&mut record, label).await?;
        let selected = SentimentOption::find(&ctx.settings.buttons, label);
        ctx.dates.done_text(&record, selected)
    }
    .await;
    match outcome {
        Ok(text) => {
            client
                .update_response(&interaction.token)
                .content(Some(&text))
                .components(Some(&answered))
                .await
                .map_err(platform_err("Error showing answer"))?;
        }
        Err(err) => {
            error!("(Components) Error when answering daily question: {err:?}");
            client
                .create_followup(&interaction.token)
                .content(&error_text(&err))
                .components(&answered)
                .await
                .map_err(platform_err("Error reporting answer failure"))?;
        }
    }
    Ok(())
}

async fn handle_note_button(ctx: &BotContext, interaction: &Interaction) -> Result<(), Error> {
    ctx.discord
        .interaction(interaction.application_id)
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::Modal,
                data: Some(note_modal(&ctx.settings)),
            },
        )
        .await
        .map_err(platform_err("Error opening note modal"))?;
    Ok(())
}

async fn handle_change_button(ctx: &BotContext, interaction: &Interaction) -> Result<(), Error> {
    let record = ctx.dates.load(&message_id(interaction)?).await?;
    let question = ctx.dates.daily_question_text(&record)?;
    ctx.discord
        .interaction(interaction.application_id)
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::UpdateMessage,
                data: Some(InteractionResponseData {
                    content: Some(question),
                    components: Some(sentiment_components(&ctx.settings)),
                    ..Default::default()
                }),
            },
        )
        .await
        .map_err(platform_err("Error reopening daily question"))?;
    Ok(())
}

pub async fn handle_note_modal(
    ctx: &BotContext,
    interaction: &Interaction,
    data: &ModalInteractionData,
) -> Result<(), Error> {
    if data.custom_id != NOTE_MODAL_ID {
        debug!("(Components) Unknown modal id '{}'", data.custom_id);
        return Ok(());
    }

    let client = ctx.discord.interaction(interaction.application_id);
    client
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::DeferredUpdateMessage,
                data: None,
            },
        )
        .await
        .map_err(platform_err("Error deferring note modal"))?;

    let outcome = async {
        let note = submitted_note(data).unwrap_or_default().to_string();
        let mut record = ctx.dates.load(&message_id(interaction)?).await?;
        ctx.dates.add_note(&mut record, &note).await?;
        let text = ctx.dates.done_text(&record, None)?;
        Ok::<_, Error>((record, text))
    }
    .await;

    match outcome {
        Ok((record, text)) => {
            info!("(Components) Note saved for {}", record.date);
            client
                .update_response(&interaction.token)
                .content(Some(&text))
                .components(Some(&answered_components(&ctx.settings)))
                .await
                .map_err(platform_err("Error showing note"))?;
        }
        Err(err) => {
            error!("(Components) Error when adding note: {err:?}");
            client
                .create_followup(&interaction.token)
                .content(&error_text(&err))
                .flags(MessageFlags::EPHEMERAL)
                .await
                .map_err(platform_err("Error reporting note failure"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(buttons: &str) -> Settings {
        let map: HashMap<&str, &str> = [("BOT_TOKEN", "t"), ("SPREADSHEET_ID", "s"), ("BUTTONS", buttons)]
            .into_iter()
            .collect();
        Settings::from_lookup(|k| map.get(k).map(|v| v.to_string())).unwrap()
    }

    fn custom_ids(row: &Component) -> Vec<String> {
        match row {
            Component::ActionRow(r) => r
                .components
                .iter()
                .filter_map(|c| match c {
                    Component::Button(b) => b.custom_id.clone(),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn skips_options_without_label_or_colour() {
        let s = settings(r##"[["😄","Very Happy","#ff6961"],["🙂","",""],["😐","Neutral","#fdfd96"]]"##);
        let rows = sentiment_components(&s);
        assert_eq!(rows.len(), 1);
        assert_eq!(custom_ids(&rows[0]), vec!["sentiment:Very Happy", "sentiment:Neutral"]);
    }

    #[test]
    fn wraps_after_five_buttons() {
        let json = (0..7)
            .map(|i| format!(r##"["","Mood {i}","#000000"]"##))
            .collect::<Vec<_>>()
            .join(",");
        let rows = sentiment_components(&settings(&format!("[{json}]")));
        assert_eq!(rows.len(), 2);
        assert_eq!(custom_ids(&rows[1]).len(), 2);
    }

    #[test]
    fn answered_row_has_note_and_change() {
        let rows = answered_components(&settings(r##"[["😄","Very Happy","#ff6961"]]"##));
        assert_eq!(custom_ids(&rows[0]), vec![NOTE_BUTTON_ID, CHANGE_BUTTON_ID]);
    }

    #[test]
    fn sentiment_ids_round_trip() {
        assert_eq!(sentiment_label("sentiment:Very Happy"), Some("Very Happy"));
        assert_eq!(sentiment_label("note"), None);
    }
}
