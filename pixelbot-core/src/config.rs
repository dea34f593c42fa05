// src/config.rs

use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use pixelbot_common::models::{Color, SentimentOption, default_options};

use crate::Error;
use crate::utils::time;

/// Everything the bot can be configured with. Loaded once at startup and
/// shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub spreadsheet_id: String,
    pub credentials_path: PathBuf,
    pub database_url: String,

    pub timezone: Tz,
    pub channels: Vec<u64>,

    pub edit_button_text: String,
    pub note_button_text: String,
    pub note_modal_title: String,
    pub note_modal_label: String,
    pub note_modal_placeholder: String,

    pub daily_message_time: NaiveTime,
    pub daily_message: String,
    pub done_message: String,
    pub monthly_progress_text: String,
    pub view_command_result: String,

    pub buttons: Vec<SentimentOption>,
    pub default_color: String,
    pub model_worksheet_id: i64,
    pub date_format: String,

    /// Liveness URL hit every few minutes, when pinging is enabled.
    pub ping_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bot_token = get("BOT_TOKEN").ok_or_else(|| Error::Config("BOT_TOKEN not set".into()))?;
        let spreadsheet_id = get("SPREADSHEET_ID")
            .ok_or_else(|| Error::Config("SPREADSHEET_ID not set".into()))?;

        let tz_name = get_or("TZ", "UTC");
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| Error::Config(format!("unknown timezone '{tz_name}'")))?;

        let channels = match get("CHANNELS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u64>()
                        .map_err(|_| Error::Config(format!("invalid channel id '{s}'")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let hour = parse_number(&get_or("DAILY_MESSAGE_HOUR", "23"), "DAILY_MESSAGE_HOUR")?;
        let minute = parse_number(&get_or("DAILY_MESSAGE_MINUTE", "0"), "DAILY_MESSAGE_MINUTE")?;
        let second = parse_number(&get_or("DAILY_MESSAGE_SECONDS", "0"), "DAILY_MESSAGE_SECONDS")?;
        let daily_message_time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            Error::Config(format!("invalid daily message time {hour}:{minute}:{second}"))
        })?;

        let buttons = match get("BUTTONS") {
            Some(json) => SentimentOption::parse_list(&json)?,
            None => default_options(),
        };
        for option in buttons.iter().filter(|o| o.is_selectable()) {
            Color::from_hex(&option.color)?;
        }

        let default_color = get_or("DEFAULT_COLOR", "#d9d9d9");
        Color::from_hex(&default_color)?;

        let model_worksheet_id = get_or("MODEL_WORKSHEET_ID", "0")
            .parse::<i64>()
            .map_err(|_| Error::Config("MODEL_WORKSHEET_ID must be a number".into()))?;

        let date_format = get_or("DATE_FRMT", "%d/%m/%Y");
        validate_date_format(&date_format)?;

        let ping_enabled = get("PING")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        let ping_url = if ping_enabled {
            Some(get("PING_URL").ok_or_else(|| Error::Config("PING is enabled but PING_URL is not set".into()))?)
        } else {
            None
        };

        Ok(Self {
            bot_token,
            spreadsheet_id,
            credentials_path: PathBuf::from(get_or("CREDENTIALS_PATH", "./data/credentials.json")),
            database_url: get_or("DATABASE_URL", "sqlite://data/pixelbot.db"),
            timezone,
            channels,
            edit_button_text: get_or("EDIT_BUTTON_TEXT", "Edit"),
            note_button_text: get_or("NOTE_BUTTON_TEXT", "Add note"),
            note_modal_title: get_or("NOTE_MODAL_TITLE", "Note"),
            note_modal_label: get_or("NOTE_MODAL_LABEL", "How was your day?"),
            note_modal_placeholder: get_or("NOTE_MODAL_PLACEHOLDER", "Write something about your day"),
            daily_message_time,
            daily_message: get("DAILY_MESSAGE")
                .or_else(|| get("DAILY_MESAGE"))
                .unwrap_or_else(|| "{date}\n\nHow was your day?".to_string()),
            done_message: get_or("DONE_MESSAGE", "{date} was {button_label} ({button_description})"),
            monthly_progress_text: get("MONTHLY_PROGRESS_TEXT")
                .or_else(|| get("MONTLY_PROGRESS_TEXT"))
                .unwrap_or_else(|| "**Here's your year until now ({date})**".to_string()),
            view_command_result: get_or(
                "VIEW_COMMAND_RESULT",
                "Here's your Year In Pixels for the year `{year}`",
            ),
            buttons,
            default_color,
            model_worksheet_id,
            date_format,
            ping_url,
        })
    }

    /// Options that get a button: those with both a label and a colour.
    pub fn selectable_buttons(&self) -> impl Iterator<Item = &SentimentOption> {
        self.buttons.iter().filter(|o| o.is_selectable())
    }
}

fn parse_number(raw: &str, key: &str) -> Result<u32, Error> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| Error::Config(format!("{key} must be a non-negative number, got '{raw}'")))
}

/// Rejects patterns that cannot format a calendar date: unknown items and
/// items that need a UTC offset.
fn validate_date_format(fmt: &str) -> Result<(), Error> {
    let sample = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap_or_default();
    time::format_date(sample, fmt)
        .map(|_| ())
        .map_err(|_| Error::Config(format!("invalid DATE_FRMT '{fmt}'")))
}
