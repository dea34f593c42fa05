use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use pixelbot_common::models::{CellAddress, CellFormat, Color, PersistedRecord, SentimentOption};
use pixelbot_common::traits::api::SpreadsheetApi;
use pixelbot_common::traits::repository_traits::DateRecordRepository;

use crate::Error;
use crate::config::Settings;
use crate::sheets::WorksheetProvisioner;
use crate::sheets::coordinates::cell_address;
use crate::utils::{template, time};

/// One day's mood entry, optionally linked to the chat message that asked
/// for it. Empty `answer` / `note` mean "not given yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRecord {
    pub message_id: Option<String>,
    pub date: NaiveDate,
    pub answer: String,
    pub note: String,
}

impl DateRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            message_id: None,
            date,
            answer: String::new(),
            note: String::new(),
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn cell(&self) -> CellAddress {
        cell_address(self.date)
    }
}

/// Loads, saves and answers date records. Owns no state of its own; the
/// record store, the spreadsheet and the settings are injected.
pub struct DateRecordService {
    records: Arc<dyn DateRecordRepository>,
    sheets: Arc<dyn SpreadsheetApi>,
    provisioner: Arc<WorksheetProvisioner>,
    settings: Arc<Settings>,
}

impl DateRecordService {
    pub fn new(
        records: Arc<dyn DateRecordRepository>,
        sheets: Arc<dyn SpreadsheetApi>,
        provisioner: Arc<WorksheetProvisioner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            records,
            sheets,
            provisioner,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn format_date(&self, date: NaiveDate) -> Result<String, Error> {
        time::format_date(date, &self.settings.date_format).map_err(|_| {
            Error::Config(format!("DATE_FRMT '{}' cannot format {date}", self.settings.date_format))
        })
    }

    /// A fresh record for today in the configured timezone.
    pub fn today(&self) -> DateRecord {
        DateRecord::new(time::today_in(self.settings.timezone))
    }

    pub fn for_date(&self, date: NaiveDate) -> DateRecord {
        DateRecord::new(date)
    }

    /// The record stored for `message_id`, or a fresh record for today that
    /// keeps the message id so the next save links it.
    pub async fn load(&self, message_id: &str) -> Result<DateRecord, Error> {
        match self.records.get_by_message_id(message_id).await? {
            Some(stored) => {
                let date = NaiveDate::parse_from_str(&stored.date, &self.settings.date_format).map_err(|e| {
                    Error::InconsistentState(format!(
                        "stored date '{}' for message {message_id} does not match format '{}': {e}",
                        stored.date, self.settings.date_format
                    ))
                })?;
                Ok(DateRecord {
                    message_id: Some(message_id.to_string()),
                    date,
                    answer: stored.answer,
                    note: stored.note,
                })
            }
            None => {
                debug!("(DateRecords) No record for message {message_id}; defaulting to today");
                Ok(self.today().with_message_id(message_id))
            }
        }
    }

    /// Parses a user supplied date with the configured format.
    pub fn parse_ask_date(&self, text: &str) -> Result<DateRecord, Error> {
        let date = NaiveDate::parse_from_str(text.trim(), &self.settings.date_format).map_err(|e| {
            Error::Validation(format!(
                "'{text}' is not a date in the format '{}' ({e})",
                self.settings.date_format
            ))
        })?;
        Ok(self.for_date(date))
    }

    pub fn to_persisted(&self, record: &DateRecord) -> Result<PersistedRecord, Error> {
        Ok(PersistedRecord {
            message_id: record.message_id.clone(),
            date: self.format_date(record.date)?,
            answer: record.answer.clone(),
            note: record.note.clone(),
        })
    }

    pub async fn save(&self, record: &DateRecord) -> Result<(), Error> {
        self.records.upsert(&self.to_persisted(record)?).await
    }

    /// Cell colour for an answer: the option's colour, or the default colour
    /// for anything that is not a configured label.
    pub fn color_for(&self, answer: &str) -> Result<Color, Error> {
        let hex = SentimentOption::find(&self.settings.buttons, answer)
            .filter(|o| !o.color.is_empty())
            .map(|o| o.color.as_str())
            .unwrap_or(&self.settings.default_color);
        Color::from_hex(hex)
    }

    /// Writes `value` into the record's cell, colours it, then persists.
    pub async fn answer(&self, record: &mut DateRecord, value: &str) -> Result<(), Error> {
        let color = self.color_for(value)?;
        let worksheet = self.provisioner.get_or_create(record.year()).await?;
        let cell = record.cell();

        self.sheets.update_cell(&worksheet, cell, value).await?;
        self.sheets
            .format_range(&worksheet, cell.as_range(), &CellFormat::answered(color))
            .await?;

        record.answer = value.to_string();
        self.save(record).await?;
        info!("(DateRecords) {} answered '{}' in {}!{}", record.date, value, worksheet.title, cell);
        Ok(())
    }

    /// Attaches `text` as the cell note and persists it on the record.
    pub async fn add_note(&self, record: &mut DateRecord, text: &str) -> Result<(), Error> {
        let worksheet = self.provisioner.get_or_create(record.year()).await?;
        let cell = record.cell();
        self.sheets.insert_note(&worksheet, cell, text).await?;

        record.note = text.to_string();
        self.save(record).await?;
        info!("(DateRecords) Note added for {} in {}!{}", record.date, worksheet.title, cell);
        Ok(())
    }

    pub fn daily_question_text(&self, record: &DateRecord) -> Result<String, Error> {
        let date = self.format_date(record.date)?;
        Ok(template::render(&self.settings.daily_message, &[("date", &date)]))
    }

    /// Summary shown once a day is answered. `selected` is the option the
    /// user just clicked, when known.
    pub fn done_text(&self, record: &DateRecord, selected: Option<&SentimentOption>) -> Result<String, Error> {
        let date = self.format_date(record.date)?;
        let (label, description) = match selected {
            Some(option) => (option.display().to_string(), option.label.clone()),
            None => {
                let emoji = SentimentOption::find(&self.settings.buttons, &record.answer)
                    .map(|o| o.emoji.clone())
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "❔".to_string());
                (emoji, record.answer.clone())
            }
        };

        let mut text = template::render(
            &self.settings.done_message,
            &[
                ("date", &date),
                ("button_label", &label),
                ("button_description", &description),
            ],
        );
        if !record.note.is_empty() {
            text.push_str(&format!("\n\n📝 _{}_", record.note));
        }
        Ok(text)
    }

    pub fn monthly_progress_text(&self, date: NaiveDate) -> Result<String, Error> {
        let date = self.format_date(date)?;
        Ok(template::render(&self.settings.monthly_progress_text, &[("date", &date)]))
    }

    pub fn view_result_text(&self, year: i32) -> String {
        template::render(&self.settings.view_command_result, &[("year", &year.to_string())])
    }
}
