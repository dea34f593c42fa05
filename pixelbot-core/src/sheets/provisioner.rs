// src/sheets/provisioner.rs

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pixelbot_common::models::{CellFormat, WorksheetHandle};
use pixelbot_common::traits::api::SpreadsheetApi;

use crate::Error;
use crate::sheets::coordinates::{month_range, YEAR_LABEL_CELL};

/// Hands out the worksheet for a year, cloning the template the first time a
/// year is needed. Handles are cached per year until invalidated.
pub struct WorksheetProvisioner {
    sheets: Arc<dyn SpreadsheetApi>,
    template_sheet_id: i64,
    cache: DashMap<i32, WorksheetHandle>,
    /// Years whose tab was cloned but not yet labelled and outlined.
    incomplete: DashSet<i32>,
    /// Serialises creation so two answers for a new year clone only once.
    create_lock: Mutex<()>,
}

impl WorksheetProvisioner {
    pub fn new(sheets: Arc<dyn SpreadsheetApi>, template_sheet_id: i64) -> Self {
        Self {
            sheets,
            template_sheet_id,
            cache: DashMap::new(),
            incomplete: DashSet::new(),
            create_lock: Mutex::new(()),
        }
    }

    /// Worksheet for `year`, creating it from the template when absent.
    pub async fn get_or_create(&self, year: i32) -> Result<WorksheetHandle, Error> {
        if let Some(handle) = self.cached(year) {
            return Ok(handle);
        }

        let _guard = self.create_lock.lock().await;
        if let Some(handle) = self.cached(year) {
            return Ok(handle);
        }

        let title = year.to_string();
        let handle = match self.sheets.find_worksheet(&title).await? {
            Some(existing) if self.incomplete.contains(&year) => {
                info!("(Provisioner) Resuming setup of worksheet '{}'", existing.title);
                self.finish(year, &existing).await?;
                existing
            }
            Some(existing) => existing,
            None => self.create(year).await?,
        };
        self.cache.insert(year, handle.clone());
        Ok(handle)
    }

    /// Worksheet for `year` if it already exists. Never creates one.
    pub async fn lookup(&self, year: i32) -> Result<WorksheetHandle, Error> {
        if let Some(handle) = self.cached(year) {
            return Ok(handle);
        }
        match self.sheets.find_worksheet(&year.to_string()).await? {
            Some(handle) => {
                self.cache.insert(year, handle.clone());
                Ok(handle)
            }
            None => Err(Error::NotFound("Year not found".into())),
        }
    }

    /// Forget the cached handle for `year`, e.g. after the tab was deleted
    /// by hand.
    pub fn invalidate(&self, year: i32) {
        self.cache.remove(&year);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    fn cached(&self, year: i32) -> Option<WorksheetHandle> {
        self.cache.get(&year).map(|entry| entry.value().clone())
    }

    async fn create(&self, year: i32) -> Result<WorksheetHandle, Error> {
        let title = year.to_string();
        info!(
            "(Provisioner) No worksheet for {year}; duplicating template sheet {}",
            self.template_sheet_id
        );

        let worksheet = self
            .sheets
            .duplicate_worksheet(self.template_sheet_id, 0, &title)
            .await?;
        self.incomplete.insert(year);
        self.finish(year, &worksheet).await?;

        info!("(Provisioner) Worksheet '{}' ready (sheet id {})", worksheet.title, worksheet.sheet_id);
        Ok(worksheet)
    }

    /// Labels and outlines a freshly cloned tab. Every step overwrites, so a
    /// tab left half done can be finished by running this again.
    async fn finish(&self, year: i32, worksheet: &WorksheetHandle) -> Result<(), Error> {
        let title = year.to_string();
        if let Err(e) = self.outline(year, worksheet, &title).await {
            warn!(
                "(Provisioner) Worksheet '{}' is incomplete; setup resumes on next use: {e}",
                worksheet.title
            );
            return Err(e);
        }
        self.incomplete.remove(&year);
        Ok(())
    }

    async fn outline(&self, year: i32, worksheet: &WorksheetHandle, title: &str) -> Result<(), Error> {
        self.sheets.update_cell(worksheet, YEAR_LABEL_CELL, title).await?;

        let outline = CellFormat::outlined();
        for month in 1..=12 {
            let range = month_range(year, month);
            debug!("(Provisioner) Outlining {} for {year}-{month:02}", range);
            self.sheets.format_range(worksheet, range, &outline).await?;
        }
        Ok(())
    }
}
