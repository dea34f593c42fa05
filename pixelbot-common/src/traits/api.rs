use async_trait::async_trait;

use crate::error::Error;
use crate::models::{CellAddress, CellFormat, CellRange, WorksheetHandle};

/// The spreadsheet operations the bot relies on. All calls address the one
/// spreadsheet the implementation was opened with.
#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    /// `Ok(None)` when no worksheet carries that exact title.
    async fn find_worksheet(&self, title: &str) -> Result<Option<WorksheetHandle>, Error>;

    async fn duplicate_worksheet(
        &self,
        source_sheet_id: i64,
        insert_index: i64,
        new_title: &str,
    ) -> Result<WorksheetHandle, Error>;

    async fn update_cell(&self, worksheet: &WorksheetHandle, cell: CellAddress, value: &str) -> Result<(), Error>;

    async fn format_range(&self, worksheet: &WorksheetHandle, range: CellRange, format: &CellFormat) -> Result<(), Error>;

    async fn insert_note(&self, worksheet: &WorksheetHandle, cell: CellAddress, note: &str) -> Result<(), Error>;

    /// The worksheet exported as a PDF document.
    async fn export_pdf(&self, worksheet: &WorksheetHandle) -> Result<Vec<u8>, Error>;
}

/// Rasterized page: tightly packed RGB8 pixels, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Turns the first page of a PDF document into pixels.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize_first_page(&self, pdf: Vec<u8>, dpi: u32) -> Result<RasterPage, Error>;
}
