// File: pixelbot-core/tests/test_utils/fake_sheets.rs

use std::sync::Mutex;

use async_trait::async_trait;

use pixelbot_common::models::{CellAddress, CellFormat, CellRange, WorksheetHandle};
use pixelbot_common::traits::api::SpreadsheetApi;
use pixelbot_core::Error;

/// Everything the bot asked the spreadsheet to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCall {
    Duplicate { source: i64, index: i64, title: String },
    UpdateCell { title: String, cell: String, value: String },
    Format { title: String, range: String, format: CellFormat },
    Note { title: String, cell: String, note: String },
    Export { title: String },
}

/// In-memory spreadsheet that records every mutating call.
pub struct FakeSheets {
    worksheets: Mutex<Vec<WorksheetHandle>>,
    calls: Mutex<Vec<SheetCall>>,
    next_id: Mutex<i64>,
    failing_formats: Mutex<usize>,
    pdf: Vec<u8>,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self {
            worksheets: Mutex::new(vec![WorksheetHandle {
                sheet_id: 0,
                title: "Model".into(),
                index: 0,
            }]),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(1000),
            failing_formats: Mutex::new(0),
            pdf: b"%PDF-1.4 fake".to_vec(),
        }
    }

    pub fn with_worksheet(self, sheet_id: i64, title: &str) -> Self {
        self.worksheets.lock().unwrap().push(WorksheetHandle {
            sheet_id,
            title: title.into(),
            index: 1,
        });
        self
    }

    /// The next `n` format calls fail with an API error.
    pub fn fail_next_formats(&self, n: usize) {
        *self.failing_formats.lock().unwrap() = n;
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn duplicates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SheetCall::Duplicate { .. }))
            .count()
    }

    /// Ranges outlined with borders (and nothing else) on `title`.
    pub fn outlined_ranges(&self, title: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SheetCall::Format { title: t, range, format }
                    if t == title && format == CellFormat::outlined() =>
                {
                    Some(range)
                }
                _ => None,
            })
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.worksheets
            .lock()
            .unwrap()
            .iter()
            .map(|w| w.title.clone())
            .collect()
    }

    fn record(&self, call: SheetCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SpreadsheetApi for FakeSheets {
    async fn find_worksheet(&self, title: &str) -> Result<Option<WorksheetHandle>, Error> {
        Ok(self
            .worksheets
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.title == title)
            .cloned())
    }

    async fn duplicate_worksheet(
        &self,
        source_sheet_id: i64,
        insert_index: i64,
        new_title: &str,
    ) -> Result<WorksheetHandle, Error> {
        let mut sheets = self.worksheets.lock().unwrap();
        if !sheets.iter().any(|w| w.sheet_id == source_sheet_id) {
            return Err(Error::ExternalApi(format!("no sheet with id {source_sheet_id}")));
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let handle = WorksheetHandle {
            sheet_id: *next,
            title: new_title.into(),
            index: insert_index,
        };
        sheets.insert(0, handle.clone());
        self.record(SheetCall::Duplicate {
            source: source_sheet_id,
            index: insert_index,
            title: new_title.into(),
        });
        Ok(handle)
    }

    async fn update_cell(&self, worksheet: &WorksheetHandle, cell: CellAddress, value: &str) -> Result<(), Error> {
        self.record(SheetCall::UpdateCell {
            title: worksheet.title.clone(),
            cell: cell.a1(),
            value: value.into(),
        });
        Ok(())
    }

    async fn format_range(&self, worksheet: &WorksheetHandle, range: CellRange, format: &CellFormat) -> Result<(), Error> {
        {
            let mut failing = self.failing_formats.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(Error::ExternalApi("format rejected".into()));
            }
        }
        self.record(SheetCall::Format {
            title: worksheet.title.clone(),
            range: range.a1(),
            format: format.clone(),
        });
        Ok(())
    }

    async fn insert_note(&self, worksheet: &WorksheetHandle, cell: CellAddress, note: &str) -> Result<(), Error> {
        self.record(SheetCall::Note {
            title: worksheet.title.clone(),
            cell: cell.a1(),
            note: note.into(),
        });
        Ok(())
    }

    async fn export_pdf(&self, worksheet: &WorksheetHandle) -> Result<Vec<u8>, Error> {
        self.record(SheetCall::Export {
            title: worksheet.title.clone(),
        });
        Ok(self.pdf.clone())
    }
}
