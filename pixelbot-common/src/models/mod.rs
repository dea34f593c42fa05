// File: pixelbot-common/src/models/mod.rs
pub mod record;
pub mod sentiment;
pub mod sheet;

pub use record::PersistedRecord;
pub use sentiment::{default_options, SentimentOption};
pub use sheet::{Border, Borders, CellAddress, CellFormat, CellRange, Color, TextFormat, WorksheetHandle};
