//! Everything that touches the Year in Pixels spreadsheet: where a date
//! lives on the grid, how yearly worksheets come to exist, and the Google
//! Sheets client behind [`SpreadsheetApi`](pixelbot_common::traits::api::SpreadsheetApi).

pub mod auth;
pub mod client;
pub mod coordinates;
pub mod provisioner;

pub use client::GoogleSheetsClient;
pub use provisioner::WorksheetProvisioner;
