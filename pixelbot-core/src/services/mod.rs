// File: src/services/mod.rs

pub mod date_record_service;
pub mod discord;

pub use date_record_service::{DateRecord, DateRecordService};
