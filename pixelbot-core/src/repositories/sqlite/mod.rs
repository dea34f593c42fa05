// src/repositories/sqlite/mod.rs

pub mod date_records;

pub use self::date_records::SqliteDateRecordRepository;
