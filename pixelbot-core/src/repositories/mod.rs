pub mod sqlite;

pub use sqlite::SqliteDateRecordRepository;
