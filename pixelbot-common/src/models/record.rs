use serde::{Deserialize, Serialize};

/// Storage representation of a date record. The date is kept in the
/// configured display format so the store stays readable by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub message_id: Option<String>,
    pub date: String,
    pub answer: String,
    pub note: String,
}

impl PersistedRecord {
    /// Key the record is upserted under. Records that were never linked to a
    /// chat message share one slot per date.
    pub fn storage_key(&self) -> String {
        match &self.message_id {
            Some(id) => id.clone(),
            None => format!("date:{}", self.date),
        }
    }
}
