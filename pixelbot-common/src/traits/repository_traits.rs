use async_trait::async_trait;

use crate::error::Error;
use crate::models::PersistedRecord;

/// Keyed store of date records. Implementations never hold more than one
/// record per storage key (see [`PersistedRecord::storage_key`]).
#[async_trait]
pub trait DateRecordRepository: Send + Sync {
    async fn get_by_message_id(&self, message_id: &str) -> Result<Option<PersistedRecord>, Error>;

    /// Insert the record, or overwrite the one stored under the same key.
    async fn upsert(&self, record: &PersistedRecord) -> Result<(), Error>;

    async fn count(&self) -> Result<i64, Error>;
}
