// src/repositories/sqlite/date_records.rs

use async_trait::async_trait;
use sqlx::Row;

use pixelbot_common::models::PersistedRecord;
use pixelbot_common::traits::repository_traits::DateRecordRepository;

use crate::Error;
use crate::utils::time::current_epoch;

pub struct SqliteDateRecordRepository {
    pub pool: sqlx::Pool<sqlx::Sqlite>,
}

impl SqliteDateRecordRepository {
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DateRecordRepository for SqliteDateRecordRepository {
    async fn get_by_message_id(&self, message_id: &str) -> Result<Option<PersistedRecord>, Error> {
        let row = sqlx::query(
            r#"
            SELECT message_id, date, answer, note
            FROM date_records
            WHERE message_id = ?
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(PersistedRecord {
                message_id: r.try_get("message_id")?,
                date: r.try_get("date")?,
                answer: r.try_get("answer")?,
                note: r.try_get("note")?,
            })),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &PersistedRecord) -> Result<(), Error> {
        let now = current_epoch();
        sqlx::query(
            r#"
            INSERT INTO date_records (record_key, message_id, date, answer, note, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(record_key) DO UPDATE SET
                message_id = excluded.message_id,
                date = excluded.date,
                answer = excluded.answer,
                note = excluded.note,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.storage_key())
        .bind(&record.message_id)
        .bind(&record.date)
        .bind(&record.answer)
        .bind(&record.note)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM date_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}
