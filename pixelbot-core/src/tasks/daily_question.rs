// src/tasks/daily_question.rs

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use crate::services::DateRecordService;
use crate::services::discord::components::sentiment_components;
use crate::services::discord::platform_err;
use crate::tasks::{channel_ids, sleep_until};
use crate::utils::time::next_daily_run;
use crate::{BotContext, Error};

/// Spawns the task that posts the daily question at the configured time,
/// once per day, in every configured channel.
pub fn spawn_daily_question_task(ctx: Arc<BotContext>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let next = next_daily_run(Utc::now(), ctx.settings.daily_message_time, ctx.settings.timezone);
            info!("(DailyQuestion) Next daily question at {next}");
            sleep_until(next).await;

            if let Err(e) = post_daily_question(&ctx).await {
                error!("(DailyQuestion) Posting failed: {e:?}");
            }
        }
    })
}

/// Posts today's question to every configured channel.
pub async fn post_daily_question(ctx: &BotContext) -> Result<usize, Error> {
    let components = sentiment_components(&ctx.settings);
    let components = &components;
    let channels = channel_ids(&ctx.settings.channels);

    post_to_channels(&ctx.dates, &channels, |channel_id, content| async move {
        let message = ctx
            .discord
            .create_message(channel_id)
            .content(&content)
            .components(components)
            .await
            .map_err(platform_err("Could not post daily question"))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Could not read posted question: {e}")))?;
        Ok::<_, Error>(message.id.to_string())
    })
    .await
}

/// Sends today's question through `send` to each channel and stores one
/// record per posted message. A channel whose send or save fails is logged
/// and skipped. Returns how many channels got a linked record.
pub(crate) async fn post_to_channels<F, Fut>(
    dates: &DateRecordService,
    channels: &[Id<ChannelMarker>],
    send: F,
) -> Result<usize, Error>
where
    F: Fn(Id<ChannelMarker>, String) -> Fut,
    Fut: Future<Output = Result<String, Error>>,
{
    let mut posted = 0;
    for &channel_id in channels {
        let mut record = dates.today();
        let content = dates.daily_question_text(&record)?;

        let message_id = match send(channel_id, content).await {
            Ok(id) => id,
            Err(e) => {
                error!("(DailyQuestion) Could not post to channel {channel_id}: {e}");
                continue;
            }
        };

        record.message_id = Some(message_id);
        if let Err(e) = dates.save(&record).await {
            error!("(DailyQuestion) Question posted to {channel_id} but its record was not saved: {e}");
            continue;
        }
        posted += 1;
    }
    info!("(DailyQuestion) Daily question posted to {posted} channel(s)");
    Ok(posted)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mockall::mock;

    use pixelbot_common::models::{CellAddress, CellFormat, CellRange, PersistedRecord, WorksheetHandle};
    use pixelbot_common::traits::api::SpreadsheetApi;
    use pixelbot_common::traits::repository_traits::DateRecordRepository;

    use super::*;
    use crate::config::Settings;
    use crate::sheets::WorksheetProvisioner;

    mock! {
        Records {}
        #[async_trait]
        impl DateRecordRepository for Records {
            async fn get_by_message_id(&self, message_id: &str) -> Result<Option<PersistedRecord>, Error>;
            async fn upsert(&self, record: &PersistedRecord) -> Result<(), Error>;
            async fn count(&self) -> Result<i64, Error>;
        }
    }

    mock! {
        Sheets {}
        #[async_trait]
        impl SpreadsheetApi for Sheets {
            async fn find_worksheet(&self, title: &str) -> Result<Option<WorksheetHandle>, Error>;
            async fn duplicate_worksheet(&self, source_sheet_id: i64, insert_index: i64, new_title: &str) -> Result<WorksheetHandle, Error>;
            async fn update_cell(&self, worksheet: &WorksheetHandle, cell: CellAddress, value: &str) -> Result<(), Error>;
            async fn format_range(&self, worksheet: &WorksheetHandle, range: CellRange, format: &CellFormat) -> Result<(), Error>;
            async fn insert_note(&self, worksheet: &WorksheetHandle, cell: CellAddress, note: &str) -> Result<(), Error>;
            async fn export_pdf(&self, worksheet: &WorksheetHandle) -> Result<Vec<u8>, Error>;
        }
    }

    fn service(records: MockRecords) -> DateRecordService {
        let map: HashMap<&str, &str> = [("BOT_TOKEN", "t"), ("SPREADSHEET_ID", "s")].into_iter().collect();
        let settings = Settings::from_lookup(|k| map.get(k).map(|v| v.to_string())).unwrap();
        let sheets: Arc<dyn SpreadsheetApi> = Arc::new(MockSheets::new());
        DateRecordService::new(
            Arc::new(records),
            sheets.clone(),
            Arc::new(WorksheetProvisioner::new(sheets, 0)),
            Arc::new(settings),
        )
    }

    fn linked_to(id: &'static str) -> impl Fn(&PersistedRecord) -> bool + Send + 'static {
        move |r| r.message_id.as_deref() == Some(id)
    }

    #[tokio::test]
    async fn failed_save_does_not_stop_later_channels() {
        let mut records = MockRecords::new();
        records
            .expect_upsert()
            .withf(linked_to("m1"))
            .times(1)
            .returning(|_| Err(Error::Database(sqlx::Error::PoolClosed)));
        records
            .expect_upsert()
            .withf(linked_to("m2"))
            .times(1)
            .returning(|_| Ok(()));
        let dates = service(records);

        let sent = Mutex::new(Vec::new());
        let channels = [Id::new(1), Id::new(2)];
        let posted = post_to_channels(&dates, &channels, |channel_id, _content| {
            sent.lock().unwrap().push(channel_id.get());
            let id = format!("m{}", channel_id.get());
            async move { Ok::<_, Error>(id) }
        })
        .await
        .unwrap();

        assert_eq!(posted, 1);
        assert_eq!(*sent.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_send_saves_nothing_for_that_channel() {
        let mut records = MockRecords::new();
        records
            .expect_upsert()
            .withf(linked_to("m2"))
            .times(1)
            .returning(|_| Ok(()));
        let dates = service(records);

        let channels = [Id::new(1), Id::new(2)];
        let posted = post_to_channels(&dates, &channels, |channel_id, _content| {
            let result = if channel_id.get() == 1 {
                Err(Error::Platform("missing access".into()))
            } else {
                Ok(format!("m{}", channel_id.get()))
            };
            async move { result }
        })
        .await
        .unwrap();

        assert_eq!(posted, 1);
    }
}
