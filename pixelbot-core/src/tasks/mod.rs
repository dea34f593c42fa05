// src/tasks/mod.rs

pub mod daily_question;
pub mod monthly_progress;
pub mod ping;

pub use daily_question::spawn_daily_question_task;
pub use monthly_progress::spawn_monthly_progress_task;
pub use ping::spawn_ping_task;

use tracing::warn;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

/// Parses the configured channel ids, skipping (and logging) zero ids.
pub(crate) fn channel_ids(raw: &[u64]) -> Vec<Id<ChannelMarker>> {
    raw.iter()
        .filter_map(|&id| {
            let parsed = Id::<ChannelMarker>::new_checked(id);
            if parsed.is_none() {
                warn!("(Tasks) Ignoring invalid channel id {id}");
            }
            parsed
        })
        .collect()
}

/// Sleeps until `until`, or returns immediately if it already passed.
pub(crate) async fn sleep_until(until: chrono::DateTime<chrono::Utc>) {
    let wait = (until - chrono::Utc::now()).to_std().unwrap_or_default();
    tokio::time::sleep(wait).await;
}
