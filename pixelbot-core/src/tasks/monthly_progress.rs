// src/tasks/monthly_progress.rs

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use tracing::{error, info, warn};
use twilight_model::http::attachment::Attachment;

use crate::render::IMAGE_FILENAME;
use crate::tasks::{channel_ids, sleep_until};
use crate::utils::time::{next_daily_run, progress_year_for, today_in};
use crate::{BotContext, Error};

/// Hour of the day (in the configured timezone) the progress image goes out.
const PROGRESS_HOUR: u32 = 9;

/// Spawns the task that, on the first of each month, posts the year's image.
/// January posts the year that just ended.
pub fn spawn_monthly_progress_task(ctx: Arc<BotContext>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let at = NaiveTime::from_hms_opt(PROGRESS_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        loop {
            let next = next_daily_run(Utc::now(), at, ctx.settings.timezone);
            sleep_until(next).await;

            let today = today_in(ctx.settings.timezone);
            let Some(year) = progress_year_for(today) else {
                continue;
            };
            if let Err(e) = post_monthly_progress(&ctx, year).await {
                error!("(MonthlyProgress) Posting {year} failed: {e:?}");
            }
        }
    })
}

pub async fn post_monthly_progress(ctx: &BotContext, year: i32) -> Result<(), Error> {
    info!("(MonthlyProgress) Rendering {year}");
    let png = ctx.renderer.render_year(year).await?;
    let content = ctx.dates.monthly_progress_text(today_in(ctx.settings.timezone))?;

    for channel_id in channel_ids(&ctx.settings.channels) {
        let attachment = Attachment::from_bytes(IMAGE_FILENAME.to_string(), png.clone(), 1);
        if let Err(e) = ctx
            .discord
            .create_message(channel_id)
            .content(&content)
            .attachments(&[attachment])
            .await
        {
            warn!("(MonthlyProgress) Could not post to channel {channel_id}: {e}");
        }
    }
    Ok(())
}
