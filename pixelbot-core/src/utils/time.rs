use std::fmt::{self, Write};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Returns the current epoch seconds.
pub fn current_epoch() -> i64 {
    Utc::now().timestamp()
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Formats `date` with a strftime pattern, as the wall clock at midnight.
/// Time fields such as `%H` render as zero; fields needing an offset (`%z`)
/// are an error instead of a panic.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", date.and_time(NaiveTime::MIN).format(pattern))?;
    Ok(out)
}

/// Next instant strictly after `now` at which the wall clock in `tz` reads
/// `at`. Days where `at` does not exist (DST gaps) are skipped; ambiguous
/// times resolve to the earlier instant.
pub fn next_daily_run(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut day = now.with_timezone(&tz).date_naive();
    loop {
        if let Some(candidate) = tz.from_local_datetime(&day.and_time(at)).earliest() {
            let candidate = candidate.with_timezone(&Utc);
            if candidate > now {
                return candidate;
            }
        }
        day += Duration::days(1);
    }
}

/// Year whose progress is posted on `date`: only on the first of a month,
/// and January reports the year that just ended.
pub fn progress_year_for(date: NaiveDate) -> Option<i32> {
    if date.day() != 1 {
        return None;
    }
    if date.month() == 1 {
        Some(date.year() - 1)
    } else {
        Some(date.year())
    }
}
