//! Due-time evaluation and per-user local clock resolution.
//!
//! Both functions take the evaluation instant as a parameter; nothing here
//! reads the wall clock.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::CoreError;

/// Send time used when a profile has none or it cannot be parsed.
pub const DEFAULT_SEND_TIME: (u32, u32) = (7, 30);

/// A user's view of "now": local wall-clock time, calendar day and weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    pub now_local: NaiveDateTime,
    /// Calendar day key (`YYYY-MM-DD` when displayed), in the user's timezone.
    pub day: NaiveDate,
    pub weekday: Weekday,
}

impl LocalClock {
    /// Convert `now` into the wall-clock time of the IANA `timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTimezone`] if `timezone` is not a known IANA id.
    pub fn resolve(now: DateTime<Utc>, timezone: &str) -> Result<Self, CoreError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| CoreError::UnknownTimezone(timezone.to_string()))?;
        let now_local = now.with_timezone(&tz).naive_local();
        Ok(Self {
            now_local,
            day: now_local.date(),
            weekday: now_local.weekday(),
        })
    }

    /// English weekday name, e.g. `Saturday`.
    #[must_use]
    pub fn weekday_name(&self) -> String {
        self.now_local.format("%A").to_string()
    }

    #[must_use]
    pub fn is_due(&self, scheduled: Option<&str>) -> bool {
        is_due(self.now_local, scheduled)
    }
}

/// Parse a `HH:MM` (or `HH:MM:SS`) send time, falling back to 07:30.
#[must_use]
pub fn parse_send_time(raw: Option<&str>) -> NaiveTime {
    raw.map(str::trim)
        .and_then(|s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .ok()
        })
        .unwrap_or_else(|| {
            let (hour, minute) = DEFAULT_SEND_TIME;
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
        })
}

/// Whether the scheduled send time has been reached on `now_local`'s calendar day.
///
/// Never fails: an absent or malformed schedule means 07:30.
#[must_use]
pub fn is_due(now_local: NaiveDateTime, scheduled: Option<&str>) -> bool {
    let scheduled_at = now_local.date().and_time(parse_send_time(scheduled));
    now_local >= scheduled_at
}
