use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::{DISPLAY_DATE_FORMAT, ISO_DATE_FORMAT};

/// Timezone the dashboard's users record shifts in.
/// Spreadsheet date cells arrive as UTC instants and are converted back to
/// calendar dates in this timezone.
pub const DEFAULT_SHIFT_TZ: Tz = chrono_tz::Europe::London;

/// Converts a UTC instant to the calendar date in the given timezone.
pub fn shift_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in the default shift timezone.
pub fn shift_date_today() -> NaiveDate {
    shift_date_from_utc(Utc::now(), DEFAULT_SHIFT_TZ)
}

/// Parses a date written as `YYYY-MM-DD`, `DD/MM/YYYY`, or an RFC 3339
/// timestamp (a serialized spreadsheet date cell). Returns `None` otherwise.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DISPLAY_DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| shift_date_from_utc(dt.with_timezone(&Utc), DEFAULT_SHIFT_TZ))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
