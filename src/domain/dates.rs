/// Date-key helpers
///
/// Records are keyed by calendar day in `YYYY-MM-DD` form. These helpers
/// produce and parse those keys and compute trailing date windows.

use chrono::{Duration, NaiveDate, Utc};

/// Format used for date keys in storage and tool parameters
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Today's date (UTC)
pub fn today() -> NaiveDate {
    Utc::now().naive_utc().date()
}

/// Today's date key
pub fn today_key() -> String {
    date_key(today())
}

/// Render a date as a storage key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a date key
///
/// Spreadsheet-style values such as `2024-06-01 00:00:00` are accepted by
/// looking only at the leading date part.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, DATE_KEY_FORMAT).ok()
}

/// The last `days` dates ending at `end` (inclusive), newest first
pub fn date_range(days: u32, end: NaiveDate) -> Vec<NaiveDate> {
    (0..days as i64).map(|i| end - Duration::days(i)).collect()
}
