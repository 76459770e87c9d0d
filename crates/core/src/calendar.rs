//! Week anchoring and weekly table naming.
//!
//! Every weekly table is keyed by the date of its anchor weekday. The
//! anchor for an instant is the most recent occurrence of that weekday
//! at or before the instant's UTC date. The rule never looks forward, so
//! two runs inside the same week always resolve to the same table.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::types::Timestamp;

/// Weekday new tables are anchored on unless configured otherwise.
pub const DEFAULT_ANCHOR_WEEKDAY: Weekday = Weekday::Tue;

/// Separator between the table prefix and the anchor date.
pub const NAME_SEPARATOR: &str = " - ";

/// Fixed-width date format; name order equals date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Most recent `anchor` weekday at or before `now` (UTC date).
pub fn anchor_date(now: Timestamp, anchor: Weekday) -> NaiveDate {
    let today = now.date_naive();
    let back = days_since(today.weekday(), anchor);
    today
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(today)
}

/// Days to walk back from `from` to reach `anchor` (0..=6).
fn days_since(from: Weekday, anchor: Weekday) -> u32 {
    (from.num_days_from_monday() + 7 - anchor.num_days_from_monday()) % 7
}

/// Whether `now` falls on the anchor weekday itself.
pub fn is_anchor_day(now: Timestamp, anchor: Weekday) -> bool {
    now.weekday() == anchor
}

/// `"{prefix} - {YYYY-MM-DD}"`.
pub fn table_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{NAME_SEPARATOR}{}", date.format(DATE_FORMAT))
}

/// Table name for the week containing `now`.
pub fn weekly_table_name(prefix: &str, now: Timestamp, anchor: Weekday) -> String {
    table_name(prefix, anchor_date(now, anchor))
}

/// Parse a weekday name such as `tue`, `Tuesday` or `TUE`.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}
