//! Calendar utilities: DD-MM fragment resolution, renewal arithmetic,
//! timezone-aware receipt dates.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// A partial date pulled out of message text, e.g. "10-06" or "14-05-2025".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFragment {
    pub day: u32,
    pub month: u32,
    /// Present only when the message spells out a 4-digit year
    pub year: Option<i32>,
}

/// Resolve a DD-MM fragment against the reference date's year.
///
/// Messages rarely carry a year, so "10-06" is assumed to belong to the
/// reference year. Known limitation: a message from a previous year that is
/// scanned late resolves into the wrong year. Invalid day/month combinations
/// get `None`.
pub fn resolve_day_month(frag: DateFragment, reference: NaiveDate) -> Option<NaiveDate> {
    let year = frag.year.unwrap_or_else(|| reference.year());
    NaiveDate::from_ymd_opt(year, frag.month, frag.day)
}

/// Add one calendar month, clamping the day to the target month's length
/// (Jan 31 -> Feb 28, or Feb 29 in a leap year).
pub fn add_one_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let day = date.day().min(days_in_month(year, month));
    // Valid by construction: day is clamped to the month length.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = NaiveDate::from_ymd_opt(ny, nm, 1);
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        _ => 30,
    }
}

/// Parse an IANA timezone name like "Asia/Kolkata".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// The calendar date of a UTC instant in the given timezone.
///
/// A message received 2025-06-10 20:30 UTC lands on 2025-06-11 in IST.
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}
