//! Date and time formatting helpers shared across the workspace.
//!
//! Everything here formats `chrono::Naive*` values: the scheduler works in
//! naive local-clock time, and the export side stamps those naive values
//! verbatim with a `Z` suffix (matching what calendar consumers expect from
//! the quick-add flow, where no time zone conversion is wanted).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Formats a time of day as a 24-hour clock string, e.g. `"08:00"`.
#[must_use]
pub fn clock_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Formats the time-of-day portion of an instant, e.g. `"20:00"`.
#[must_use]
pub fn clock_time_at(at: NaiveDateTime) -> String {
    clock_time(at.time())
}

/// Formats an instant as a compact UTC stamp, e.g. `"20231123T200000Z"`.
///
/// Used for ICS `DTSTAMP`/`DTSTART`/`DTEND` values and the `dates=`
/// parameter of Google Calendar URLs (RFC 5545 §3.3.5 form 2).
#[must_use]
pub fn utc_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Formats a date with its weekday, e.g. `"Sat, Mar 15"`.
#[must_use]
pub fn date_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Formats a date without its weekday, e.g. `"Mar 15"`.
#[must_use]
pub fn day_month_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Formats a start/end pair as a display range,
/// e.g. `"Mar 15 · 08:00 → Mar 21 · 16:00"`.
#[must_use]
pub fn range_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{} · {} → {} · {}",
        day_month_label(start.date()),
        clock_time_at(start),
        day_month_label(end.date()),
        clock_time_at(end)
    )
}
