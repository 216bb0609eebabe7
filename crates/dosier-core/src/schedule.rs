//! Dose schedule generation.
//!
//! A schedule is an immutable batch of [`DoseEvent`]s produced in one call
//! to [`compute_schedule`]: starting at the given time of day on the
//! reference date, one event every `interval_hours`, rolling across
//! calendar days until the requested dose count is reached. Recomputation
//! always replaces the whole batch; events are never mutated in place.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::format;

/// Hours in one dosing day.
pub const HOURS_PER_DAY: u32 = 24;

/// Valid day-count range for [`DoseSpan::Days`].
pub const DAY_SPAN_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

/// Valid dose-count range for [`DoseSpan::Doses`].
pub const DOSE_SPAN_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// One scheduled medication dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseEvent {
    /// Time of day as a 24-hour clock string, e.g. `"08:00"`.
    pub time: String,
    /// Wall-clock instant of this dose.
    pub at: NaiveDateTime,
    /// Whole-day difference between this dose's calendar date and the
    /// reference date (0 = today, negative = past).
    pub day_offset: i64,
    /// Human label combining time and relative-day qualifier,
    /// e.g. `"08:00 (Tomorrow)"`.
    pub display_text: String,
    /// Whether `day_offset` is zero.
    pub is_today: bool,
}

/// A computed dosing schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseSchedule {
    /// Dose events in strictly increasing order of `at`.
    pub events: Vec<DoseEvent>,
    /// Distinct times of day at which doses occur within a single day.
    ///
    /// Sorted lexicographically as strings, not chronologically: `"00:00"`
    /// sorts before `"08:00"`. Display code depends on this ordering.
    pub daily_hours: Vec<String>,
}

/// Schedule duration, in whichever unit the caller works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseSpan {
    /// A day count; resolves to `days * doses_per_day(interval)` doses.
    Days(u32),
    /// A direct dose count.
    Doses(u32),
}

impl DoseSpan {
    /// Resolves this span to a total dose count for the given interval.
    #[must_use]
    pub const fn total_doses(self, interval_hours: u32) -> u32 {
        match self {
            Self::Days(days) => days * doses_per_day(interval_hours),
            Self::Doses(count) => count,
        }
    }

    fn validate(self) -> ScheduleResult<()> {
        match self {
            Self::Days(days) if !DAY_SPAN_RANGE.contains(&days) => Err(
                ScheduleError::SpanOutOfRange(format!("{days} days (expected 1-30)")),
            ),
            Self::Doses(count) if !DOSE_SPAN_RANGE.contains(&count) => Err(
                ScheduleError::SpanOutOfRange(format!("{count} doses (expected 1-10)")),
            ),
            Self::Days(_) | Self::Doses(_) => Ok(()),
        }
    }
}

/// Returns how many doses fit in one day at the given interval.
///
/// Remainder hours of a non-divisor interval are unused: an 11-hour
/// interval gives 2 doses per day with an irregular last gap. That is the
/// documented cadence, not something to round away.
#[must_use]
pub const fn doses_per_day(interval_hours: u32) -> u32 {
    HOURS_PER_DAY / interval_hours
}

/// Parses a `"HH:MM"` start time string.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidStartTime`] when the string is not a
/// valid 24-hour `HH:MM` time.
pub fn parse_start_time(raw: &str) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ScheduleError::InvalidStartTime(raw.to_string()))
}

/// Builds the human label for a dose at the given day offset.
#[must_use]
pub fn display_text(time: &str, day_offset: i64) -> String {
    match day_offset {
        0 => format!("{time} (Today)"),
        1 => format!("{time} (Tomorrow)"),
        -1 => format!("{time} (Yesterday)"),
        n if n > 1 => format!("{time} (In {n} days)"),
        n => format!("{time} ({} days ago)", -n),
    }
}

fn validate_interval(interval_hours: u32) -> ScheduleResult<()> {
    if (1..=HOURS_PER_DAY).contains(&interval_hours) {
        Ok(())
    } else {
        Err(ScheduleError::IntervalOutOfRange(interval_hours))
    }
}

/// Computes the full dose schedule.
///
/// Events start at `start` on `now`'s calendar date and repeat every
/// `interval_hours` until the span's dose count is reached. `now` is the
/// reference instant: day offsets and `is_today` flags are computed
/// against its calendar date, so callers re-run this whenever the wall
/// clock crosses a day boundary.
///
/// # Errors
///
/// Returns [`ScheduleError`] when the interval or span is out of range.
pub fn compute_schedule(
    start: NaiveTime,
    interval_hours: u32,
    span: DoseSpan,
    now: NaiveDateTime,
) -> ScheduleResult<DoseSchedule> {
    validate_interval(interval_hours)?;
    span.validate()?;

    let today = now.date();
    let total = span.total_doses(interval_hours);
    let step = Duration::hours(i64::from(interval_hours));

    let mut at = today.and_time(start);
    let mut events = Vec::with_capacity(total as usize);
    for _ in 0..total {
        let time = format::clock_time_at(at);
        let day_offset = (at.date() - today).num_days();
        events.push(DoseEvent {
            display_text: display_text(&time, day_offset),
            is_today: day_offset == 0,
            time,
            at,
            day_offset,
        });
        at += step;
    }

    tracing::debug!(
        doses = events.len(),
        interval_hours,
        "computed dose schedule"
    );

    Ok(DoseSchedule {
        events,
        daily_hours: compute_daily_hours(start, interval_hours)?,
    })
}

/// Computes the distinct times of day visited in one 24-hour cycle.
///
/// Walks forward from the start hour in `interval_hours` steps, wrapping
/// past midnight, for exactly `doses_per_day(interval_hours)` steps. The
/// result is sorted lexicographically as strings (see
/// [`DoseSchedule::daily_hours`]); callers needing chronological order
/// must re-sort.
///
/// # Errors
///
/// Returns [`ScheduleError::IntervalOutOfRange`] when the interval is not
/// in `1..=24`.
pub fn compute_daily_hours(start: NaiveTime, interval_hours: u32) -> ScheduleResult<Vec<String>> {
    use chrono::Timelike;

    validate_interval(interval_hours)?;

    let minute = start.minute();
    let mut hours: Vec<String> = (0..doses_per_day(interval_hours))
        .map(|step| {
            let hour = (start.hour() + step * interval_hours) % HOURS_PER_DAY;
            format!("{hour:02}:{minute:02}")
        })
        .collect();
    hours.sort_unstable();
    Ok(hours)
}
