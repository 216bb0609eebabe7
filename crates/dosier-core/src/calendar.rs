//! Month-grid calendar projection.
//!
//! Maps a dose schedule onto a fixed 6x7 grid for a target month. The grid
//! is regenerated on every call; month navigation is a pure function of
//! `(year, month)`, so no view state lives here.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::DoseEvent;

/// Cells in the month grid: 6 weeks of 7 days.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Calendar date this cell represents.
    pub date: NaiveDate,
    /// Day of month, 1-based.
    pub day: u32,
    /// False for lead/trail days filled in from adjacent months.
    pub is_current_month: bool,
    /// Whether this cell is the reference "today".
    pub is_today: bool,
    /// Whether any dose falls on this date.
    pub has_medicine: bool,
    /// Number of doses on this date (date equality, time ignored).
    pub medicine_count: usize,
}

/// A projected month: exactly [`GRID_CELLS`] cells plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    /// Grid cells in row-major order, starting on a Sunday.
    pub cells: Vec<CalendarDay>,
    /// Month label for display, e.g. `"March 2024"`.
    pub label: String,
}

/// Projects a schedule onto the month grid for `(year, month)`.
///
/// `month` is 1-based (January = 1). The grid starts on the Sunday on or
/// before the first day of the month and always spans 42 cells, so lead
/// and trail days of adjacent months are included with
/// `is_current_month = false`. A schedule with no events in the month
/// yields a grid with every `has_medicine = false`.
///
/// # Errors
///
/// Returns [`ScheduleError::MonthOutOfRange`] when `month` is not in
/// `1..=12`.
pub fn project(
    events: &[DoseEvent],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> ScheduleResult<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ScheduleError::MonthOutOfRange(month))?;

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.at.date()).or_default() += 1;
    }

    // Sunday on or before the first of the month.
    let lead_days = first.weekday().num_days_from_sunday();
    let grid_start = first - Duration::days(i64::from(lead_days));

    let cells = (0..GRID_CELLS)
        .map(|index| {
            let date = grid_start + Duration::days(index as i64);
            let medicine_count = counts.get(&date).copied().unwrap_or(0);
            CalendarDay {
                date,
                day: date.day(),
                is_current_month: date.month() == month && date.year() == year,
                is_today: date == today,
                has_medicine: medicine_count > 0,
                medicine_count,
            }
        })
        .collect();

    Ok(MonthGrid {
        cells,
        label: first.format("%B %Y").to_string(),
    })
}

/// Steps `(year, month)` by `delta` months, rolling the year as needed.
///
/// `month` is 1-based; `delta` is typically `1` or `-1` for next/previous
/// navigation but any offset works.
#[must_use]
pub fn adjacent_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let months = year * 12 + month as i32 - 1 + delta;
    (months.div_euclid(12), months.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DoseSpan, compute_schedule, parse_start_time};
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now_at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(7, 0, 0).unwrap()
    }

    #[test]
    fn grid_always_has_42_cells() {
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        assert_eq!(grid.cells.len(), GRID_CELLS);
    }

    #[test]
    fn march_2024_has_31_current_month_days() {
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        let current = grid.cells.iter().filter(|c| c.is_current_month).count();
        assert_eq!(current, 31);
    }

    #[test]
    fn grid_starts_on_sunday_before_the_first() {
        // 2024-03-01 is a Friday; the grid starts the preceding Sunday.
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        assert_eq!(grid.cells[0].date, date(2024, 2, 25));
        assert!(!grid.cells[0].is_current_month);
    }

    #[test]
    fn month_label_is_full_month_and_year() {
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        assert_eq!(grid.label, "March 2024");
    }

    #[test]
    fn dose_counts_accumulate_per_date() {
        let schedule =
            compute_schedule(
                parse_start_time("08:00").unwrap(),
                12,
                DoseSpan::Days(2),
                now_at(2024, 3, 15),
            )
            .unwrap();

        let grid = project(&schedule.events, 2024, 3, date(2024, 3, 15)).unwrap();
        let march_15 = grid
            .cells
            .iter()
            .find(|c| c.day == 15 && c.is_current_month)
            .unwrap();

        // 08:00 and 20:00 both fall on the 15th.
        assert!(march_15.has_medicine);
        assert_eq!(march_15.medicine_count, 2);
    }

    #[test]
    fn empty_schedule_marks_no_medicine_days() {
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        assert!(grid.cells.iter().all(|c| !c.has_medicine));
        assert!(grid.cells.iter().all(|c| c.medicine_count == 0));
    }

    #[test]
    fn today_flag_follows_the_reference_date() {
        let grid = project(&[], 2024, 3, date(2024, 3, 15)).unwrap();
        let today_cells: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].date, date(2024, 3, 15));

        // Reference date outside the displayed month: no cell is today.
        let grid = project(&[], 2024, 6, date(2024, 3, 15)).unwrap();
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn invalid_month_is_rejected() {
        for month in [0, 13] {
            assert!(matches!(
                project(&[], 2024, month, date(2024, 3, 15)),
                Err(ScheduleError::MonthOutOfRange(got)) if got == month
            ));
        }
    }

    #[test]
    fn adjacent_month_rolls_the_year() {
        assert_eq!(adjacent_month(2024, 12, 1), (2025, 1));
        assert_eq!(adjacent_month(2024, 1, -1), (2023, 12));
        assert_eq!(adjacent_month(2024, 6, 1), (2024, 7));
        assert_eq!(adjacent_month(2024, 6, -18), (2022, 12));
    }
}
