//! Core scheduling logic for Dosier.
//!
//! This crate computes recurring medication-dosing schedules and projects
//! them onto month-grid calendar views. It is deliberately free of any UI
//! or I/O concerns:
//! - Schedule: dose event generation from start time, interval, and span
//! - Calendar: 6x7 month-grid projection with per-day dose counts
//! - Format: shared date/time display and timestamp helpers
//!
//! All date arithmetic is naive local-clock arithmetic (`chrono::Naive*`
//! types). The "current" instant is never read implicitly; every
//! time-sensitive operation takes an explicit reference instant so callers
//! and tests control it deterministically.

pub mod calendar;
pub mod error;
pub mod format;
pub mod schedule;

pub use calendar::{CalendarDay, MonthGrid, adjacent_month, project};
pub use error::{ScheduleError, ScheduleResult};
pub use schedule::{
    DoseEvent, DoseSchedule, DoseSpan, compute_daily_hours, compute_schedule, display_text,
    doses_per_day, parse_start_time,
};
