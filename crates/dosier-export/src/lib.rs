//! Calendar export encoding for Dosier.
//!
//! Turns a computed dose schedule into external calendar formats:
//! - `ics`: a fully expanded iCalendar document (RFC 5545), one VEVENT
//!   per dose with a display alarm
//! - `google`: Google Calendar quick-add URLs, collapsing same
//!   time-of-day doses into one daily recurrence link each
//!
//! Both exports treat the schedule as an immutable value and never
//! recompute it; failure paths degrade to [`ExportError::EmptySchedule`]
//! rather than emitting malformed output.

pub mod error;
pub mod google;
pub mod ics;

pub use error::{ExportError, ExportResult};
pub use google::{
    GoogleExport, GoogleLink, GoogleSummary, SeedSlot, SlotKey, build_google_links,
    first_day_slots, group_by_time_of_day,
};
pub use ics::build_ics;
