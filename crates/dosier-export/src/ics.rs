//! iCalendar document generation (RFC 5545).
//!
//! The ICS export is fully expanded: one VEVENT per dose, no recurrence
//! compression. Importers therefore see the exact cadence even when the
//! interval does not divide 24, which no RRULE could express.

use chrono::NaiveDateTime;

use dosier_core::format::utc_stamp;
use dosier_core::schedule::DoseEvent;

use crate::error::{ExportError, ExportResult};

/// Product identifier stamped into every exported calendar.
pub const PRODID: &str = "-//Dosier//Dosier Medication Schedule//EN";

/// Calendar display name (`X-WR-CALNAME`).
pub const CALENDAR_NAME: &str = "Medication Schedule";

/// Escapes a text property value (RFC 5545 §3.3.11).
///
/// Backslash, semicolon, and comma are backslash-escaped; newlines become
/// the literal `\n` sequence.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Builds the ICS document for a schedule.
///
/// Each dose becomes a zero-duration VEVENT (`DTSTART` == `DTEND`) with a
/// 15-minute-before display alarm and a `dose i of N` description. UIDs
/// combine the generation stamp with the event index, so re-exports get
/// fresh UIDs while one export stays internally unique. Lines are joined
/// with CRLF as the format requires.
///
/// # Errors
///
/// Returns [`ExportError::EmptySchedule`] when there are no events.
pub fn build_ics(
    schedule: &[DoseEvent],
    title: &str,
    generated_at: NaiveDateTime,
) -> ExportResult<String> {
    if schedule.is_empty() {
        return Err(ExportError::EmptySchedule);
    }

    let stamp = utc_stamp(generated_at);
    let total = schedule.len();
    let summary = escape_text(title);

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
        format!("X-WR-CALNAME:{CALENDAR_NAME}"),
        "X-WR-TIMEZONE:UTC".into(),
    ];

    for (index, event) in schedule.iter().enumerate() {
        let start = utc_stamp(event.at);
        lines.extend([
            "BEGIN:VEVENT".into(),
            format!("UID:{stamp}-{index}@dosier"),
            format!("DTSTAMP:{stamp}"),
            format!("DTSTART:{start}"),
            format!("DTEND:{start}"),
            format!("SUMMARY:{summary}"),
            format!(
                "DESCRIPTION:Medication reminder (dose {} of {total})",
                index + 1
            ),
            "STATUS:CONFIRMED".into(),
            "SEQUENCE:0".into(),
            "BEGIN:VALARM".into(),
            "TRIGGER:-PT15M".into(),
            "DESCRIPTION:Medication Reminder".into(),
            "ACTION:DISPLAY".into(),
            "END:VALARM".into(),
            "END:VEVENT".into(),
        ]);
    }

    lines.push("END:VCALENDAR".into());

    tracing::debug!(events = total, "built ICS document");

    Ok(lines.join("\r\n"))
}
