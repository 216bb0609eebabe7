//! Google Calendar quick-add link generation.
//!
//! Google's quick-add URL can only express daily recurrence, so a
//! multi-dose schedule is collapsed with a fixed two-step pipeline: group
//! events by time of day, then keep one seed occurrence per group from the
//! schedule's first 24 hours. Each seed becomes one link with a
//! `FREQ=DAILY;COUNT=n` rule. Intervals that do not divide 24 drift across
//! days and cannot be represented this way; those exports carry a warning
//! and the ICS download remains the exact option.

use std::collections::BTreeMap;

use chrono::{Duration, Timelike};
use serde::Serialize;

use dosier_core::format::{clock_time_at, date_label, range_label, utc_stamp};
use dosier_core::schedule::{DoseEvent, HOURS_PER_DAY};

use crate::error::{ExportError, ExportResult};

/// Base endpoint for quick-add links.
pub const GOOGLE_CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render";

/// Details text attached to every exported event.
const EVENT_DETAILS: &str = "Medication reminder";

/// Warning shown when the interval cannot be expressed as a daily rule.
pub const IRREGULAR_INTERVAL_WARNING: &str = "These quick links cover the first 24 hours. \
     For irregular spacing, use the .ics download for full accuracy.";

/// A time-of-day grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotKey {
    pub hour: u32,
    pub minute: u32,
}

impl SlotKey {
    /// Returns the key for an event's time of day.
    #[must_use]
    pub fn of(event: &DoseEvent) -> Self {
        Self {
            hour: event.at.hour(),
            minute: event.at.minute(),
        }
    }
}

/// The earliest occurrence of a recurring time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSlot {
    pub key: SlotKey,
    pub event: DoseEvent,
}

/// One quick-add link plus its display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleLink {
    /// Quick-add URL for this time slot.
    pub url: String,
    /// Time of day, e.g. `"08:00"`.
    pub time_label: String,
    /// First-to-last occurrence range, e.g. `"Mar 15 · 08:00 → Mar 21 · 08:00"`.
    pub range_label: String,
    /// Dose count label, e.g. `"7 doses total"`.
    pub dose_label: String,
    /// Occurrences collapsed into this link.
    pub occurrence_count: usize,
}

/// Human summary of the exported schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleSummary {
    /// First dose, e.g. `"Fri, Mar 15 · 08:00"`.
    pub starts: String,
    /// Last dose date, e.g. `"Thu, Mar 21"`.
    pub ends: String,
    /// Cadence label, e.g. `"Every 8h · 7 days"`.
    pub repeats: String,
    /// Total dose count across all links.
    pub total_doses: usize,
}

/// Full quick-add export: links, summary, and an optional warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleExport {
    pub links: Vec<GoogleLink>,
    pub summary: GoogleSummary,
    /// Set when the interval does not divide 24 evenly.
    pub warning: Option<String>,
}

/// Groups events by time of day, preserving chronological order within
/// each group. Every event lands in exactly one group.
#[must_use]
pub fn group_by_time_of_day(schedule: &[DoseEvent]) -> BTreeMap<SlotKey, Vec<DoseEvent>> {
    let mut groups: BTreeMap<SlotKey, Vec<DoseEvent>> = BTreeMap::new();
    for event in schedule {
        groups.entry(SlotKey::of(event)).or_default().push(event.clone());
    }
    groups
}

/// Picks the seed occurrence for each group.
///
/// Keeps only groups whose earliest occurrence falls within 24 hours of
/// the schedule's first event, sorted chronologically by that occurrence.
/// This is the minimal set of anchors needed to describe the recurrence:
/// one per daily time of day.
#[must_use]
pub fn first_day_slots(
    schedule: &[DoseEvent],
    groups: &BTreeMap<SlotKey, Vec<DoseEvent>>,
) -> Vec<SeedSlot> {
    let Some(first) = schedule.first() else {
        return Vec::new();
    };
    let cutoff = first.at + Duration::hours(i64::from(HOURS_PER_DAY));

    let mut seeds: Vec<SeedSlot> = groups
        .iter()
        .filter_map(|(key, occurrences)| {
            let earliest = occurrences.first()?;
            (earliest.at < cutoff).then(|| SeedSlot {
                key: *key,
                event: earliest.clone(),
            })
        })
        .collect();
    seeds.sort_by_key(|seed| seed.event.at);
    seeds
}

/// Builds a daily recurrence rule with an occurrence count,
/// e.g. `"RRULE:FREQ=DAILY;COUNT=7"`.
///
/// COUNT is preferred over UNTIL here since the occurrence count is always
/// known from the grouped schedule.
#[must_use]
pub fn daily_recurrence_rule(count: usize) -> String {
    format!("RRULE:FREQ=DAILY;COUNT={count}")
}

/// Builds a quick-add URL for a single instant, with an optional
/// recurrence rule. All parameter values are percent-encoded.
#[must_use]
pub fn event_url(
    title: &str,
    details: &str,
    start: &DoseEvent,
    recurrence: Option<&str>,
) -> String {
    let stamp = utc_stamp(start.at);
    let mut url = format!(
        "{GOOGLE_CALENDAR_BASE}?action=TEMPLATE&text={}&details={}&dates={stamp}/{stamp}",
        urlencoding::encode(title),
        urlencoding::encode(details),
    );
    if let Some(rule) = recurrence {
        url.push_str("&recur=");
        url.push_str(&urlencoding::encode(rule));
    }
    url
}

fn repeats_label(interval_hours: u32, days: Option<u32>) -> String {
    let mut parts = Vec::new();
    if interval_hours > 0 {
        parts.push(format!("Every {interval_hours}h"));
    }
    if let Some(days) = days.filter(|d| *d > 0) {
        let unit = if days == 1 { "day" } else { "days" };
        parts.push(format!("{days} {unit}"));
    }
    if parts.is_empty() {
        "Custom cadence".to_string()
    } else {
        parts.join(" · ")
    }
}

/// Builds the full quick-add export for a schedule.
///
/// One link per seed slot; a recurrence rule is attached only when the
/// slot repeats across days. `days` is the caller's day count when it
/// scheduled in day mode (used only for the summary label).
///
/// # Errors
///
/// Returns [`ExportError::EmptySchedule`] when no seed slots can be
/// derived, so the caller can fall back to the ICS download message.
pub fn build_google_links(
    schedule: &[DoseEvent],
    title: &str,
    interval_hours: u32,
    days: Option<u32>,
) -> ExportResult<GoogleExport> {
    let groups = group_by_time_of_day(schedule);
    let seeds = first_day_slots(schedule, &groups);

    let (Some(first), Some(last), false) = (schedule.first(), schedule.last(), seeds.is_empty())
    else {
        return Err(ExportError::EmptySchedule);
    };

    let links = seeds
        .iter()
        .map(|seed| {
            let occurrences = groups.get(&seed.key).map_or(&[][..], Vec::as_slice);
            let count = occurrences.len().max(1);
            let last_occurrence = occurrences.last().unwrap_or(&seed.event);

            let recurrence = (count > 1).then(|| daily_recurrence_rule(count));
            let dose_unit = if count == 1 { "dose" } else { "doses" };

            GoogleLink {
                url: event_url(title, EVENT_DETAILS, &seed.event, recurrence.as_deref()),
                time_label: clock_time_at(seed.event.at),
                range_label: range_label(seed.event.at, last_occurrence.at),
                dose_label: format!("{count} {dose_unit} total"),
                occurrence_count: count,
            }
        })
        .collect();

    let warning = (interval_hours > 0 && HOURS_PER_DAY % interval_hours != 0)
        .then(|| IRREGULAR_INTERVAL_WARNING.to_string());

    tracing::debug!(
        links = seeds.len(),
        doses = schedule.len(),
        irregular = warning.is_some(),
        "built Google Calendar links"
    );

    Ok(GoogleExport {
        links,
        summary: GoogleSummary {
            starts: format!("{} · {}", date_label(first.at.date()), clock_time_at(first.at)),
            ends: date_label(last.at.date()),
            repeats: repeats_label(interval_hours, days),
            total_doses: schedule.len(),
        },
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dosier_core::schedule::{DoseSpan, compute_schedule, parse_start_time};

    fn reference_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn schedule(start: &str, interval: u32, span: DoseSpan) -> Vec<DoseEvent> {
        compute_schedule(
            parse_start_time(start).unwrap(),
            interval,
            span,
            reference_now(),
        )
        .unwrap()
        .events
    }

    #[test]
    fn grouping_splits_a_week_into_three_slots_of_seven() {
        let events = schedule("08:00", 8, DoseSpan::Days(7));
        assert_eq!(events.len(), 21);

        let groups = group_by_time_of_day(&events);
        assert_eq!(groups.len(), 3);
        assert!(groups.values().all(|occurrences| occurrences.len() == 7));
    }

    #[test]
    fn groups_preserve_chronological_order() {
        let events = schedule("08:00", 8, DoseSpan::Days(7));
        let groups = group_by_time_of_day(&events);
        for occurrences in groups.values() {
            assert!(occurrences.windows(2).all(|pair| pair[0].at < pair[1].at));
        }
    }

    #[test]
    fn first_day_slots_yields_one_seed_per_daily_time() {
        let events = schedule("08:00", 8, DoseSpan::Days(7));
        let groups = group_by_time_of_day(&events);
        let seeds = first_day_slots(&events, &groups);

        assert_eq!(seeds.len(), 3);
        // Chronological by first occurrence: 08:00, 16:00, then 00:00 +1d.
        assert_eq!(seeds[0].key, SlotKey { hour: 8, minute: 0 });
        assert_eq!(seeds[1].key, SlotKey { hour: 16, minute: 0 });
        assert_eq!(seeds[2].key, SlotKey { hour: 0, minute: 0 });
        assert!(seeds.windows(2).all(|pair| pair[0].event.at < pair[1].event.at));
    }

    #[test]
    fn recurrence_rule_uses_count() {
        assert_eq!(daily_recurrence_rule(7), "RRULE:FREQ=DAILY;COUNT=7");
    }

    #[test]
    fn event_url_encodes_parameters() {
        let events = schedule("08:00", 24, DoseSpan::Days(1));
        let url = event_url("Take Medication", "Medication reminder", &events[0], None);

        assert!(url.starts_with(
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text=Take%20Medication"
        ));
        assert!(url.contains("&details=Medication%20reminder"));
        assert!(url.contains("&dates=20240315T080000Z/20240315T080000Z"));
        assert!(!url.contains("&recur="));
    }

    #[test]
    fn recurrence_rule_is_percent_encoded_in_url() {
        let events = schedule("08:00", 24, DoseSpan::Days(1));
        let url = event_url("T", "D", &events[0], Some(&daily_recurrence_rule(7)));
        assert!(url.ends_with("&recur=RRULE%3AFREQ%3DDAILY%3BCOUNT%3D7"));
    }

    #[test]
    fn links_collapse_each_slot_into_a_daily_rule() {
        let events = schedule("08:00", 8, DoseSpan::Days(7));
        let export = build_google_links(&events, "Pills", 8, Some(7)).unwrap();

        assert_eq!(export.links.len(), 3);
        for link in &export.links {
            assert_eq!(link.occurrence_count, 7);
            assert_eq!(link.dose_label, "7 doses total");
            assert!(link.url.contains("recur=RRULE%3AFREQ%3DDAILY%3BCOUNT%3D7"));
        }
        assert_eq!(export.links[0].time_label, "08:00");
    }

    #[test]
    fn single_occurrence_slot_gets_no_recurrence() {
        let events = schedule("08:00", 8, DoseSpan::Doses(3));
        let export = build_google_links(&events, "Pills", 8, None).unwrap();

        assert_eq!(export.links.len(), 3);
        for link in &export.links {
            assert_eq!(link.occurrence_count, 1);
            assert_eq!(link.dose_label, "1 dose total");
            assert!(!link.url.contains("recur"));
        }
    }

    #[test]
    fn summary_describes_the_whole_schedule() {
        let events = schedule("08:00", 8, DoseSpan::Days(7));
        let export = build_google_links(&events, "Pills", 8, Some(7)).unwrap();

        assert_eq!(export.summary.starts, "Fri, Mar 15 · 08:00");
        // Dose 21 is 160h after the first: 00:00 on Mar 22.
        assert_eq!(export.summary.ends, "Fri, Mar 22");
        assert_eq!(export.summary.repeats, "Every 8h · 7 days");
        assert_eq!(export.summary.total_doses, 21);
    }

    #[test]
    fn divisor_interval_has_no_warning() {
        let events = schedule("08:00", 8, DoseSpan::Days(2));
        let export = build_google_links(&events, "Pills", 8, Some(2)).unwrap();
        assert!(export.warning.is_none());
    }

    #[test]
    fn non_divisor_interval_warns_about_drift() {
        let events = schedule("08:00", 7, DoseSpan::Days(2));
        let export = build_google_links(&events, "Pills", 7, Some(2)).unwrap();
        assert_eq!(export.warning.as_deref(), Some(IRREGULAR_INTERVAL_WARNING));
    }

    #[test]
    fn export_serializes_for_the_ui_layer() {
        let events = schedule("08:00", 8, DoseSpan::Doses(3));
        let export = build_google_links(&events, "Pills", 8, None).unwrap();
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["links"].as_array().unwrap().len(), 3);
        assert_eq!(value["summary"]["total_doses"], 3);
        assert!(value["warning"].is_null());
    }

    #[test]
    fn empty_schedule_is_a_recoverable_error() {
        assert!(matches!(
            build_google_links(&[], "Pills", 8, None),
            Err(ExportError::EmptySchedule)
        ));
    }
}
