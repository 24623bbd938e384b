//! Read-side views over a loaded calendar.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::calendar::Calendar;

/// One row of the simple listing: timed events only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub title: String,
    /// `yyyy-MM-dd`.
    pub date: String,
    /// `HH:MM`.
    pub start: String,
    /// `HH:MM`.
    pub end: String,
    pub duration_minutes: i64,
}

/// Human-readable chronological summary.
///
/// Events are grouped under `yyyy-MM-dd` day headers, one line per event:
/// `HH:MM-HH:MM Title` for timed events, `(all-day) Title` for all-day
/// ones, followed by a `Total events: N` trailer.
#[must_use]
pub fn summarize(calendar: &Calendar) -> String {
    let mut days: BTreeMap<NaiveDate, Vec<&crate::model::event::Event>> = BTreeMap::new();
    for event in &calendar.events {
        days.entry(event.start.date()).or_default().push(event);
    }

    let mut out = String::new();
    for (date, mut events) in days {
        events.sort_by_key(|e| e.start_at());
        let _ = writeln!(out, "{}", date.format("%Y-%m-%d"));
        for event in events {
            if event.is_all_day() {
                let _ = writeln!(out, "  (all-day) {}", event.title);
            } else {
                let _ = writeln!(
                    out,
                    "  {}-{} {}",
                    event.start_at().format("%H:%M"),
                    event.end_at().format("%H:%M"),
                    event.title
                );
            }
        }
    }
    let _ = writeln!(out, "Total events: {}", calendar.events.len());
    out
}

/// Timed events as rows, sorted lexicographically by `(date, start)`.
/// All-day events are excluded from this view.
#[must_use]
pub fn list_events(calendar: &Calendar) -> Vec<EventRow> {
    let mut rows: Vec<EventRow> = calendar
        .events
        .iter()
        .filter(|e| !e.is_all_day())
        .map(|e| EventRow {
            title: e.title.clone(),
            date: e.start.date().format("%Y-%m-%d").to_string(),
            start: e.start_at().format("%H:%M").to_string(),
            end: e.end_at().format("%H:%M").to_string(),
            duration_minutes: (e.end_at() - e.start_at()).num_minutes(),
        })
        .collect();
    rows.sort_by(|a, b| (&a.date, &a.start).cmp(&(&b.date, &b.start)));
    rows
}
