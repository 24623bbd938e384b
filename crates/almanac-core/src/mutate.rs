//! Single-event mutators.
//!
//! Pure operations on an in-memory [`Calendar`]; persistence is the
//! caller's job (load, mutate, save). Each mutator takes an index resolved
//! by [`Calendar::find_event`] — a failed match is an ordinary `None` at
//! the call site, never an error here.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::model::calendar::Calendar;
use crate::model::event::{Event, Recurrence, DEFAULT_DURATION_MINUTES};

/// Create a timed event and append it to the calendar.
///
/// Blank titles and non-positive/absent durations fall back to defaults.
/// No duplicate check is made: avoiding duplicates is the responsibility
/// of the planning layer that produced the request.
///
/// Returns the index of the new event.
pub fn create_event(
    calendar: &mut Calendar,
    date: NaiveDate,
    time: NaiveTime,
    recurrence: Recurrence,
    title: &str,
    duration_minutes: Option<i64>,
) -> usize {
    let duration = duration_minutes
        .filter(|&m| m > 0)
        .unwrap_or(DEFAULT_DURATION_MINUTES);
    let event = Event::new(title, date.and_time(time), duration, recurrence);
    debug!(title = %event.title, start = %event.start_at(), "event created");
    calendar.events.push(event);
    calendar.events.len() - 1
}

/// Move the event at `idx` to a new start, preserving its duration.
pub fn update_start(calendar: &mut Calendar, idx: usize, new_date: NaiveDate, new_time: NaiveTime) {
    let event = &mut calendar.events[idx];
    event.move_to(new_date.and_time(new_time));
    debug!(title = %event.title, start = %event.start_at(), "event moved");
}

/// Change the duration of the event at `idx`, keeping its start fixed.
/// A non-positive duration is treated as the 60-minute default.
pub fn resize(calendar: &mut Calendar, idx: usize, new_duration_minutes: i64) {
    let duration = if new_duration_minutes > 0 {
        new_duration_minutes
    } else {
        DEFAULT_DURATION_MINUTES
    };
    let event = &mut calendar.events[idx];
    let start = event.start_at();
    event.end = (start + chrono::Duration::minutes(duration)).into();
    debug!(title = %event.title, minutes = duration, "event resized");
}

/// Remove the event at `idx`.
pub fn remove(calendar: &mut Calendar, idx: usize) -> Event {
    let event = calendar.events.remove(idx);
    debug!(title = %event.title, "event removed");
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("test date")
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").expect("test time")
    }

    #[test]
    fn create_uses_explicit_duration() {
        let mut cal = Calendar::default();
        let idx = create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "Standup", Some(30));
        let e = &cal.events[idx];
        assert_eq!((e.end_at() - e.start_at()).num_minutes(), 30);
    }

    #[test]
    fn create_defaults_duration_when_absent_or_nonpositive() {
        let mut cal = Calendar::default();
        let a = create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "A", None);
        let b = create_event(&mut cal, d("2025-06-02"), t("11:00"), Recurrence::None, "B", Some(-15));
        for idx in [a, b] {
            let e = &cal.events[idx];
            assert_eq!((e.end_at() - e.start_at()).num_minutes(), 60);
        }
    }

    #[test]
    fn create_assigns_distinct_uids() {
        let mut cal = Calendar::default();
        create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "A", None);
        create_event(&mut cal, d("2025-06-02"), t("10:00"), Recurrence::None, "B", None);
        assert_ne!(cal.events[0].uid, cal.events[1].uid);
    }

    #[test]
    fn update_start_preserves_duration() {
        let mut cal = Calendar::default();
        let idx = create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "A", Some(45));
        update_start(&mut cal, idx, d("2025-06-05"), t("16:00"));
        let e = &cal.events[idx];
        assert_eq!(e.start_at(), d("2025-06-05").and_time(t("16:00")));
        assert_eq!((e.end_at() - e.start_at()).num_minutes(), 45);
    }

    #[test]
    fn resize_keeps_start_fixed_and_defaults_nonpositive() {
        let mut cal = Calendar::default();
        let idx = create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "A", Some(30));
        resize(&mut cal, idx, 90);
        assert_eq!((cal.events[idx].end_at() - cal.events[idx].start_at()).num_minutes(), 90);
        resize(&mut cal, idx, 0);
        assert_eq!((cal.events[idx].end_at() - cal.events[idx].start_at()).num_minutes(), 60);
        assert_eq!(cal.events[idx].start_at(), d("2025-06-02").and_time(t("09:00")));
    }

    #[test]
    fn remove_drops_the_event() {
        let mut cal = Calendar::default();
        let idx = create_event(&mut cal, d("2025-06-02"), t("09:00"), Recurrence::None, "A", None);
        let removed = remove(&mut cal, idx);
        assert_eq!(removed.title, "A");
        assert!(cal.events.is_empty());
    }
}
