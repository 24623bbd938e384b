use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::event::Event;

/// Product identifier written into every document this tool creates.
pub const PROD_ID: &str = "-//almanac//almanac 0.1//EN";

/// iCalendar format version.
pub const VERSION: &str = "2.0";

/// Calendar scale; only the Gregorian scale is produced or interpreted.
pub const CAL_SCALE: &str = "GREGORIAN";

/// The single persisted aggregate: fixed metadata plus an ordered list of
/// events. Order carries no meaning; operations append and remove freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub prod_id: String,
    pub version: String,
    pub scale: String,
    pub events: Vec<Event>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            prod_id: PROD_ID.to_string(),
            version: VERSION.to_string(),
            scale: CAL_SCALE.to_string(),
            events: Vec::new(),
        }
    }
}

impl Calendar {
    /// Find the first event matching `title` (case-insensitive) with a start
    /// equal to `date` + `time`, compared to the minute. Returns the index.
    ///
    /// An all-day event's start reads as midnight, so it matches a key with
    /// `time` 00:00 on its start date and nothing else.
    #[must_use]
    pub fn find_event(&self, title: &str, date: NaiveDate, time: NaiveTime) -> Option<usize> {
        let target = date.and_time(time);
        self.events.iter().position(|e| {
            e.title.eq_ignore_ascii_case(title.trim()) && minute_eq(e.start_at(), target)
        })
    }

    /// Indices of events whose start falls on `date`.
    #[must_use]
    pub fn events_on(&self, date: NaiveDate) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.start.date() == date)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of schedulable (non-all-day, non-recurring) events on `date`,
    /// sorted by start ascending.
    #[must_use]
    pub fn schedulable_on(&self, date: NaiveDate) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_schedulable() && e.start.date() == date)
            .map(|(i, _)| i)
            .collect();
        indices.sort_by_key(|&i| self.events[i].start_at());
        indices
    }
}

/// Equality to the minute; seconds and finer are ignored for matching.
fn minute_eq(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour() && a.minute() == b.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::{Recurrence, TimeValue};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("test datetime")
    }

    fn cal_with(titles_starts: &[(&str, &str)]) -> Calendar {
        let mut cal = Calendar::default();
        for (title, start) in titles_starts {
            cal.events
                .push(Event::new(title, dt(start), 60, Recurrence::None));
        }
        cal
    }

    #[test]
    fn find_event_is_case_insensitive_on_title() {
        let cal = cal_with(&[("Dentist", "2025-06-02 09:00")]);
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).expect("date");
        let time = NaiveTime::from_hms_opt(9, 0, 0).expect("time");
        assert_eq!(cal.find_event("dentist", date, time), Some(0));
        assert_eq!(cal.find_event("DENTIST", date, time), Some(0));
    }

    #[test]
    fn find_event_requires_exact_minute() {
        let cal = cal_with(&[("Dentist", "2025-06-02 09:00")]);
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).expect("date");
        let time = NaiveTime::from_hms_opt(9, 1, 0).expect("time");
        assert_eq!(cal.find_event("Dentist", date, time), None);
    }

    #[test]
    fn find_event_returns_first_match_in_list_order() {
        let cal = cal_with(&[
            ("Sync", "2025-06-02 09:00"),
            ("Sync", "2025-06-02 09:00"),
        ]);
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).expect("date");
        let time = NaiveTime::from_hms_opt(9, 0, 0).expect("time");
        assert_eq!(cal.find_event("Sync", date, time), Some(0));
    }

    #[test]
    fn all_day_events_match_only_a_midnight_key() {
        let mut cal = cal_with(&[("Holiday", "2025-06-02 00:00")]);
        cal.events[0].start = TimeValue::Date(NaiveDate::from_ymd_opt(2025, 6, 2).expect("date"));
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).expect("date");
        assert_eq!(cal.find_event("Holiday", date, NaiveTime::MIN), Some(0));
        let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("time");
        assert_eq!(cal.find_event("Holiday", date, nine), None);
    }

    #[test]
    fn schedulable_on_filters_and_sorts() {
        let mut cal = cal_with(&[
            ("Late", "2025-06-02 15:00"),
            ("Early", "2025-06-02 08:00"),
            ("Other day", "2025-06-03 08:00"),
        ]);
        cal.events
            .push(Event::new("Standup", dt("2025-06-02 09:00"), 15, Recurrence::Daily));
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).expect("date");
        let order: Vec<&str> = cal
            .schedulable_on(date)
            .into_iter()
            .map(|i| cal.events[i].title.as_str())
            .collect();
        assert_eq!(order, vec!["Early", "Late"]);
    }
}
