use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Default duration applied when a caller supplies no duration or a
/// non-positive one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Title assigned when a caller supplies a blank title.
pub const DEFAULT_TITLE: &str = "Untitled event";

/// How often an event repeats.
///
/// Recurring events are fixed anchors: they can be edited directly by their
/// (title, start) key, but every automated rescheduling pass skips them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// The iCalendar `RRULE` value for this recurrence, if any.
    #[must_use]
    pub const fn as_rrule(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Daily => Some("FREQ=DAILY"),
            Self::Weekly => Some("FREQ=WEEKLY"),
            Self::Monthly => Some("FREQ=MONTHLY"),
            Self::Yearly => Some("FREQ=YEARLY"),
        }
    }

    /// Parse an `RRULE` property value. Only the `FREQ` part is interpreted;
    /// an unknown or missing frequency maps to `None`.
    #[must_use]
    pub fn from_rrule(value: &str) -> Self {
        let freq = value
            .split(';')
            .find_map(|part| part.trim().strip_prefix("FREQ="))
            .unwrap_or("");
        match freq.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => Self::None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "non-recurring" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown recurrence '{other}'")),
        }
    }
}

/// A floating calendar time: either a bare date (all-day) or a local
/// date-time. No zone is attached; values compare as wall-clock values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl TimeValue {
    /// Whether this value carries no time-of-day component.
    #[must_use]
    pub const fn is_date_only(self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The calendar date of this value.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        match self {
            Self::Date(d) => d,
            Self::DateTime(dt) => dt.date(),
        }
    }

    /// This value as a date-time; a bare date maps to midnight.
    #[must_use]
    pub fn as_datetime(self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::DateTime(dt) => dt,
        }
    }
}

impl From<NaiveDateTime> for TimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// One persisted calendar event.
///
/// The `uid` is opaque: assigned once at creation, never reused, and never
/// used for matching. External callers address events only by
/// (case-insensitive title, exact-to-the-minute start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub title: String,
    pub start: TimeValue,
    pub end: TimeValue,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl Event {
    /// Build a timed event of `duration_minutes` starting at `start`.
    /// Blank titles and non-positive durations fall back to defaults.
    #[must_use]
    pub fn new(title: &str, start: NaiveDateTime, duration_minutes: i64, recurrence: Recurrence) -> Self {
        let duration = if duration_minutes > 0 {
            duration_minutes
        } else {
            DEFAULT_DURATION_MINUTES
        };
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.trim().to_string()
        };
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            title,
            start: TimeValue::DateTime(start),
            end: TimeValue::DateTime(start + chrono::Duration::minutes(duration)),
            recurrence,
        }
    }

    /// True when either boundary is a bare date. All-day events are
    /// excluded from every scheduling algorithm.
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        self.start.is_date_only() || self.end.is_date_only()
    }

    /// True when the event repeats.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurrence != Recurrence::None
    }

    /// Eligible for conflict resolution, auto-spacing, and rebalancing.
    #[must_use]
    pub fn is_schedulable(&self) -> bool {
        !self.is_all_day() && !self.is_recurring()
    }

    /// Start boundary as a date-time (all-day start maps to midnight).
    #[must_use]
    pub fn start_at(&self) -> NaiveDateTime {
        self.start.as_datetime()
    }

    /// End boundary as a date-time.
    #[must_use]
    pub fn end_at(&self) -> NaiveDateTime {
        self.end.as_datetime()
    }

    /// Current duration in minutes, falling back to the default when the
    /// stored boundaries are degenerate (`end <= start`).
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        let minutes = (self.end_at() - self.start_at()).num_minutes();
        if minutes > 0 {
            minutes
        } else {
            DEFAULT_DURATION_MINUTES
        }
    }

    /// Replace the start, preserving the current duration.
    pub fn move_to(&mut self, new_start: NaiveDateTime) {
        let duration = self.duration_minutes();
        self.start = TimeValue::DateTime(new_start);
        self.end = TimeValue::DateTime(new_start + chrono::Duration::minutes(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("test datetime")
    }

    #[test]
    fn new_applies_duration_default() {
        let e = Event::new("Standup", dt("2025-06-02 09:00"), 0, Recurrence::None);
        assert_eq!(e.duration_minutes(), 60);
        let e = Event::new("Standup", dt("2025-06-02 09:00"), 30, Recurrence::None);
        assert_eq!(e.end_at(), dt("2025-06-02 09:30"));
    }

    #[test]
    fn new_applies_title_default() {
        let e = Event::new("   ", dt("2025-06-02 09:00"), 30, Recurrence::None);
        assert_eq!(e.title, DEFAULT_TITLE);
    }

    #[test]
    fn all_day_when_either_boundary_is_date_only() {
        let mut e = Event::new("Trip", dt("2025-06-02 09:00"), 30, Recurrence::None);
        assert!(!e.is_all_day());
        e.start = TimeValue::Date(e.start.date());
        assert!(e.is_all_day());
    }

    #[test]
    fn recurring_events_are_not_schedulable() {
        let e = Event::new("Standup", dt("2025-06-02 09:00"), 30, Recurrence::Daily);
        assert!(e.is_recurring());
        assert!(!e.is_schedulable());
    }

    #[test]
    fn rrule_round_trip() {
        for rec in [
            Recurrence::Daily,
            Recurrence::Weekly,
            Recurrence::Monthly,
            Recurrence::Yearly,
        ] {
            let rule = rec.as_rrule().expect("recurring rule");
            assert_eq!(Recurrence::from_rrule(rule), rec);
        }
        assert_eq!(Recurrence::from_rrule("FREQ=HOURLY"), Recurrence::None);
        assert_eq!(
            Recurrence::from_rrule("INTERVAL=2;FREQ=WEEKLY"),
            Recurrence::Weekly
        );
    }

    #[test]
    fn recurrence_from_str_accepts_planner_spellings() {
        assert_eq!("non-recurring".parse::<Recurrence>(), Ok(Recurrence::None));
        assert_eq!("Daily".parse::<Recurrence>(), Ok(Recurrence::Daily));
        assert!("fortnightly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn move_to_preserves_duration() {
        let mut e = Event::new("A", dt("2025-06-02 09:00"), 45, Recurrence::None);
        e.move_to(dt("2025-06-03 14:00"));
        assert_eq!(e.start_at(), dt("2025-06-03 14:00"));
        assert_eq!(e.end_at(), dt("2025-06-03 14:45"));
    }
}
