//! iCalendar document writer.
//!
//! Serializes a [`Calendar`] to text. Guarantees:
//!
//! - Deterministic: the same calendar always produces the same bytes.
//! - CRLF line endings; content lines longer than 75 octets are folded
//!   with a single-space continuation, on char boundaries.
//! - TEXT values escape `\` `;` `,` and newline, so a decode of the output
//!   reproduces every event's title, start, end, and recurrence exactly.

use crate::model::calendar::Calendar;
use crate::model::event::{Event, TimeValue};

/// Maximum octets per physical line before folding, per RFC 5545 §3.1.
const FOLD_WIDTH: usize = 75;

/// Serialize a [`Calendar`] to a complete iCalendar document.
#[must_use]
pub fn write_calendar(calendar: &Calendar) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, &format!("PRODID:{}", calendar.prod_id));
    push_line(&mut out, &format!("VERSION:{}", calendar.version));
    push_line(&mut out, &format!("CALSCALE:{}", calendar.scale));
    for event in &calendar.events {
        write_event(&mut out, event);
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Escape an iCalendar TEXT value (`\` `;` `,` and newline).
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

fn write_event(out: &mut String, event: &Event) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}", event.uid));
    push_line(out, &format!("SUMMARY:{}", escape_text(&event.title)));
    push_line(out, &format!("DTSTART{}", time_property(event.start)));
    push_line(out, &format!("DTEND{}", time_property(event.end)));
    if let Some(rule) = event.recurrence.as_rrule() {
        push_line(out, &format!("RRULE:{rule}"));
    }
    push_line(out, "END:VEVENT");
}

/// Render the parameter-plus-value tail of a `DTSTART`/`DTEND` line.
fn time_property(value: TimeValue) -> String {
    match value {
        TimeValue::Date(d) => format!(";VALUE=DATE:{}", d.format("%Y%m%d")),
        TimeValue::DateTime(dt) => format!(":{}", dt.format("%Y%m%dT%H%M%S")),
    }
}

/// Append one content line, folding it if it exceeds [`FOLD_WIDTH`] octets.
fn push_line(out: &mut String, line: &str) {
    let mut remaining = line;
    let mut width = FOLD_WIDTH;
    loop {
        let cut = char_boundary_at(remaining, width);
        if cut >= remaining.len() {
            out.push_str(remaining);
            out.push_str("\r\n");
            return;
        }
        out.push_str(&remaining[..cut]);
        out.push_str("\r\n ");
        remaining = &remaining[cut..];
        // Continuation lines give one octet to the leading space.
        width = FOLD_WIDTH - 1;
    }
}

/// Largest char boundary in `s` that is `<= limit` bytes (and non-zero
/// when the string is non-empty).
fn char_boundary_at(s: &str, limit: usize) -> usize {
    if s.len() <= limit {
        return s.len();
    }
    let mut cut = limit;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    if cut == 0 {
        // A single char wider than the limit is emitted unfolded.
        s.chars().next().map_or(0, char::len_utf8)
    } else {
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::parser::parse_calendar;
    use crate::model::event::{Event, Recurrence};
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("test datetime")
    }

    #[test]
    fn empty_calendar_has_fixed_preamble() {
        let text = write_calendar(&Calendar::default());
        assert_eq!(
            text,
            "BEGIN:VCALENDAR\r\nPRODID:-//almanac//almanac 0.1//EN\r\nVERSION:2.0\r\nCALSCALE:GREGORIAN\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn timed_event_block_shape() {
        let mut cal = Calendar::default();
        let mut event = Event::new("Standup", dt("2025-06-02 09:00"), 30, Recurrence::Daily);
        event.uid = "fixed-uid".to_string();
        cal.events.push(event);
        let text = write_calendar(&cal);
        assert!(text.contains("BEGIN:VEVENT\r\nUID:fixed-uid\r\nSUMMARY:Standup\r\n"));
        assert!(text.contains("DTSTART:20250602T090000\r\n"));
        assert!(text.contains("DTEND:20250602T093000\r\n"));
        assert!(text.contains("RRULE:FREQ=DAILY\r\n"));
    }

    #[test]
    fn all_day_event_uses_value_date() {
        let mut cal = Calendar::default();
        let mut event = Event::new("Trip", dt("2025-06-02 00:00"), 60, Recurrence::None);
        event.start = TimeValue::Date(event.start.date());
        event.end = TimeValue::Date(event.end.date().succ_opt().expect("next day"));
        cal.events.push(event);
        let text = write_calendar(&cal);
        assert!(text.contains("DTSTART;VALUE=DATE:20250602\r\n"));
        assert!(text.contains("DTEND;VALUE=DATE:20250603\r\n"));
        assert!(!text.contains("RRULE"));
    }

    #[test]
    fn titles_are_escaped_and_survive_round_trip() {
        let mut cal = Calendar::default();
        cal.events.push(Event::new(
            "Lunch, then walk; maybe\nor not",
            dt("2025-06-02 12:00"),
            45,
            Recurrence::None,
        ));
        let text = write_calendar(&cal);
        assert!(text.contains("SUMMARY:Lunch\\, then walk\\; maybe\\nor not"));
        let back = parse_calendar(&text).expect("own output should parse");
        assert_eq!(back.events[0].title, "Lunch, then walk; maybe\nor not");
    }

    #[test]
    fn long_lines_are_folded_and_refold_round_trips() {
        let mut cal = Calendar::default();
        let title = "An extremely verbose meeting title that keeps going well past the seventy-five octet physical line limit of the interchange format";
        cal.events
            .push(Event::new(title, dt("2025-06-02 09:00"), 60, Recurrence::None));
        let text = write_calendar(&cal);
        for line in text.split("\r\n") {
            assert!(line.len() <= FOLD_WIDTH, "line too long: {line}");
        }
        let back = parse_calendar(&text).expect("folded output should parse");
        assert_eq!(back.events[0].title, title);
    }

    #[test]
    fn output_is_deterministic() {
        let mut cal = Calendar::default();
        cal.events
            .push(Event::new("A", dt("2025-06-02 09:00"), 60, Recurrence::None));
        assert_eq!(write_calendar(&cal), write_calendar(&cal));
    }
}
