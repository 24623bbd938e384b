//! iCalendar document parser.
//!
//! Decodes a `VCALENDAR` document into a [`Calendar`]. The parser is
//! tolerant by design:
//!
//! - Lines may end in LF or CRLF; folded continuation lines (leading space
//!   or tab) are unfolded before interpretation.
//! - Unknown properties are skipped. Non-`VEVENT` components (`VTODO`,
//!   `VTIMEZONE`, …) are skipped whole.
//! - A `VEVENT` missing `DTEND` gets `end = start`; a missing `SUMMARY`
//!   gets the default title; a missing `UID` gets a fresh one.
//!
//! What it is strict about: the document must open with `BEGIN:VCALENDAR`
//! and close with `END:VCALENDAR`, every component must terminate, and a
//! `VEVENT` must carry a parseable `DTSTART`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::model::calendar::Calendar;
use crate::model::event::{Event, Recurrence, TimeValue, DEFAULT_TITLE};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding an iCalendar document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document does not open with `BEGIN:VCALENDAR`.
    MissingCalendarBegin,
    /// A component (named in the payload) was never closed with `END:`.
    UnterminatedComponent(String),
    /// An `END:` line closed a component that was not open.
    MismatchedEnd {
        /// The component the parser expected to close.
        expected: String,
        /// The component the line actually named.
        found: String,
    },
    /// A content line has no `:` separator.
    MalformedLine(String),
    /// A `VEVENT` block carries no `DTSTART`.
    MissingDtStart,
    /// A `DTSTART`/`DTEND` value is neither a date nor a date-time.
    InvalidTimeValue(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCalendarBegin => {
                write!(f, "document does not start with BEGIN:VCALENDAR")
            }
            Self::UnterminatedComponent(name) => {
                write!(f, "component {name} is never terminated")
            }
            Self::MismatchedEnd { expected, found } => {
                write!(f, "END:{found} closes nothing (expected END:{expected})")
            }
            Self::MalformedLine(line) => {
                write!(f, "content line has no ':' separator: '{line}'")
            }
            Self::MissingDtStart => write!(f, "VEVENT has no DTSTART"),
            Self::InvalidTimeValue(raw) => {
                write!(f, "invalid date/date-time value: '{raw}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decode an iCalendar document into a [`Calendar`].
///
/// # Errors
///
/// Returns a [`ParseError`] when the document structure is broken or a
/// `VEVENT` time value cannot be interpreted; see the module docs for what
/// is tolerated instead of rejected.
pub fn parse_calendar(text: &str) -> Result<Calendar, ParseError> {
    let lines = unfold(text);
    let mut iter = lines.iter().map(String::as_str).filter(|l| !l.trim().is_empty());

    match iter.next() {
        Some(line) if line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR") => {}
        _ => return Err(ParseError::MissingCalendarBegin),
    }

    let mut calendar = Calendar::default();
    let mut closed = false;

    while let Some(line) = iter.next() {
        let line = line.trim_end();
        let prop = ContentLine::split(line)?;
        match prop.name.as_str() {
            "BEGIN" if prop.value.eq_ignore_ascii_case("VEVENT") => {
                calendar.events.push(parse_event(&mut iter)?);
            }
            "BEGIN" => {
                // Foreign component: skip everything up to its END line.
                skip_component(&mut iter, &prop.value.to_ascii_uppercase())?;
            }
            "END" if prop.value.eq_ignore_ascii_case("VCALENDAR") => {
                closed = true;
                break;
            }
            "END" => {
                return Err(ParseError::MismatchedEnd {
                    expected: "VCALENDAR".to_string(),
                    found: prop.value.clone(),
                });
            }
            "PRODID" => calendar.prod_id = prop.value.clone(),
            "VERSION" => calendar.version = prop.value.clone(),
            "CALSCALE" => calendar.scale = prop.value.clone(),
            other => debug!(property = other, "skipping unknown calendar property"),
        }
    }

    if closed {
        Ok(calendar)
    } else {
        Err(ParseError::UnterminatedComponent("VCALENDAR".to_string()))
    }
}

/// Unescape an iCalendar TEXT value (`\\`, `\;`, `\,`, `\n`).
#[must_use]
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// One unfolded content line, split into name, parameters, and value.
struct ContentLine {
    /// Property name, uppercased.
    name: String,
    /// Raw parameter segment between the first `;` and the `:` (may be empty).
    params: String,
    /// Everything after the first `:`.
    value: String,
}

impl ContentLine {
    fn split(line: &str) -> Result<Self, ParseError> {
        let colon = line
            .find(':')
            .ok_or_else(|| ParseError::MalformedLine(line.to_string()))?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);
        let (name, params) = match head.find(';') {
            Some(semi) => (&head[..semi], &head[semi + 1..]),
            None => (head, ""),
        };
        Ok(Self {
            name: name.trim().to_ascii_uppercase(),
            params: params.to_ascii_uppercase(),
            value: value.to_string(),
        })
    }

    /// Whether the parameter segment declares a date-only value.
    fn is_date_value(&self) -> bool {
        self.params
            .split(';')
            .any(|p| p.trim() == "VALUE=DATE")
    }
}

/// Join folded lines: a line starting with space or tab continues the
/// previous line with that first character removed.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

/// Parse one `VEVENT` body; the `BEGIN:VEVENT` line is already consumed.
fn parse_event<'a, I>(iter: &mut I) -> Result<Event, ParseError>
where
    I: Iterator<Item = &'a str>,
{
    let mut uid: Option<String> = None;
    let mut title: Option<String> = None;
    let mut start: Option<TimeValue> = None;
    let mut end: Option<TimeValue> = None;
    let mut recurrence = Recurrence::None;

    for line in iter.by_ref() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let prop = ContentLine::split(line)?;
        match prop.name.as_str() {
            "END" if prop.value.eq_ignore_ascii_case("VEVENT") => {
                let start = start.ok_or(ParseError::MissingDtStart)?;
                return Ok(Event {
                    uid: uid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    start,
                    end: end.unwrap_or(start),
                    recurrence,
                });
            }
            "END" => {
                return Err(ParseError::MismatchedEnd {
                    expected: "VEVENT".to_string(),
                    found: prop.value.clone(),
                });
            }
            "UID" => uid = Some(prop.value.clone()),
            "SUMMARY" => title = Some(unescape_text(&prop.value)),
            "DTSTART" => start = Some(parse_time_value(&prop)?),
            "DTEND" => end = Some(parse_time_value(&prop)?),
            "RRULE" => recurrence = Recurrence::from_rrule(&prop.value),
            other => debug!(property = other, "skipping unknown event property"),
        }
    }

    Err(ParseError::UnterminatedComponent("VEVENT".to_string()))
}

/// Skip a foreign component (and any components nested inside it).
fn skip_component<'a, I>(iter: &mut I, name: &str) -> Result<(), ParseError>
where
    I: Iterator<Item = &'a str>,
{
    let mut depth: Vec<String> = vec![name.to_string()];
    for line in iter.by_ref() {
        let prop = ContentLine::split(line.trim_end())?;
        match prop.name.as_str() {
            "BEGIN" => depth.push(prop.value.to_ascii_uppercase()),
            "END" => {
                let open = depth.pop().unwrap_or_default();
                let found = prop.value.to_ascii_uppercase();
                if open != found {
                    return Err(ParseError::MismatchedEnd {
                        expected: open,
                        found,
                    });
                }
                if depth.is_empty() {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
    Err(ParseError::UnterminatedComponent(
        depth.pop().unwrap_or_else(|| name.to_string()),
    ))
}

/// Parse a `DTSTART`/`DTEND` value.
///
/// A `VALUE=DATE` parameter (or a bare 8-digit value) yields a date-only
/// [`TimeValue::Date`]. A trailing `Z` from zone-aware producers is dropped:
/// all times in this system are floating.
fn parse_time_value(prop: &ContentLine) -> Result<TimeValue, ParseError> {
    let raw = prop.value.trim().trim_end_matches(['Z', 'z']);
    if prop.is_date_value() {
        let date = NaiveDate::parse_from_str(raw, "%Y%m%d")
            .map_err(|_| ParseError::InvalidTimeValue(prop.value.clone()))?;
        return Ok(TimeValue::Date(date));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S") {
        return Ok(TimeValue::DateTime(dt));
    }
    // Some producers omit VALUE=DATE on date-only values.
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(TimeValue::Date)
        .map_err(|_| ParseError::InvalidTimeValue(prop.value.clone()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
