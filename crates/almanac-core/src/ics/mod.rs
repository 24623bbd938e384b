//! iCalendar codec.
//!
//! A deliberately small reader/writer for the slice of RFC 5545 this tool
//! persists: one `VCALENDAR` with `PRODID`/`VERSION`/`CALSCALE` metadata and
//! zero or more `VEVENT` blocks carrying `UID`, `SUMMARY`, `DTSTART`,
//! `DTEND`, and an optional `RRULE`. Anything else in an incoming document
//! is tolerated and dropped.

pub mod parser;
pub mod writer;

pub use parser::{parse_calendar, ParseError};
pub use writer::write_calendar;
