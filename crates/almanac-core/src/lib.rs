//! almanac-core library.
//!
//! The calendar data model, the iCalendar codec, the persisted store, and
//! the read-side views. Everything here is synchronous and floating-time:
//! date-times are chrono `Naive*` values compared as wall-clock values,
//! never converted through a zone.

#![forbid(unsafe_code)]

pub mod config;
pub mod ics;
pub mod model;
pub mod mutate;
pub mod store;
pub mod view;

pub use model::calendar::Calendar;
pub use model::event::{Event, Recurrence, TimeValue};
pub use store::{CalendarStore, StoreError};
