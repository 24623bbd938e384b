//! Value types for the persisted calendar aggregate.

pub mod calendar;
pub mod event;
