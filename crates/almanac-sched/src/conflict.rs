//! Conflict-aware placement of a single event.
//!
//! Given a desired start, the resolver searches forward within the target
//! day in fixed-size steps until it finds a start whose half-open interval
//! clears every obstruction, then commits that start. Obstructions are the
//! target day's other timed, non-recurring events; all-day and recurring
//! events neither block nor move.
//!
//! The search never crosses a day boundary and is hard-capped; exhausting
//! it is an ordinary `None`, which callers handle by falling back to an
//! unconditional move.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use almanac_core::Calendar;

use crate::params::SchedParams;

/// Half-open interval overlap: `[s1, e1)` intersects `[s2, e2)`.
#[must_use]
pub fn overlaps(s1: NaiveDateTime, e1: NaiveDateTime, s2: NaiveDateTime, e2: NaiveDateTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Try to place the event at `idx` at or after `desired`, avoiding every
/// schedulable peer on the desired day.
///
/// On success the event's start and end are updated (duration preserved)
/// and the placed start is returned. `None` means no free slot exists
/// within the search budget or before the day rolls over.
#[must_use]
pub fn resolve_conflict(
    calendar: &mut Calendar,
    idx: usize,
    desired: NaiveDateTime,
    params: &SchedParams,
) -> Option<NaiveDateTime> {
    let day = desired.date();
    let duration = Duration::minutes(calendar.events[idx].duration_minutes());

    // Obstruction set: same-day timed, non-recurring peers.
    let obstructions: Vec<(NaiveDateTime, NaiveDateTime)> = calendar
        .schedulable_on(day)
        .into_iter()
        .filter(|&i| i != idx)
        .map(|i| (calendar.events[i].start_at(), calendar.events[i].end_at()))
        .collect();

    let mut candidate = desired;
    for attempt in 0..params.max_slot_attempts {
        if candidate.date() != day {
            debug!(attempt, "slot search hit the day boundary");
            return None;
        }
        let candidate_end = candidate + duration;
        let blocked = obstructions
            .iter()
            .any(|&(s, e)| overlaps(candidate, candidate_end, s, e));
        if !blocked {
            calendar.events[idx].move_to(candidate);
            debug!(
                title = %calendar.events[idx].title,
                start = %candidate,
                attempt,
                "conflict-free slot found"
            );
            return Some(candidate);
        }
        candidate += Duration::minutes(params.step_minutes);
    }
    debug!(start = %desired, "slot search budget exhausted");
    None
}
