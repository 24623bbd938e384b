//! Weekly load rebalancing.
//!
//! Redistributes timed, non-recurring events inside the ISO week
//! (Monday–Sunday) containing "today": each iteration takes the
//! latest-starting event from the most loaded day and tries to place it on
//! the least loaded day that is not in the past, searching slots from a
//! fixed morning start in fixed steps. A bounded heuristic, not a packer:
//! it stops when the spread closes, when nothing accepts an event, or at
//! a hard iteration cap.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use almanac_core::Calendar;

use crate::conflict::overlaps;
use crate::params::SchedParams;

/// Move events from over-loaded days to under-loaded days within the ISO
/// week containing `today`. Returns how many events moved.
pub fn rebalance_week(calendar: &mut Calendar, today: NaiveDate, params: &SchedParams) -> usize {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    // Seven buckets, Monday..Sunday, empty days included.
    let mut buckets: Vec<(NaiveDate, Vec<usize>)> = (0..7)
        .map(|offset| (monday + Duration::days(offset), Vec::new()))
        .collect();
    for (idx, event) in calendar.events.iter().enumerate() {
        if !event.is_schedulable() {
            continue;
        }
        let date = event.start.date();
        if let Some(bucket) = buckets.iter_mut().find(|(day, _)| *day == date) {
            bucket.1.push(idx);
        }
    }

    let mut moved = 0;
    for iteration in 0..params.max_rebalance_iterations {
        // Ascending by load; stable, so ties keep weekday order and the
        // heaviest day is simply the last position.
        let mut order: Vec<usize> = (0..buckets.len()).collect();
        order.sort_by_key(|&i| buckets[i].1.len());

        let Some(&light) = order.iter().find(|&&i| buckets[i].0 >= today) else {
            debug!("whole week is in the past, nothing to rebalance");
            break;
        };
        let Some(&heavy) = order.last() else {
            break;
        };
        let spread = buckets[heavy].1.len().saturating_sub(buckets[light].1.len());
        if spread == 0 {
            debug!(iteration, "week is balanced");
            break;
        }

        // Latest-starting event of the heaviest day.
        let Some(pick_pos) = buckets[heavy]
            .1
            .iter()
            .enumerate()
            .max_by_key(|&(_, &idx)| calendar.events[idx].start_at())
            .map(|(pos, _)| pos)
        else {
            break;
        };
        let event_idx = buckets[heavy].1[pick_pos];
        let duration = Duration::minutes(calendar.events[event_idx].duration_minutes());

        // Try the lightest day first, then the rest in ascending-load order.
        // Days already as loaded as the heaviest are excluded so a move can
        // never push any day past the pre-balance maximum.
        let heavy_load = buckets[heavy].1.len();
        let mut accepted: Option<(usize, NaiveDateTime)> = None;
        for &candidate_day in order.iter().filter(|&&i| {
            i != heavy && buckets[i].0 >= today && buckets[i].1.len() < heavy_load
        }) {
            if let Some(start) = find_slot(calendar, &buckets[candidate_day], duration, params) {
                accepted = Some((candidate_day, start));
                break;
            }
        }

        let Some((target, start)) = accepted else {
            debug!(iteration, "no day accepts another event, stopping");
            break;
        };

        debug!(
            title = %calendar.events[event_idx].title,
            from = %buckets[heavy].0,
            to = %buckets[target].0,
            start = %start,
            "rebalance move"
        );
        calendar.events[event_idx].move_to(start);
        buckets[heavy].1.remove(pick_pos);
        buckets[target].1.push(event_idx);
        moved += 1;
    }
    moved
}

/// Find a free slot on a day: candidates start at `slot_search_start` and
/// advance in fixed steps, capped; a candidate must end within the day and
/// clear every event already bucketed there.
fn find_slot(
    calendar: &Calendar,
    bucket: &(NaiveDate, Vec<usize>),
    duration: Duration,
    params: &SchedParams,
) -> Option<NaiveDateTime> {
    let (day, ref occupants) = *bucket;
    let day_end = day
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |d| d.and_time(NaiveTime::MIN));
    let mut candidate = day.and_time(params.slot_search_start);
    for _ in 0..params.max_slot_attempts {
        let end = candidate + duration;
        if end <= day_end {
            let blocked = occupants.iter().any(|&idx| {
                overlaps(
                    candidate,
                    end,
                    calendar.events[idx].start_at(),
                    calendar.events[idx].end_at(),
                )
            });
            if !blocked {
                return Some(candidate);
            }
        }
        candidate += Duration::minutes(params.step_minutes);
    }
    None
}
