//! Intra-day auto-spacing.
//!
//! Walks each day from today forward and pushes later events out so that
//! consecutive timed events keep at least a minimum gap between them.
//! Events never spill into the next day: a shift that would cross midnight
//! is refused and the event stays where it is, though its original end
//! still feeds the running threshold for whatever follows it.

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use almanac_core::Calendar;

/// Enforce `min_gap_minutes` between consecutive schedulable events on
/// every day that is `today` or later. Returns how many events moved.
///
/// All-day and recurring events are invisible here: they are not moved,
/// they block nothing, and they do not advance the gap threshold.
pub fn auto_space(calendar: &mut Calendar, min_gap_minutes: i64, today: NaiveDate) -> usize {
    let gap = Duration::minutes(min_gap_minutes);
    let mut days: Vec<NaiveDate> = calendar
        .events
        .iter()
        .filter(|e| e.is_schedulable() && e.start.date() >= today)
        .map(|e| e.start.date())
        .collect();
    days.sort_unstable();
    days.dedup();

    let mut moved = 0;
    for day in days {
        let indices = calendar.schedulable_on(day);
        let Some((&first, rest)) = indices.split_first() else {
            continue;
        };
        let next_midnight = day
            .succ_opt()
            .map_or(chrono::NaiveDateTime::MAX, |d| d.and_time(NaiveTime::MIN));
        let mut next_allowed = calendar.events[first].end_at() + gap;

        for &idx in rest {
            let event = &calendar.events[idx];
            if event.start_at() < next_allowed {
                let new_end = next_allowed + Duration::minutes(event.duration_minutes());
                if next_allowed.date() == day && new_end <= next_midnight {
                    debug!(title = %event.title, start = %next_allowed, "auto-space shift");
                    calendar.events[idx].move_to(next_allowed);
                    moved += 1;
                } else {
                    debug!(title = %event.title, "auto-space shift would spill past midnight, left in place");
                }
            }
            // Threshold advances from the actual end, moved or not.
            next_allowed = calendar.events[idx].end_at() + gap;
        }
    }
    moved
}
