use chrono::NaiveTime;

/// Behavioral constants of the scheduling algorithms.
///
/// The defaults are compatibility contracts carried over from the original
/// tool; they are fields rather than literals so callers (and tests) can
/// override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedParams {
    /// Step between candidate starts when searching for a free slot.
    pub step_minutes: i64,
    /// Cap on candidate slots tried per search (48 steps of 30 min = 24 h).
    pub max_slot_attempts: u32,
    /// Cap on outer iterations of the week rebalancer.
    pub max_rebalance_iterations: u32,
    /// First candidate time of day when the rebalancer places an event.
    pub slot_search_start: NaiveTime,
    /// Duration assumed when an event's stored boundaries are degenerate.
    pub default_duration_minutes: i64,
}

impl Default for SchedParams {
    fn default() -> Self {
        Self {
            step_minutes: 30,
            max_slot_attempts: 48,
            max_rebalance_iterations: 30,
            slot_search_start: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
            default_duration_minutes: 60,
        }
    }
}
