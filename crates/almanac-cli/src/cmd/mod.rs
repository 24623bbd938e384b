//! One module per subcommand, plus the shared command context.

pub mod add;
pub mod apply;
pub mod export;
pub mod import;
pub mod list;
pub mod move_cmd;
pub mod rebalance;
pub mod remove;
pub mod resize;
pub mod space;
pub mod summary;

use chrono::NaiveDateTime;

use almanac_core::CalendarStore;
use almanac_sched::{Applier, SchedParams};

use crate::output::OutputMode;

/// Everything a command handler needs: the resolved store, scheduling
/// parameters, the clock value, and the output mode.
pub struct CmdContext {
    pub store: CalendarStore,
    pub params: SchedParams,
    pub now: NaiveDateTime,
    pub allow_past: bool,
    pub mode: OutputMode,
    /// Default auto-space gap from config, used when `space` has no flag.
    pub default_gap_minutes: i64,
}

impl CmdContext {
    /// Build an applier bound to this context's store and clock.
    pub fn applier(&self) -> Applier<'_> {
        Applier::new(&self.store, self.now)
            .with_params(self.params.clone())
            .allow_past(self.allow_past)
    }
}
