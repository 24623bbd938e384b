//! almanac-sched library.
//!
//! The scheduling engine over an [`almanac_core::Calendar`]: conflict-aware
//! placement, intra-day auto-spacing, weekly load rebalancing, and the
//! action applier that turns one structured planner action into zero or
//! more of these mutations.
//!
//! All algorithms are bounded: fixed step sizes, hard retry caps, and a
//! hard outer-iteration cap on rebalancing guarantee termination. They all
//! treat time as past-sealed — no event is ever moved onto a day before
//! "today", where "today" comes from the caller-supplied clock value.

#![forbid(unsafe_code)]

pub mod apply;
pub mod conflict;
pub mod params;
pub mod rebalance;
pub mod spacing;

pub use apply::{Action, Applier, ApplyOutcome, MoveSpec, Plan, PlanOutcome, Suggestion};
pub use params::SchedParams;
