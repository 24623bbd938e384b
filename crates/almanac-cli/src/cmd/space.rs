//! `alm space` — enforce a minimum gap between same-day events.

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct SpaceArgs {
    /// Minimum gap in minutes (defaults to the configured value).
    #[arg(short, long)]
    pub gap: Option<i64>,
}

pub fn run_space(args: &SpaceArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let action = Action::AutoSpace {
        min_gap_minutes: Some(args.gap.unwrap_or(ctx.default_gap_minutes)),
    };
    let outcome = ctx.applier().apply_action(&action)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
