//! `alm rebalance` — spread this week's events across its days.

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct RebalanceArgs {}

pub fn run_rebalance(_args: &RebalanceArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let outcome = ctx.applier().apply_action(&Action::RebalanceWeek)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
