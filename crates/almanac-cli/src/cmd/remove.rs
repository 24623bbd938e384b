//! `alm remove` — delete an event by (title, start).

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Title of the event to delete (case-insensitive).
    #[arg(short, long)]
    pub title: String,

    /// Event date, `yyyy-MM-dd`.
    #[arg(short, long)]
    pub date: String,

    /// Start time, `HH:mm`.
    #[arg(long)]
    pub time: String,
}

pub fn run_remove(args: &RemoveArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let action = Action::DeleteEvent {
        title: args.title.clone(),
        date: args.date.clone(),
        time: args.time.clone(),
    };
    let outcome = ctx.applier().apply_action(&action)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
