//! `alm move` — reschedule an event, avoiding conflicts where possible.

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Title of the event to move (case-insensitive).
    #[arg(short, long)]
    pub title: String,

    /// Current event date, `yyyy-MM-dd`.
    #[arg(short, long)]
    pub date: String,

    /// Current start time, `HH:mm`.
    #[arg(long)]
    pub time: String,

    /// Target date (defaults to the current date).
    #[arg(long)]
    pub new_date: Option<String>,

    /// Target start time (defaults to the current time).
    #[arg(long)]
    pub new_time: Option<String>,
}

pub fn run_move(args: &MoveArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let action = Action::UpdateEvent {
        title: args.title.clone(),
        date: args.date.clone(),
        time: args.time.clone(),
        new_date: args.new_date.clone(),
        new_time: args.new_time.clone(),
    };
    let outcome = ctx.applier().apply_action(&action)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
