//! `alm add` — create a new event.

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the new event.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Event date, `yyyy-MM-dd`.
    #[arg(short, long)]
    pub date: String,

    /// Start time, `HH:mm`.
    #[arg(long)]
    pub time: String,

    /// Duration in minutes (default 60).
    #[arg(long)]
    pub duration: Option<i64>,

    /// Recurrence: none, daily, weekly, monthly, or yearly.
    #[arg(short, long)]
    pub recurring: Option<String>,
}

pub fn run_add(args: &AddArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let action = Action::CreateEvent {
        title: args.title.clone(),
        date: args.date.clone(),
        time: args.time.clone(),
        recurring: args.recurring.clone(),
        duration_minutes: args.duration,
    };
    let outcome = ctx.applier().apply_action(&action)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
