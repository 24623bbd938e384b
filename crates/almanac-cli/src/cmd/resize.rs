//! `alm resize` — change an event's duration, keeping its start.

use clap::Args;

use almanac_sched::Action;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Title of the event to resize (case-insensitive).
    #[arg(short, long)]
    pub title: String,

    /// Event date, `yyyy-MM-dd`.
    #[arg(short, long)]
    pub date: String,

    /// Start time, `HH:mm`.
    #[arg(long)]
    pub time: String,

    /// New duration in minutes.
    #[arg(long)]
    pub duration: i64,
}

pub fn run_resize(args: &ResizeArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let action = Action::ResizeEvent {
        title: args.title.clone(),
        date: args.date.clone(),
        time: args.time.clone(),
        new_duration_minutes: args.duration,
    };
    let outcome = ctx.applier().apply_action(&action)?;
    render_applied(ctx.mode, outcome.applied, &[], &[])
}
