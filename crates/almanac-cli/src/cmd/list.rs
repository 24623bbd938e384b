//! `alm list` — timed events, sorted by date and start.

use clap::Args;

use almanac_core::view;

use super::CmdContext;
use crate::output::render_json;

#[derive(Args, Debug)]
pub struct ListArgs {}

pub fn run_list(_args: &ListArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let calendar = ctx.store.load()?;
    let rows = view::list_events(&calendar);
    if ctx.mode.is_json() {
        return render_json(&rows);
    }
    for row in &rows {
        println!(
            "{} {}-{} {} ({} min)",
            row.date, row.start, row.end, row.title, row.duration_minutes
        );
    }
    Ok(())
}
