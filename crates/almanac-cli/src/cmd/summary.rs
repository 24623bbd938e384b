//! `alm summary` — human-readable chronological overview.

use clap::Args;
use serde_json::json;

use almanac_core::view;

use super::CmdContext;
use crate::output::render_json;

#[derive(Args, Debug)]
pub struct SummaryArgs {}

pub fn run_summary(_args: &SummaryArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let calendar = ctx.store.load()?;
    let text = view::summarize(&calendar);
    if ctx.mode.is_json() {
        render_json(&json!({ "summary": text }))
    } else {
        print!("{text}");
        Ok(())
    }
}
