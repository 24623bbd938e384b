//! `alm export` — the persisted iCalendar document, verbatim.

use clap::Args;
use serde_json::json;

use super::CmdContext;
use crate::output::render_json;

#[derive(Args, Debug)]
pub struct ExportArgs {}

pub fn run_export(_args: &ExportArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let raw = ctx.store.read_raw()?;
    if ctx.mode.is_json() {
        render_json(&json!({ "document": raw }))
    } else {
        print!("{raw}");
        Ok(())
    }
}
