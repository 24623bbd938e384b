//! `alm apply` — apply a planner response (action list JSON).

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use almanac_sched::Plan;

use super::CmdContext;
use crate::output::render_applied;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Read the plan JSON from this file instead of stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run_apply(args: &ApplyArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read plan from stdin")?;
            buf
        }
    };
    let plan: Plan = serde_json::from_str(&text).context("Plan JSON does not parse")?;
    let outcome = ctx.applier().apply_plan(&plan)?;
    render_applied(ctx.mode, outcome.applied, &outcome.replies, &outcome.suggestions)
}
