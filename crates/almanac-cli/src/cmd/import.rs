//! `alm import` — replace the whole document with an uploaded calendar.
//!
//! The uploaded text is validated before anything is written; a rejected
//! upload leaves the existing document byte-for-byte intact.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::CmdContext;
use crate::output::render_message;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Read the replacement document from this file instead of stdin.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run_import(args: &ImportArgs, ctx: &CmdContext) -> anyhow::Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            buf
        }
    };
    ctx.store.replace_raw(&text)?;
    render_message(ctx.mode, "Calendar replaced")
}
