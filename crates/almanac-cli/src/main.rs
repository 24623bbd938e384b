#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use almanac_core::config::load_config;
use almanac_core::CalendarStore;
use almanac_sched::SchedParams;
use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "almanac: a plain-file calendar with conflict-aware scheduling",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Calendar file to operate on (overrides config and env).
    #[arg(long, global = true, value_name = "PATH")]
    calendar: Option<PathBuf>,

    /// Permit edits that target times in the past.
    #[arg(long, global = true)]
    allow_past: bool,

    /// Override the clock, `yyyy-MM-dd HH:mm` (for scripting and tests).
    #[arg(long, global = true, value_name = "DATETIME")]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Edit",
        about = "Create an event",
        after_help = "EXAMPLES:\n    alm add --title \"Standup\" --date 2025-06-02 --time 09:00 --duration 30 --recurring daily"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Move an event to a new start",
        long_about = "Move an event to a new start. The target day is searched for a conflict-free slot in 30-minute steps; when every slot is taken the event is moved to the requested time unconditionally.",
        after_help = "EXAMPLES:\n    alm move --title \"Standup\" --date 2025-06-02 --time 09:00 --new-date 2025-06-03 --new-time 10:00"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Change an event's duration",
        after_help = "EXAMPLES:\n    alm resize --title \"Standup\" --date 2025-06-02 --time 09:00 --duration 45"
    )]
    Resize(cmd::resize::ResizeArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Delete an event",
        after_help = "EXAMPLES:\n    alm remove --title \"Standup\" --date 2025-06-02 --time 09:00"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Scheduling",
        about = "Enforce a minimum gap between same-day events",
        after_help = "EXAMPLES:\n    # Keep at least 30 minutes between events, today onward\n    alm space --gap 30"
    )]
    Space(cmd::space::SpaceArgs),

    #[command(
        next_help_heading = "Scheduling",
        about = "Spread this week's events across its days"
    )]
    Rebalance(cmd::rebalance::RebalanceArgs),

    #[command(
        next_help_heading = "Scheduling",
        about = "Apply a planner action list (JSON)",
        after_help = "EXAMPLES:\n    alm apply --file plan.json\n    some-planner | alm apply"
    )]
    Apply(cmd::apply::ApplyArgs),

    #[command(next_help_heading = "Read", about = "Chronological day-by-day summary")]
    Summary(cmd::summary::SummaryArgs),

    #[command(next_help_heading = "Read", about = "List timed events")]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Document", about = "Print the raw iCalendar document")]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Document",
        about = "Replace the whole document with an uploaded calendar",
        after_help = "EXAMPLES:\n    alm import --file backup.ics"
    )]
    Import(cmd::import::ImportArgs),
}

fn init_tracing(verbose: bool) {
    let filter = std::env::var("ALMANAC_LOG").map_or_else(
        |_| EnvFilter::new(if verbose { "debug" } else { "warn" }),
        EnvFilter::new,
    );
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve the clock: the `--now` override when given, wall clock otherwise.
fn resolve_now(flag: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match flag {
        Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
            .map_err(|_| anyhow::anyhow!("invalid --now '{raw}' (expected yyyy-MM-dd HH:mm)")),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config()?;
    let store = CalendarStore::resolve(cli.calendar.clone(), &config)?;
    let now = resolve_now(cli.now.as_deref())?;
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let params = SchedParams {
        slot_search_start: config.day_start_time(),
        ..SchedParams::default()
    };
    let ctx = cmd::CmdContext {
        store,
        params,
        now,
        allow_past: cli.allow_past,
        mode,
        default_gap_minutes: config.default_gap_minutes,
    };

    match &cli.command {
        Commands::Add(args) => cmd::add::run_add(args, &ctx),
        Commands::Move(args) => cmd::move_cmd::run_move(args, &ctx),
        Commands::Resize(args) => cmd::resize::run_resize(args, &ctx),
        Commands::Remove(args) => cmd::remove::run_remove(args, &ctx),
        Commands::Space(args) => cmd::space::run_space(args, &ctx),
        Commands::Rebalance(args) => cmd::rebalance::run_rebalance(args, &ctx),
        Commands::Apply(args) => cmd::apply::run_apply(args, &ctx),
        Commands::Summary(args) => cmd::summary::run_summary(args, &ctx),
        Commands::List(args) => cmd::list::run_list(args, &ctx),
        Commands::Export(args) => cmd::export::run_export(args, &ctx),
        Commands::Import(args) => cmd::import::run_import(args, &ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_flag_parses_or_rejects() {
        let parsed = resolve_now(Some("2025-06-02 09:00")).expect("valid");
        assert_eq!(parsed.to_string(), "2025-06-02 09:00:00");
        assert!(resolve_now(Some("tomorrow")).is_err());
    }

    #[test]
    fn cli_parses_a_full_add_invocation() {
        let cli = Cli::parse_from([
            "alm",
            "--json",
            "--now",
            "2025-06-01 08:00",
            "add",
            "--title",
            "Standup",
            "--date",
            "2025-06-02",
            "--time",
            "09:00",
        ]);
        assert!(cli.json);
        assert_eq!(cli.now.as_deref(), Some("2025-06-01 08:00"));
        assert!(matches!(cli.command, Commands::Add(_)));
    }
}
