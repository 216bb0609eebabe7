mod cli;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDateTime, NaiveTime};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CalendarCmd, Cli, Command, ExportGoogleCmd, ExportIcsCmd, ScheduleArgs, ScheduleCmd};
use dosier_core::calendar::{CalendarDay, MonthGrid};
use dosier_core::schedule::{DoseSchedule, DoseSpan};
use dosier_core::{compute_schedule, parse_start_time, project};
use dosier_export::{build_google_links, build_ics};

/// Initialize tracing based on CLI verbosity level.
///
/// 0 -> warn, 1 (-v) -> info, 2 (-vv) -> debug, 3+ (-vvv) -> trace.
/// `RUST_LOG` overrides the flag when set.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolved_span(args: &ScheduleArgs) -> DoseSpan {
    args.doses
        .map(DoseSpan::Doses)
        .or(args.days.map(DoseSpan::Days))
        .unwrap_or(DoseSpan::Days(7))
}

fn resolved_days(args: &ScheduleArgs) -> Option<u32> {
    match resolved_span(args) {
        DoseSpan::Days(days) => Some(days),
        DoseSpan::Doses(_) => None,
    }
}

fn compute(args: &ScheduleArgs, now: NaiveDateTime) -> anyhow::Result<DoseSchedule> {
    let start: NaiveTime = parse_start_time(&args.start)?;
    let schedule = compute_schedule(start, args.interval, resolved_span(args), now)?;
    Ok(schedule)
}

fn run_schedule(cmd: &ScheduleCmd, now: NaiveDateTime) -> anyhow::Result<()> {
    let schedule = compute(&cmd.args, now)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    println!("Doses ({} total):", schedule.events.len());
    for event in &schedule.events {
        println!("  {}", event.display_text);
    }
    println!("Daily hours: {}", schedule.daily_hours.join(", "));
    Ok(())
}

fn cell_text(cell: &CalendarDay) -> String {
    let marker = if cell.has_medicine { "*" } else { " " };
    if cell.is_current_month {
        format!("{:>3}{marker}", cell.day)
    } else {
        format!("{:>3} ", "·")
    }
}

fn print_grid(grid: &MonthGrid) {
    println!("{}", grid.label);
    println!("{}", ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].join(" "));
    for week in grid.cells.chunks(7) {
        let row: Vec<String> = week.iter().map(cell_text).collect();
        println!("{}", row.join(" "));
    }
    println!("(* = dose day)");
}

fn run_calendar(cmd: &CalendarCmd, now: NaiveDateTime) -> anyhow::Result<()> {
    let schedule = compute(&cmd.args, now)?;
    let today = now.date();
    let year = cmd.year.unwrap_or_else(|| today.year());
    let month = cmd.month.unwrap_or_else(|| today.month());

    let grid = project(&schedule.events, year, month, today)?;
    print_grid(&grid);
    Ok(())
}

fn run_export_ics(cmd: &ExportIcsCmd, now: NaiveDateTime) -> anyhow::Result<()> {
    let schedule = compute(&cmd.args, now)?;
    let ics = build_ics(&schedule.events, &cmd.title, now)?;

    std::fs::write(&cmd.output, ics)
        .with_context(|| format!("Failed to write {}", cmd.output.display()))?;

    tracing::info!(path = %cmd.output.display(), events = schedule.events.len(), "wrote ICS file");
    println!(
        "Wrote {} ({} doses)",
        cmd.output.display(),
        schedule.events.len()
    );
    Ok(())
}

fn run_export_google(cmd: &ExportGoogleCmd, now: NaiveDateTime) -> anyhow::Result<()> {
    let schedule = compute(&cmd.args, now)?;
    let export = build_google_links(
        &schedule.events,
        &cmd.title,
        cmd.args.interval,
        resolved_days(&cmd.args),
    )?;

    println!("Starts:  {}", export.summary.starts);
    println!("Ends:    {}", export.summary.ends);
    println!("Repeats: {}", export.summary.repeats);
    println!("Total doses: {}", export.summary.total_doses);
    if let Some(warning) = &export.warning {
        println!("\nWarning: {warning}");
    }

    println!();
    for link in &export.links {
        println!("Daily at {} ({})", link.time_label, link.dose_label);
        println!("  {}", link.range_label);
        println!("  {}", link.url);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = Local::now().naive_local();

    match &cli.command {
        Command::Schedule(cmd) => run_schedule(cmd, now),
        Command::Calendar(cmd) => run_calendar(cmd, now),
        Command::ExportIcs(cmd) => run_export_ics(cmd, now),
        Command::ExportGoogle(cmd) => run_export_google(cmd, now),
    }
}
