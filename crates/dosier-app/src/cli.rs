use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dosier medication schedule calculator.
#[derive(Parser)]
#[command(
    name = "dosier",
    version,
    about = "Medication dosing schedules, calendar views, and calendar exports"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the dose schedule and daily dosing hours.
    Schedule(ScheduleCmd),
    /// Print a month-grid calendar with dose counts.
    Calendar(CalendarCmd),
    /// Write the schedule as an iCalendar (.ics) file.
    ExportIcs(ExportIcsCmd),
    /// Print Google Calendar quick-add links.
    ExportGoogle(ExportGoogleCmd),
}

/// Schedule parameters shared by every subcommand.
#[derive(clap::Args)]
pub struct ScheduleArgs {
    /// First dose time of day, 24-hour HH:MM.
    #[arg(short, long, default_value = "08:00")]
    pub start: String,

    /// Hours between doses (1-24).
    #[arg(short, long, default_value_t = 8)]
    pub interval: u32,

    /// Schedule length in days (1-30). Defaults to 7.
    #[arg(short, long, conflicts_with = "doses")]
    pub days: Option<u32>,

    /// Total dose count (1-10), instead of a day count.
    #[arg(long)]
    pub doses: Option<u32>,
}

/// Arguments for the `schedule` subcommand.
#[derive(clap::Args)]
pub struct ScheduleCmd {
    #[command(flatten)]
    pub args: ScheduleArgs,

    /// Emit the schedule as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `calendar` subcommand.
#[derive(clap::Args)]
pub struct CalendarCmd {
    #[command(flatten)]
    pub args: ScheduleArgs,

    /// Year to display (defaults to the current year).
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month to display, 1-12 (defaults to the current month).
    #[arg(short, long)]
    pub month: Option<u32>,
}

/// Arguments for the `export-ics` subcommand.
#[derive(clap::Args)]
pub struct ExportIcsCmd {
    #[command(flatten)]
    pub args: ScheduleArgs,

    /// Event title used for every dose.
    #[arg(short, long, default_value = "💊 Take Medication")]
    pub title: String,

    /// Output path for the .ics file.
    #[arg(short, long, default_value = "medication-schedule.ics")]
    pub output: PathBuf,
}

/// Arguments for the `export-google` subcommand.
#[derive(clap::Args)]
pub struct ExportGoogleCmd {
    #[command(flatten)]
    pub args: ScheduleArgs,

    /// Event title used for every dose.
    #[arg(short, long, default_value = "💊 Take Medication")]
    pub title: String,
}
