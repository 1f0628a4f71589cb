//! Command-line front end for the DutyLog record book.
//!
//! # Responsibility
//! - Map subcommands onto `dutylog_core` record service calls.
//! - Render day records and outcomes as plain text.
//!
//! # Invariants
//! - All mutations go through `RecordService`; this binary never edits the
//!   records document directly.
//! - Errors are printed to stderr and exit with status 1.

use clap::{Args, Parser, Subcommand};
use dutylog_core::config::DEFAULT_DATA_DIR;
use dutylog_core::{
    default_log_level, init_logging, open_service, DateKey, DayEntry, JsonRecordRepository,
    RecordService, StatusLabel, StoreConfig, ValidationPolicy,
};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;
type Service = RecordService<JsonRecordRepository>;

/// Daily duty log: mark students who are late or forgot their pass.
#[derive(Parser, Debug)]
#[command(name = "dutylog", version)]
struct Cli {
    /// Directory holding `records.json`.
    #[arg(
        long,
        env = "DUTYLOG_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        global = true
    )]
    data_dir: PathBuf,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "DUTYLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Directory for rolling log files (defaults to `<data-dir>/logs`).
    #[arg(long, env = "DUTYLOG_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,
    /// Accept students that are not on the roster.
    #[arg(long, global = true)]
    permissive: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List roster classes.
    Classes,
    /// List students, optionally filtered by a case-insensitive query.
    Students {
        query: Option<String>,
    },
    /// List the status labels that can be marked.
    Statuses,
    /// Show the records of one day.
    Day {
        #[command(flatten)]
        date: DateArg,
        /// Move this many days from the selected date (negative goes back).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        shift: i64,
    },
    /// List every date that has records.
    Dates,
    /// Mark a student with a status.
    Mark {
        #[command(flatten)]
        date: DateArg,
        /// Exact identity or a query matching one student.
        #[arg(long)]
        student: String,
        #[arg(long)]
        status: String,
    },
    /// Replace one status of a student.
    Edit {
        #[command(flatten)]
        date: DateArg,
        #[arg(long)]
        student: String,
        /// Status currently recorded.
        #[arg(long = "from")]
        from_status: String,
        /// Replacement status.
        #[arg(long = "to")]
        to_status: String,
        /// Which of several equal statuses to target (0 = first).
        #[arg(long, default_value_t = 0)]
        occurrence: usize,
    },
    /// Delete one status of a student.
    Delete {
        #[command(flatten)]
        date: DateArg,
        #[arg(long)]
        student: String,
        #[arg(long)]
        status: String,
        #[arg(long, default_value_t = 0)]
        occurrence: usize,
    },
}

#[derive(Args, Debug)]
struct DateArg {
    /// Date as YYYY-MM-DD; defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl DateArg {
    fn resolve(&self) -> CliResult<DateKey> {
        match self.date.as_deref() {
            Some(value) => Ok(Service::parse_date(value)?),
            None => Ok(DateKey::today()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = StoreConfig::in_dir(&cli.data_dir);
    let policy = if cli.permissive {
        ValidationPolicy::Permissive
    } else {
        ValidationPolicy::Strict
    };
    let mut service = open_service(&config)?.with_policy(policy);

    match cli.command {
        Command::Classes => {
            for class in service.roster().list_classes() {
                println!("{class}");
            }
        }
        Command::Students { query } => {
            for identity in service.roster().search(query.as_deref().unwrap_or("")) {
                println!("{identity}");
            }
        }
        Command::Statuses => {
            for status in StatusLabel::ALL {
                println!("{:<14} {}", status.code(), status.label());
            }
        }
        Command::Day { date, shift } => {
            let date = date.resolve()?.shifted(shift);
            print_day(&service, &date);
        }
        Command::Dates => {
            for date in service.dates() {
                println!("{date}");
            }
        }
        Command::Mark {
            date,
            student,
            status,
        } => {
            let date = date.resolve()?;
            let identity = service.resolve_student(&student)?;
            let status = Service::parse_status(&status)?;
            service.mark(&date, &identity, status)?;
            println!("Marked: {identity} - {status}");
        }
        Command::Edit {
            date,
            student,
            from_status,
            to_status,
            occurrence,
        } => {
            let date = date.resolve()?;
            let identity = service.resolve_student(&student)?;
            let entries = service.day_entries(&date);
            let old_status = stored_status(&entries, &identity, &from_status);
            let new_status = Service::parse_status(&to_status)?;
            service.edit_at(&date, &identity, &old_status, occurrence, new_status)?;
            println!("Edited: {identity} - {old_status} -> {new_status}");
        }
        Command::Delete {
            date,
            student,
            status,
            occurrence,
        } => {
            let date = date.resolve()?;
            let identity = service.resolve_student(&student)?;
            let entries = service.day_entries(&date);
            let status = stored_status(&entries, &identity, &status);
            service.delete_at(&date, &identity, &status, occurrence)?;
            println!("Deleted: {identity} - {status}");
        }
    }

    Ok(())
}

fn print_day(service: &Service, date: &DateKey) {
    let entries = service.day_entries(date);
    if entries.is_empty() {
        println!("No records for {date}.");
        return;
    }

    println!("Records for {date}:");
    for (row, entry) in entries.iter().enumerate() {
        println!("{:>3}. {} - {}", row + 1, entry.identity, entry.status);
    }
}

// Text already recorded for the student wins verbatim; otherwise a status code
// resolves to its stored label, and unknown text is passed through unchanged.
fn stored_status(entries: &[DayEntry], identity: &str, input: &str) -> String {
    let recorded = entries
        .iter()
        .any(|entry| entry.identity == identity && entry.status == input);
    if recorded {
        return input.to_string();
    }
    match input.parse::<StatusLabel>() {
        Ok(status) => status.label().to_string(),
        Err(_) => input.to_string(),
    }
}

fn setup_logging(cli: &Cli) {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = absolute(
        &cli.log_dir
            .clone()
            .unwrap_or_else(|| cli.data_dir.join("logs")),
    );

    if let Err(err) = init_logging(&level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
        return;
    }
    info!(
        "event=cli_start module=cli status=ok policy={}",
        if cli.permissive { "permissive" } else { "strict" }
    );
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
