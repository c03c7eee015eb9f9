mod alerts;
mod collectors;
mod config;
mod error;
mod logging;
mod models;
mod sort;
mod ui;
mod util;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use collectors::mounts::ProcMounts;
use collectors::storage::{collect_storage_info, CollectOptions};
use config::{Config, Overrides, Settings};
use crossterm::style::Stylize;
use alerts::Overall;
use error::{CollectError, ConfigError};
use models::mount::{OutputFormat, SortKey, StorageRow, Unit};
use std::io::{self, IsTerminal, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};
use ui::theme::{colors_enabled, Theme};

/// Exit code for errors that are neither threshold nor interrupt driven.
const EXIT_INTERNAL: i32 = 3;
/// Same code as WARNING; the stderr message tells them apart.
const EXIT_INTERRUPTED: i32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "capacity",
    about = "Display disk usage for mounted filesystems.",
    version,
    after_help = "Exit status: 0=OK, 1=WARNING, 2=CRITICAL, 3=internal error\n\nExample: capacity -a --sort total --json | jq ."
)]
struct Cli {
    /// Include all mountpoints, pseudo-filesystems too
    #[arg(short, long)]
    all: bool,

    /// Only physical filesystems (drops tmpfs, proc, loop devices, ...)
    #[arg(long)]
    physical: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output in JSON format
    #[arg(long, conflicts_with = "raw_json")]
    json: bool,

    /// Output in raw JSON (no highlighting)
    #[arg(long)]
    raw_json: bool,

    /// Warning threshold in percent [default: 85]
    #[arg(long, value_name = "PCT", value_parser = clap::value_parser!(u8).range(0..=100))]
    warning_threshold: Option<u8>,

    /// Critical threshold in percent, at least the warning threshold [default: 95]
    #[arg(long, value_name = "PCT", value_parser = clap::value_parser!(u8).range(0..=100))]
    critical_threshold: Option<u8>,

    /// Sort table by field [default: percent]
    #[arg(long, value_enum, value_name = "FIELD")]
    sort: Option<SortKey>,

    /// Suppress the "Generated at" line
    #[arg(long)]
    no_timestamp: bool,

    /// Display unit for sizes [default: GB]
    #[arg(long, value_enum)]
    unit: Option<Unit>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Config file [default: ~/.config/capacity/capacity.toml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print config file path and effective settings, then exit
    #[arg(long)]
    print_config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

impl Cli {
    fn format(&self) -> OutputFormat {
        if self.raw_json {
            OutputFormat::RawJson
        } else if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            warning_pct:   self.warning_threshold,
            critical_pct:  self.critical_threshold,
            unit:          self.unit,
            sort:          self.sort,
            include_all:   self.all,
            physical_only: self.physical,
            format:        self.format(),
            no_color:      self.no_color,
            no_timestamp:  self.no_timestamp,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "capacity", &mut io::stdout());
        return;
    }

    let cfg = Config::load(cli.config.as_deref()).unwrap_or_else(|e| usage_error(e));
    let settings = Settings::resolve(&cfg, &cli.overrides()).unwrap_or_else(|e| usage_error(e));

    if cli.print_config {
        print_config(cli.config.as_deref(), &settings);
        return;
    }

    logging::init(cli.verbose);

    let code = match panic::catch_unwind(AssertUnwindSafe(|| run(&settings))) {
        Ok(Ok(code)) => code,
        Ok(Err(err)) if is_interrupt(&err) => {
            print_cancelled(settings.color);
            EXIT_INTERRUPTED
        }
        Ok(Err(err)) => {
            error!("Unexpected error: {:#}", err);
            EXIT_INTERNAL
        }
        Err(_) => {
            error!("Unexpected error: internal panic during run");
            EXIT_INTERNAL
        }
    };
    std::process::exit(code);
}

/// Report a configuration problem the way clap reports a bad flag, then exit.
fn usage_error(err: ConfigError) -> ! {
    Cli::command().error(ErrorKind::ValueValidation, err).exit()
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<CollectError>(), Some(CollectError::Interrupted))
}

fn print_cancelled(color: bool) {
    let msg = "Operation cancelled by user";
    if color && io::stderr().is_terminal() {
        eprintln!("{}", msg.red().bold());
    } else {
        eprintln!("{}", msg);
    }
}

/// One collection pass. Returns the exit code chosen by the worst status.
fn run(settings: &Settings) -> Result<i32> {
    util::signal::install().context("installing SIGINT handler")?;
    info!("Starting capacity");

    let opts = CollectOptions {
        include_all:   settings.include_all,
        physical_only: settings.physical_only,
    };
    let records = collect_storage_info(&ProcMounts, opts, util::signal::flag())?;
    let rows    = alerts::classify_records(records, settings.unit, &settings.thresholds);
    let rows    = sort::sort_rows(rows, settings.sort);
    let overall = alerts::aggregate(&rows);
    debug!(rows = rows.len(), ?overall, sort = settings.sort.name(), "classified");

    let mut stdout = io::stdout().lock();
    let code = present(&rows, overall, settings, &mut stdout, util::signal::flag())?;

    info!("capacity completed");
    Ok(code)
}

/// Write the report to `out` and pick the exit code. A raised `cancel` flag,
/// before the first byte or by the final flush, turns the run into an interrupt.
fn present<W: Write>(
    rows:     &[StorageRow],
    overall:  Overall,
    settings: &Settings,
    out:      &mut W,
    cancel:   &AtomicBool,
) -> Result<i32> {
    if cancel.load(Ordering::SeqCst) {
        return Err(CollectError::Interrupted.into());
    }

    let theme = Theme::new(colors_enabled(settings.color));
    match settings.format {
        OutputFormat::Table   => write!(out, "{}", ui::table::render(rows, settings.unit, &theme))?,
        OutputFormat::Json    => writeln!(out, "{}", ui::json::render(rows, settings.unit, &theme)?)?,
        OutputFormat::RawJson => writeln!(out, "{}", ui::json::render_raw(rows, settings.unit)?)?,
    }

    if settings.timestamp {
        let now = chrono::Local::now();
        if settings.format == OutputFormat::Table {
            writeln!(out, "{}", ui::footer::render_timestamp(now, &theme))?;
        } else {
            // keep stdout parseable
            eprintln!("{}", ui::footer::render_timestamp(now, &Theme::plain()));
        }
    }
    out.flush()?;

    if cancel.load(Ordering::SeqCst) {
        return Err(CollectError::Interrupted.into());
    }
    Ok(overall.exit_code())
}

fn print_config(explicit: Option<&Path>, s: &Settings) {
    let path = explicit.map(Path::to_path_buf).or_else(Config::config_path);
    let shown = match &path {
        Some(p) if p.exists() => p.to_string_lossy().into_owned(),
        Some(p)               => format!("{} (not found, using defaults)", p.to_string_lossy()),
        None                  => "(unknown)".to_string(),
    };
    let format = match s.format {
        OutputFormat::Table   => "table",
        OutputFormat::Json    => "json",
        OutputFormat::RawJson => "raw-json",
    };
    println!("Config: {}", shown);
    println!();
    println!("[thresholds]");
    println!("  warning_pct  = {}%", s.thresholds.warning());
    println!("  critical_pct = {}%", s.thresholds.critical());
    println!();
    println!("[display]");
    println!("  unit      = {}", s.unit.label());
    println!("  sort      = {}", s.sort.name());
    println!("  color     = {}", s.color);
    println!("  timestamp = {}", s.timestamp);
    println!("  format    = {}", format);
}
