//! `alarm-guard` CLI — check proposed alarms against a snapshot of scheduled alarms.
//!
//! ## Usage
//!
//! ```sh
//! # Does a 06:00 alarm with a 60 minute light alarm collide with anything?
//! alarm-guard check --alarms alarms.json --start 2024-01-10T06:00 --light 60
//!
//! # Show which alarm blocks it
//! alarm-guard check --alarms alarms.json --start 2024-01-10T06:00 --light 60 --explain
//!
//! # Classify a form submission (reads alarms from stdin)
//! cat alarms.json | alarm-guard state --alarms - --date 2024-01-10 --time 06:30 \
//!     --light 45 --snooze 10 --replacing 6f2c0b9e-2f55-4b8e-9a51-3c1f3f0b7d11
//!
//! # Earliest schedulable start for a 30 minute light alarm
//! alarm-guard earliest --light 30
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use std::io::{self, Read};

use alarm_guard::{
    Alarm, AlarmId, Clock, FixedClock, GuardConfig, InterferenceChecker, Proposal, SystemClock,
};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Parser)]
#[command(
    name = "alarm-guard",
    version,
    about = "Check proposed alarms for interference with scheduled alarms"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (safety buffer, recurrence horizon)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a proposed alarm interferes with scheduled alarms
    Check {
        /// JSON array of scheduled alarms ("-" reads stdin)
        #[arg(short, long)]
        alarms: String,
        /// Proposed start, e.g. 2024-01-10T06:00
        #[arg(long)]
        start: String,
        /// Light alarm lead-in in minutes (0 disables it)
        #[arg(long, default_value_t = 0)]
        light: u32,
        /// Id of the alarm being edited
        #[arg(long)]
        replacing: Option<String>,
        /// List the alarms that block the proposal
        #[arg(long)]
        explain: bool,
    },
    /// Classify a schedule/update attempt into a single state
    State {
        /// JSON array of scheduled alarms ("-" reads stdin)
        #[arg(short, long)]
        alarms: String,
        /// Proposed date, e.g. 2024-01-10
        #[arg(long)]
        date: Option<String>,
        /// Proposed time, e.g. 06:30
        #[arg(long)]
        time: Option<String>,
        /// Light alarm lead-in in minutes (omit for no light alarm, negative is out of range)
        #[arg(long, allow_negative_numbers = true)]
        light: Option<i64>,
        /// Snooze length in minutes (negative is out of range)
        #[arg(long, allow_negative_numbers = true)]
        snooze: Option<i64>,
        /// Id of the alarm being edited
        #[arg(long)]
        replacing: Option<String>,
        /// Evaluate as if the current time were this instant
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the earliest start that counts as "in the future"
    Earliest {
        /// Light alarm lead-in in minutes
        #[arg(long, default_value_t = 0)]
        light: u32,
        /// Evaluate as if the current time were this instant
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => GuardConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => GuardConfig::default(),
    };
    let checker = InterferenceChecker::new(config);

    match cli.command {
        Commands::Check {
            alarms,
            start,
            light,
            replacing,
            explain,
        } => {
            let scheduled = read_alarms(&alarms)?;
            let start = parse_datetime(&start)?;
            let replacing = parse_id(replacing.as_deref())?;
            let light = minutes(light);

            if explain {
                let conflicts = checker.conflicts(start, light, &scheduled, replacing.as_ref());
                if conflicts.is_empty() {
                    println!("clear");
                } else {
                    println!("interferes");
                    for c in &conflicts {
                        println!(
                            "  blocked by {} at {} (protected {} .. {})",
                            c.alarm_id,
                            format_datetime(c.occurrence),
                            format_datetime(c.protected_zone.start),
                            format_datetime(c.protected_zone.end)
                        );
                    }
                }
            } else if checker.interferes(start, light, &scheduled, replacing.as_ref()) {
                println!("interferes");
            } else {
                println!("clear");
            }
        }
        Commands::State {
            alarms,
            date,
            time,
            light,
            snooze,
            replacing,
            now,
        } => {
            let scheduled = read_alarms(&alarms)?;
            // Negative or unrepresentable lengths reach the checker as invalid form fields.
            let light_duration = light
                .and_then(Duration::try_minutes)
                .filter(|d| *d >= Duration::zero());
            let proposal = Proposal {
                date: date.as_deref().map(parse_date).transpose()?,
                time: time.as_deref().map(parse_time).transpose()?,
                is_light_alarm: light.is_some(),
                light_alarm_duration: light_duration.unwrap_or_else(Duration::zero),
                light_duration_valid: light.is_none() || light_duration.is_some(),
                snooze_duration_valid: snooze.is_none_or(|m| m >= 0),
                replacing: parse_id(replacing.as_deref())?,
            };
            let clock = clock_for(now.as_deref())?;
            let state = checker.evaluate_state_with_clock(&proposal, &scheduled, &clock);
            println!("{}: {}", state.code(), state);
        }
        Commands::Earliest { light, now } => {
            let clock = clock_for(now.as_deref())?;
            let earliest = checker.earliest_possible_alarm_time(minutes(light), clock.now());
            println!("{}", format_datetime(earliest));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}

/// A fixed clock when `--now` is given, otherwise the host's local time.
fn clock_for(now: Option<&str>) -> Result<FixedClock> {
    let instant = match now {
        Some(raw) => parse_datetime(raw)?,
        None => SystemClock.now(),
    };
    Ok(FixedClock(instant))
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("Invalid date-time '{}', expected YYYY-MM-DDTHH:MM", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .with_context(|| format!("Invalid time '{}', expected HH:MM", raw))
}

fn parse_id(raw: Option<&str>) -> Result<Option<AlarmId>> {
    raw.map(|s| {
        s.parse::<AlarmId>()
            .with_context(|| format!("Invalid alarm id: {}", s))
    })
    .transpose()
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

fn read_alarms(path: &str) -> Result<Vec<Alarm>> {
    let raw = read_input(path)?;
    let alarms: Vec<Alarm> =
        serde_json::from_str(&raw).context("Failed to parse alarms JSON")?;
    tracing::debug!(count = alarms.len(), "loaded scheduled alarms");
    Ok(alarms)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}
