//! `slotfinder` CLI — find open replacement-session windows in a site snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Open 30-minute windows on a Monday (snapshot on stdin)
//! cat sites.json | slotfinder find --site "Lincoln Elementary" --date 2026-03-16 --duration 30
//!
//! # Exclude the session being rescheduled, treating "now" as 9:15 that morning
//! slotfinder find -i sites.json --site "Lincoln Elementary" --date 2026-03-16 --duration 30 \
//!     --exclude-students s1,s2 --exclude-start 09:00 --now 2026-03-16T09:15:00
//!
//! # JSON output with raw minutes alongside the labels
//! slotfinder find -i sites.json --site "Lincoln Elementary" --date 2026-03-16 --duration 45 --json
//!
//! # What is already booked that day
//! slotfinder occupied -i sites.json --site "Lincoln Elementary" --date 2026-03-16
//! ```
//!
//! Set `RUST_LOG=slot_engine=debug` to trace how each slot was derived.

use std::io::{self, Read};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use slot_engine::{
    EngineConfig, ExclusionDescriptor, SiteSnapshot, SlotEngine, SlotRequest, Timestamp,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotfinder",
    version,
    about = "Find open replacement-session windows in a site schedule"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration JSON (tolerance, defaults, timezone)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List open windows long enough for a session
    Find {
        #[command(flatten)]
        query: Query,
        /// Required session length in minutes
        #[arg(short, long)]
        duration: u32,
        /// Current time (ISO 8601); defaults to the system clock
        #[arg(long)]
        now: Option<String>,
        /// Emit a JSON array of {start, end, label} instead of one label per line
        #[arg(long)]
        json: bool,
    },
    /// List merged occupied intervals for the day
    Occupied {
        #[command(flatten)]
        query: Query,
    },
}

#[derive(Args)]
struct Query {
    /// Site snapshot JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Site name as it appears in the snapshot
    #[arg(long)]
    site: String,
    /// Target date (yyyy-MM-dd or ISO 8601)
    #[arg(long)]
    date: String,
    /// Comma-separated student IDs of the session being vacated
    #[arg(long, requires = "exclude_start")]
    exclude_students: Option<String>,
    /// Start time (HH:mm) of the session being vacated
    #[arg(long, requires = "exclude_students")]
    exclude_start: Option<String>,
    /// End time (HH:mm) of the session being vacated
    #[arg(long, requires = "exclude_start")]
    exclude_end: Option<String>,
    /// Date of the session being vacated
    #[arg(long, requires = "exclude_start")]
    exclude_date: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let engine = SlotEngine::new(config).context("Invalid engine configuration")?;

    match cli.command {
        Commands::Find {
            query,
            duration,
            now,
            json,
        } => {
            let snapshot = load_snapshot(query.input.as_deref())?;
            let now = match now.as_deref() {
                Some(raw) => Timestamp::from_str(raw)
                    .with_context(|| format!("Invalid --now value: {}", raw))?,
                None => Timestamp::from(chrono::Utc::now()),
            };
            let request = SlotRequest {
                target_date: query.date.clone(),
                duration_minutes: duration,
                exclusion: build_exclusion(&query)?,
            };

            let slots = engine
                .find_open_slots(&snapshot, &query.site, &request, &now)
                .context("Failed to compute open slots")?;
            debug!(site = %query.site, slots = slots.len(), "find complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}", slot.label);
                }
            }
        }
        Commands::Occupied { query } => {
            let snapshot = load_snapshot(query.input.as_deref())?;
            let schedule = snapshot.site(&query.site)?;
            let occupied = engine
                .occupied(schedule, &query.date, &build_exclusion(&query)?)
                .context("Failed to resolve occupancy")?;
            for interval in &occupied {
                println!("{}", interval.label());
            }
        }
    }

    Ok(())
}

/// Build the exclusion descriptor from the `--exclude-*` flags.
///
/// No flags means nothing is excluded.
fn build_exclusion(query: &Query) -> Result<ExclusionDescriptor> {
    let (Some(students), Some(start)) = (&query.exclude_students, &query.exclude_start) else {
        return Ok(ExclusionDescriptor::none());
    };
    let student_ids = students
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    ExclusionDescriptor::parse(
        student_ids,
        start,
        query.exclude_end.as_deref(),
        query.exclude_date.as_deref(),
    )
    .context("Invalid exclusion")
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config file: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_snapshot(path: Option<&str>) -> Result<SiteSnapshot> {
    let json = read_input(path)?;
    Ok(SiteSnapshot::from_json(&json)?)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
