//! `slotfind` CLI — list free slots or find the best meeting slot for a
//! scenario of attendees and their busy intervals.
//!
//! ## Usage
//!
//! ```sh
//! # List every free slot in the scenario window (stdin → stdout)
//! slotfind slots < scenario.json
//!
//! # Find the tightest slot holding 45 minutes
//! slotfind find --duration 45 -i scenario.json
//!
//! # Restrict the search to a range
//! slotfind find --duration 30 --from 2026-03-02T13:00:00Z --to 2026-03-02T17:00:00Z -i scenario.json
//!
//! # Pin "now" for reproducible output, emit JSON
//! slotfind --now 2026-03-02T08:00:00Z --json slots -i scenario.json
//! ```
//!
//! A scenario is a JSON object:
//!
//! ```json
//! {
//!   "window": { "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T17:00:00Z" },
//!   "attendees": [
//!     { "name": "Person1", "meetings": [ { "start": "...", "end": "..." } ] }
//!   ]
//! }
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use slot_engine::{Attendee, Calendar, FillThresholds, FixedClock, SearchRange, TimeSlot};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slotfind",
    version,
    about = "Find free meeting slots across attendees' busy intervals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scenario file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Treat this instant as "now" instead of the system clock (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all free slots in the scenario window
    Slots,
    /// Find the tightest free slot for a meeting
    Find {
        /// Meeting duration in minutes
        #[arg(short, long)]
        duration: i64,
        /// Lower bound of the search range (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Upper bound of the search range (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },
}

#[derive(Deserialize)]
struct Scenario {
    window: TimeSlot,
    #[serde(default)]
    attendees: Vec<Attendee>,
    #[serde(default)]
    fill_thresholds: FillThresholds,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let raw = read_input(cli.input.as_deref())?;
    let scenario: Scenario =
        serde_json::from_str(&raw).context("Failed to parse scenario JSON")?;

    let mut calendar =
        Calendar::with_attendees(scenario.window.start(), scenario.window.end(), scenario.attendees)
            .context("Invalid calendar window")?
            .with_fill_thresholds(scenario.fill_thresholds);
    if let Some(now) = cli.now {
        calendar = calendar.with_clock(FixedClock(now));
    }

    info!(
        attendees = calendar.attendee_count(),
        window_minutes = calendar.window_minutes(),
        strategy = ?calendar.fill_strategy(),
        "loaded scenario"
    );

    match cli.command {
        Commands::Slots => {
            let slots = calendar
                .available_slots()
                .context("Failed to compute free slots")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                println!("Free slots ({}):", slots.len());
                for slot in &slots {
                    println!("  {slot}");
                }
            }
        }
        Commands::Find { duration, from, to } => {
            let found = match (from, to) {
                (None, None) => calendar.find_first_available_slot(duration),
                (from, to) => calendar.find_first_available_slot_within(
                    duration,
                    SearchRange {
                        start: from.unwrap_or(calendar.start()),
                        end: to,
                    },
                ),
            }
            .context("Failed to search for a slot")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                match found {
                    Some(slot) => println!(
                        "A meeting slot for {} is available between {} and {}.",
                        hours_and_minutes(duration),
                        slot.start().format("%Y-%m-%d %H:%M"),
                        slot.end().format("%Y-%m-%d %H:%M"),
                    ),
                    None => println!(
                        "No meeting slot available for {}. The calendar window is {} to {} ({}).",
                        hours_and_minutes(duration),
                        calendar.start().format("%Y-%m-%d %H:%M"),
                        calendar.end().format("%Y-%m-%d %H:%M"),
                        hours_and_minutes(calendar.window_minutes()),
                    ),
                }
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("slot_engine=warn,{}=warn", env!("CARGO_CRATE_NAME")).into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn hours_and_minutes(total: i64) -> String {
    let hours = total / 60;
    let minutes = total % 60;
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("{n} {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    match (hours, minutes) {
        (0, m) => plural(m, "minute"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} and {}", plural(h, "hour"), plural(m, "minute")),
    }
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

#[cfg(test)]
mod tests {
    use super::hours_and_minutes;

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(hours_and_minutes(1), "1 minute");
        assert_eq!(hours_and_minutes(45), "45 minutes");
        assert_eq!(hours_and_minutes(60), "1 hour");
        assert_eq!(hours_and_minutes(150), "2 hours and 30 minutes");
    }
}
