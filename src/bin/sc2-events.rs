//! StarCraft II game events decoder CLI
//!
//! A command-line interface for decoding, summarizing, and validating the raw
//! game events buffer extracted from an SC2 replay archive.
//!
//! ## Commands
//!
//! - `parse` - Decode events with output format options
//! - `stats` - Summarize event counts per category and player
//! - `validate` - Check that the whole buffer decodes (exit codes for scripting)

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sc2_events::events::{Event, EventStatistics, EventStream};
use sc2_events::{ObjectRef, ParserError, SelectionTracker};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// StarCraft II game events decoder
#[derive(Parser)]
#[command(name = "sc2-events")]
#[command(about = "StarCraft II replay game events decoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a game events file
    Parse {
        /// Path to the raw game events file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Stop after this many events
        #[arg(short, long)]
        limit: Option<usize>,
        /// Track selections and control groups
        #[arg(long)]
        track: bool,
    },
    /// Show event statistics
    Stats {
        /// Path to the raw game events file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Validate that a game events file decodes cleanly
    Validate {
        /// Path to the raw game events file
        file: PathBuf,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct ParseOutput {
    bytes: usize,
    events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selections: Option<BTreeMap<u8, PlayerBanks>>,
}

#[derive(Serialize)]
struct PlayerBanks {
    active: Vec<ObjectRef>,
    hotkeys: BTreeMap<u8, Vec<ObjectRef>>,
}

#[derive(Serialize)]
struct StatsOutput {
    bytes: usize,
    complete: bool,
    total_events: u32,
    last_frame: u32,
    events_by_type: BTreeMap<&'static str, u32>,
    events_by_player: BTreeMap<u8, u32>,
    unique_abilities: usize,
    move_commands: u32,
    unknown_rate: f64,
}

impl StatsOutput {
    fn new(stats: &EventStatistics, bytes: usize, complete: bool) -> Self {
        let events_by_type = [
            ("lifecycle", stats.lifecycle_events),
            ("ability", stats.ability_events),
            ("selection", stats.selection_events),
            ("hotkey", stats.hotkey_events),
            ("transfer", stats.transfer_events),
            ("camera", stats.camera_events),
            ("unknown", stats.unknown_events),
        ]
        .into_iter()
        .collect();

        Self {
            bytes,
            complete,
            total_events: stats.total_events,
            last_frame: stats.last_frame,
            events_by_type,
            events_by_player: stats
                .events_per_player
                .iter()
                .map(|(&player, &count)| (player, count))
                .collect(),
            unique_abilities: stats.unique_ability_count(),
            move_commands: stats.move_commands,
            unknown_rate: stats.unknown_rate(),
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            file,
            output,
            limit,
            track,
        } => cmd_parse(&file, output, limit, track),
        Commands::Stats { file, output } => cmd_stats(&file, output),
        Commands::Validate { file } => cmd_validate(&file, cli.verbose > 0),
    }
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn read_file(file: &Path) -> Result<Vec<u8>, ParserError> {
    let data = std::fs::read(file)?;
    log::info!("read {} bytes from {}", data.len(), file.display());
    Ok(data)
}

// ============================================================================
// Parse Command Implementation
// ============================================================================

fn cmd_parse(file: &Path, output: OutputFormat, limit: Option<usize>, track: bool) -> ExitCode {
    let data = match read_file(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut events = Vec::new();
    let mut error = None;
    let mut tracker = track.then(SelectionTracker::new);

    for result in EventStream::new(&data).take(limit.unwrap_or(usize::MAX)) {
        match result {
            Ok(event) => {
                if let Some(tracker) = tracker.as_mut() {
                    tracker.apply(&event);
                }
                events.push(event);
            }
            Err(e) => error = Some(e.to_string()),
        }
    }

    let selections = tracker.map(|tracker| collect_banks(&tracker, &events));
    let failed = error.is_some();
    let output_data = ParseOutput {
        bytes: data.len(),
        events,
        error,
        selections,
    };

    match output {
        OutputFormat::Json => print_json(&output_data),
        OutputFormat::Pretty => print_pretty(&output_data),
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn collect_banks(tracker: &SelectionTracker, events: &[Event]) -> BTreeMap<u8, PlayerBanks> {
    let mut players = BTreeMap::new();
    for player_id in events.iter().map(Event::player_id) {
        players.entry(player_id).or_insert_with(|| PlayerBanks {
            active: tracker.active(player_id).to_vec(),
            hotkeys: (0..10)
                .filter_map(|hotkey| {
                    let group = tracker.hotkey(player_id, hotkey);
                    (!group.is_empty()).then(|| (hotkey, group.to_vec()))
                })
                .collect(),
        });
    }
    players
}

fn print_json<T: Serialize>(output: &T) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing to JSON: {e}"),
    }
}

fn print_pretty(output: &ParseOutput) {
    println!("=== Events ({}) ===", output.events.len());
    for event in &output.events {
        println!("  {event}");
    }
    println!();

    if let Some(selections) = &output.selections {
        println!("=== Selections ===");
        for (player_id, banks) in selections {
            println!("  Player {player_id}: {} selected", banks.active.len());
            for (hotkey, group) in &banks.hotkeys {
                let objects: Vec<String> = group.iter().map(ToString::to_string).collect();
                println!("    Group {hotkey}: {}", objects.join(" "));
            }
        }
        println!();
    }

    if let Some(error) = &output.error {
        println!("=== Error ===");
        println!("  {error}");
    }
}

// ============================================================================
// Stats Command Implementation
// ============================================================================

fn cmd_stats(file: &Path, output: OutputFormat) -> ExitCode {
    let data = match read_file(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stats = EventStatistics::new();
    let mut complete = true;
    for result in EventStream::new(&data) {
        match result {
            Ok(event) => stats.record(&event),
            Err(e) => {
                eprintln!("Warning: {e}");
                complete = false;
            }
        }
    }

    let summary = StatsOutput::new(&stats, data.len(), complete);
    match output {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Pretty => print_stats(&summary),
    }

    ExitCode::SUCCESS
}

fn print_stats(summary: &StatsOutput) {
    println!("=== Statistics ===");
    println!("File Size: {} bytes", summary.bytes);
    println!("Complete: {}", if summary.complete { "yes" } else { "no" });
    println!("Total Events: {}", summary.total_events);
    println!("Last Frame: {}", summary.last_frame);
    println!();

    println!("By type:");
    for (name, count) in &summary.events_by_type {
        println!("  {name:<10} {count}");
    }
    println!();

    println!("By player:");
    for (player, count) in &summary.events_by_player {
        println!("  Player {player}: {count}");
    }
    println!();

    println!("Unique abilities: {}", summary.unique_abilities);
    println!("Move commands: {}", summary.move_commands);
    println!("Unknown rate: {:.1}%", summary.unknown_rate * 100.0);
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(file: &Path, verbose: bool) -> ExitCode {
    let data = match read_file(file) {
        Ok(d) => d,
        Err(e) => {
            println!("INVALID: {}", file.display());
            if verbose {
                println!("  Failed to read file: {e}");
            }
            return ExitCode::FAILURE;
        }
    };

    let mut decoded = 0usize;
    let mut failure = None;
    for result in EventStream::new(&data) {
        match result {
            Ok(_) => decoded += 1,
            Err(e) => failure = Some(e),
        }
    }

    match failure {
        None => {
            println!("VALID: {}", file.display());
            if verbose {
                println!("  Events: {decoded}");
                println!("  Bytes consumed: {}", data.len());
            }
            ExitCode::SUCCESS
        }
        Some(e) => {
            println!("INVALID: {}", file.display());
            if verbose {
                println!("  Events before failure: {decoded}");
                println!("  Error: {e}");
                if let ParserError::StreamAborted { offset, .. } = &e {
                    println!("  Bytes consumed: {offset} of {}", data.len());
                }
            }
            ExitCode::FAILURE
        }
    }
}
