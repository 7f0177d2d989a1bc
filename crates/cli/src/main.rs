//! Fault-tolerant cache simulator CLI.
//!
//! This binary drives the `ftcache-core` library. It performs:
//! 1. **Trace run:** Parse a trace file, execute it against the configured
//!    hierarchy and print the statistics (text sections or JSON).
//! 2. **Config check:** Parse and validate a JSON configuration without running.
//!
//! Logging goes through `tracing`; set `RUST_LOG` (default `info`) to change
//! the level, e.g. `RUST_LOG=ftcache_core=debug` for per-event detail.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ftcache_core::common::{SimError, SimResult};
use ftcache_core::config::Config;
use ftcache_core::sim::{AccessRecord, SimEvent, SimObserver, Simulator};
use ftcache_core::stats::SimStats;

#[derive(Parser, Debug)]
#[command(
    name = "ftcache",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator with fault injection and ECC",
    long_about = "Run a memory-access trace through a multi-level cache hierarchy whose last level is protected by parity, Hamming, SEC-DED or MLREPS, with optional fault injection and early/emergency write-back.\n\nExamples:\n  ftcache run --trace traces/gcc.trace\n  ftcache run --trace traces/gcc.trace --config secded.json --seed 7 --json\n  ftcache check-config --config secded.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace file.
    Run {
        /// Trace file: one `<address> <op>` record per line.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the RNG seed from the configuration.
        #[arg(long)]
        seed: Option<u64>,

        /// Statistics sections to print (summary, levels, faults, writeback).
        #[arg(long, num_args = 1..)]
        stats: Vec<String>,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Log every hierarchy event at info level.
        #[arg(long)]
        events: bool,
    },

    /// Validate a configuration file and print the resulting hierarchy.
    CheckConfig {
        /// JSON configuration.
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Observer that logs hierarchy events.
#[derive(Debug, Default)]
struct LoggingObserver {
    accesses: u64,
}

impl SimObserver for LoggingObserver {
    fn on_access(&mut self, _record: &AccessRecord, _stats: &SimStats) {
        self.accesses += 1;
    }

    fn on_event(&mut self, event: &SimEvent) {
        info!(after = self.accesses, ?event, "event");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { trace, config, seed, stats, json, events } => {
            cmd_run(&trace, config.as_deref(), seed, &stats, json, events)
        }
        Commands::CheckConfig { config } => cmd_check_config(&config),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Reads a configuration file, or returns the defaults when `path` is `None`.
fn load_config(path: Option<&Path>) -> SimResult<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|e| SimError::FileRead(path.to_path_buf(), e))?;
    Ok(Config::from_json(&text)?)
}

/// Runs a trace and prints the statistics.
fn cmd_run(
    trace: &Path,
    config: Option<&Path>,
    seed: Option<u64>,
    sections: &[String],
    json: bool,
    events: bool,
) -> SimResult<()> {
    let mut config = load_config(config)?;
    if let Some(seed) = seed {
        config.general.seed = seed;
    }

    let mut sim = Simulator::new(&config)?;
    if events {
        sim = sim.with_observer(Box::new(LoggingObserver::default()));
    }

    info!(trace = %trace.display(), scheme = ?config.ecc.scheme, levels = config.levels.len(), "running trace");
    let summary = sim.run_trace_file(trace)?;
    info!(
        executed = summary.executed,
        skipped = summary.skipped,
        injection_rounds = summary.injection_rounds,
        "trace finished"
    );
    if summary.skipped > 0 {
        eprintln!("[!] skipped {} malformed trace record(s)", summary.skipped);
    }

    if json {
        let text = serde_json::to_string_pretty(sim.stats())
            .map_err(|e| SimError::Io(std::io::Error::other(e)))?;
        println!("{text}");
    } else {
        sim.stats().print_sections(sections);
    }
    Ok(())
}

/// Validates a configuration and prints a one-line summary per level.
fn cmd_check_config(path: &Path) -> SimResult<()> {
    let config = load_config(Some(path))?;
    println!("configuration OK: {}", path.display());
    for (i, level) in config.levels.iter().enumerate() {
        println!(
            "  L{}: {} B, {} B lines, {}-way, {:?}, {:?}, latency {}",
            i + 1,
            level.size_bytes,
            level.line_bytes,
            level.ways,
            level.policy,
            level.write_policy,
            level.latency
        );
    }
    println!("  memory latency {}", config.memory.latency);
    println!("  ecc {:?} over {}-bit words", config.ecc.scheme, config.ecc.word_bits);
    println!(
        "  write-back: early={} (period {}), emergency={} (cooldown {})",
        config.write_back.early,
        config.write_back.early_period,
        config.write_back.emergency,
        config.write_back.dirty_interval_time
    );
    println!(
        "  faults: {:?}/{:?} x{} every {} ops",
        config.fault.target, config.fault.pattern, config.fault.count, config.fault.interval
    );
    Ok(())
}
