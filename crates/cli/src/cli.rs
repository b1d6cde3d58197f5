//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::SyncMode;
use std::path::PathBuf;

/// Replay Engine - telemetry synchronization and frame synthesis for race replays
#[derive(Parser, Debug)]
#[command(
    name = "replay-engine",
    author,
    version,
    about = "Telemetry synchronization and frame synthesis for race replays",
    long_about = "Builds frame-by-frame race replays from archived per-driver telemetry.\n\n\
                  Resamples every driver onto one timeline, ranks the field by \n\
                  track-projected progress, and aligns two replays for comparison."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REPLAY_ENGINE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REPLAY_ENGINE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a replay from a session dump
    Build(BuildArgs),

    /// Align two built replays and show comparison metrics
    Compare(CompareArgs),

    /// Validate configuration file without building
    Validate(ValidateArgs),

    /// Summarize a built replay
    Info(InfoArgs),
}

/// Arguments for the `build` command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Session dump (JSON)
    #[arg(short, long, env = "REPLAY_ENGINE_SESSION")]
    pub session: PathBuf,

    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "REPLAY_ENGINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output replay file (JSON)
    #[arg(short, long, default_value = "replay.json")]
    pub output: PathBuf,

    /// Override frames per second from configuration
    #[arg(long, env = "REPLAY_ENGINE_FPS")]
    pub fps: Option<u32>,

    /// Override the resampler worker cap from configuration
    #[arg(long, env = "REPLAY_ENGINE_WORKERS")]
    pub workers: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "REPLAY_ENGINE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `compare` command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// First replay (session A)
    #[arg(long)]
    pub a: PathBuf,

    /// Second replay (session B)
    #[arg(long)]
    pub b: PathBuf,

    /// Sync mode: lap, time or distance (defaults to the configured mode)
    #[arg(long)]
    pub mode: Option<SyncMode>,

    /// Configuration file providing the default sync mode
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Playback tick to report metrics for
    #[arg(long, default_value = "0")]
    pub tick: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "replay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Built replay file
    #[arg(short, long, default_value = "replay.json")]
    pub replay: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List race events (retirements, caution periods, overtakes, pit stops)
    #[arg(long)]
    pub events: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
