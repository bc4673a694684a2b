//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Weighted quorum consensus over a swarm of field validation agents
#[derive(Parser, Debug)]
#[command(name = "swarm-quorum", version, about)]
pub struct Cli {
    /// Explicit config file (overrides discovered configs)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Roster file seeding the registry (overrides the config file)
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Full)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one validation round for a parcel
    Validate {
        /// Parcel identifier
        #[arg(long)]
        parcel: String,

        /// Parcel centroid latitude
        #[arg(long)]
        lat: f64,

        /// Parcel centroid longitude
        #[arg(long)]
        lon: f64,

        /// Imagery tile reference
        #[arg(long, default_value = "sim://tile")]
        tile: String,

        /// Expected land class, favors specialists during selection
        #[arg(long)]
        hint: Option<String>,

        /// Verified land class; applies reputation feedback after the round
        #[arg(long)]
        truth: Option<String>,
    },

    /// Run a batch of simulated rounds and print a session report
    Simulate {
        /// Number of parcels to validate
        #[arg(long, default_value_t = 10)]
        parcels: usize,

        /// Swarm center latitude
        #[arg(long, default_value_t = 45.0)]
        lat: f64,

        /// Swarm center longitude
        #[arg(long, default_value_t = 10.0)]
        lon: f64,

        /// Number of synthetic agents when no roster is configured
        #[arg(long, default_value_t = 8)]
        agents: usize,
    },

    /// Summarize a recorded session from the JSONL audit log
    Report {
        /// Audit log to read (defaults to the configured history file)
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    Full,
    /// Machine-readable JSON
    Json,
}
