//! Command-line argument definitions for the Flowlayout CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input graph and output path, the
//! configuration file, simulation overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Flowlayout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph (JSON)
    #[arg(help = "Path to the input graph file")]
    pub input: String,

    /// Path to the laid-out graph (JSON)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Iteration budget, overrides `simulation.max_iterations`
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Seed for the tie-break random source, overrides `simulation.seed`
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write one JSON snapshot per iteration to this file
    #[arg(long)]
    pub frames: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
