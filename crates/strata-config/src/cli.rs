//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Collect block states into chunk records")]
pub struct CliArgs {
    /// Sampling worker threads (0 = one per CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Positions per worker batch.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Directory for the exported records.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pretty-print exported JSON.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Sphere radius in blocks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(threads) = args.threads {
            self.collect.worker_threads = threads;
        }
        if let Some(batch) = args.batch_size {
            self.collect.batch_size = batch;
        }
        if let Some(ref dir) = args.output {
            self.export.output_dir = dir.clone();
        }
        if let Some(pretty) = args.pretty {
            self.export.pretty = pretty;
        }
        if let Some(radius) = args.radius {
            self.shape.radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
