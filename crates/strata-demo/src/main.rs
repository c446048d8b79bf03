//! Builds a layered sphere in memory, collects it through the sampling pool,
//! and exports the grouped block lists as chunk-relative JSON records.
//!
//! Run with: `cargo run -p strata-demo -- --radius 16 --output records`

mod export;
mod world;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strata_blocks::{BlockListError, Collector};
use strata_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        default_config_dir().unwrap_or_else(|e| {
            eprintln!("{e}, using ./.strata");
            PathBuf::from(".strata")
        })
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), BlockListError> {
    info!(
        radius = config.shape.radius,
        filling = ?config.shape.filling,
        threads = config.collect.effective_threads(),
        "building world"
    );
    let (world, positions) = world::build_world(&config.shape);
    info!(blocks = world.len(), queried = positions.len(), "world ready");

    let collector = Collector::new(
        config.collect.worker_threads,
        config.collect.batch_size,
        config.collect.channel_capacity,
    );
    let index = collector.collect_index(&world, &positions)?;
    for list in &index {
        info!(state = %list.state(), positions = list.len(), tagged = list.tag().is_some(), "group");
    }

    let ordered = collector.collect_ordered(&world, &positions)?;
    if let Ok((state, pos)) = ordered.get(0) {
        info!(%state, %pos, "first placement");
    }

    let path = export::export_index(&index, &config.export)?;
    info!(path = %path.display(), "done");
    Ok(())
}
