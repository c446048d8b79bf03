//! Configuration for block collection and export.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line via clap. Unknown fields are ignored and missing ones take
//! their defaults, so older and newer config files both load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CollectConfig, Config, DebugConfig, ExportConfig, ShapeConfig, default_config_dir};
pub use error::ConfigError;
