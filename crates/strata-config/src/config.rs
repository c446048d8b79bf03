//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_blocks::collect::{DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_CAPACITY};
use strata_shapes::Filling;

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World collection settings.
    pub collect: CollectConfig,
    /// Record export settings.
    pub export: ExportConfig,
    /// Demo shape settings.
    pub shape: ShapeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Worker pool settings for world collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectConfig {
    /// Number of sampling threads (0 = one per logical CPU).
    pub worker_threads: usize,
    /// Positions handed to a worker at once.
    pub batch_size: usize,
    /// Capacity of the task and result channels.
    pub channel_capacity: usize,
}

/// Record export configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives the JSON record files.
    pub output_dir: PathBuf,
    /// Pretty-print the JSON output.
    pub pretty: bool,
    /// Chunk column the records are relative to.
    pub chunk_x: i32,
    pub chunk_z: i32,
    /// Extra offset subtracted from every position before packing.
    pub offset: [i32; 3],
}

/// Parameters of the generated demo sphere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeConfig {
    /// Sphere center in world coordinates.
    pub center: [i32; 3],
    /// Sphere radius in blocks.
    pub radius: u32,
    /// Interior filling.
    pub filling: Filling,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl CollectConfig {
    /// Worker thread count with `0` resolved to the number of logical CPUs.
    pub fn effective_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("records"),
            pretty: false,
            chunk_x: 0,
            chunk_z: 0,
            offset: [0, 0, 0],
        }
    }
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            center: [64, 64, 64],
            radius: 24,
            filling: Filling::Full,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Per-user config directory, e.g. `~/.config/strata` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("strata"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("batch_size: 256"));
        assert!(ron_str.contains("log_level: \"info\""));
        assert!(ron_str.contains("filling: Full"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.shape.filling = Filling::Custom(0.25);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(collect: (worker_threads: 3), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.collect.worker_threads, 3);
        assert_eq!(config.collect.batch_size, 256);
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_effective_threads() {
        let mut collect = CollectConfig::default();
        assert_eq!(collect.effective_threads(), num_cpus::get());
        collect.worker_threads = 5;
        assert_eq!(collect.effective_threads(), 5);
    }

    #[test]
    fn test_collect_defaults_match_collector() {
        let collect = CollectConfig::default();
        let collector = strata_blocks::Collector::default();
        assert_eq!(collect.batch_size, collector.batch_size());
        assert_eq!(collect.channel_capacity, collector.channel_capacity());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export.output_dir = PathBuf::from("/tmp/strata-out");
        config.export.chunk_x = -3;
        config.shape.radius = 8;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
