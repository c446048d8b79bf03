//! Structured logging for the strata tools.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG` when set, otherwise
//! from the config's `debug.log_level`.

use std::fs::File;
use std::path::Path;

use strata_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the JSON log inside the log directory.
pub const LOG_FILE: &str = "strata.log";

const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether to write the JSON log file at all
/// * `config` - optional configuration supplying the log level
///
/// ```no_run
/// use strata_config::Config;
/// use strata_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // sampler threads are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = File::create(log_dir.join(LOG_FILE))
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// The filter directives used when `RUST_LOG` is unset.
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Machine-readable JSON lines written to `file`.
fn json_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(filter_directives(None), "info");
    }

    #[test]
    fn test_config_level_wins() {
        let mut config = Config::default();
        config.debug.log_level = "debug,strata_blocks=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "debug,strata_blocks=trace");

        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directives(Some(&config)), "info");
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in ["info", "debug,strata_blocks=trace", "warn,strata_config=debug", "error"] {
            assert!(EnvFilter::try_new(filter_str).is_ok(), "failed to parse {filter_str}");
        }
    }

    #[test]
    fn test_json_file_layer_writes_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = File::create(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(json_file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(groups = 3, "collected block index");
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let line = text.lines().next().expect("one log line");
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "collected block index");
        assert_eq!(event["fields"]["groups"], 3);
    }
}
