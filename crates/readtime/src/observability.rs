//! Logging setup: human-readable stderr output plus optional JSONL file logs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const ENV_LOG_PATH: &str = "READTIME_LOG_PATH";
const ENV_LOG_DIR: &str = "READTIME_LOG_DIR";
const LOG_FILE_NAME: &str = "readtime.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file (`READTIME_LOG_PATH`). Wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory receiving `readtime.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured log directory.
    ///
    /// `READTIME_LOG_DIR` takes precedence over `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::from_values(env_path(ENV_LOG_PATH), env_path(ENV_LOG_DIR), config_log_dir)
    }

    fn from_values(
        log_path: Option<PathBuf>,
        env_log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            log_path,
            log_dir: env_log_dir.or(config_log_dir),
        }
    }

    /// Directory and file name for the JSONL log, if file logging is on.
    fn log_target(&self) -> Option<(PathBuf, String)> {
        if let Some(path) = &self.log_path {
            let file = path.file_name()?.to_string_lossy().into_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            return Some((dir, file));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), LOG_FILE_NAME.to_string()))
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` selects errors only and each
/// `-v` raises the level from the configured default.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_for(quiet, verbose, default_level))
}

fn level_for(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match config.log_target() {
        Some((dir, file)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, &file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_dir_beats_config_dir() {
        let config = ObservabilityConfig::from_values(
            None,
            Some(PathBuf::from("/env/logs")),
            Some(PathBuf::from("/config/logs")),
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/env/logs")));
    }

    #[test]
    fn no_target_without_paths() {
        assert!(ObservabilityConfig::default().log_target().is_none());
    }

    #[test]
    fn log_dir_uses_default_file_name() {
        let config = ObservabilityConfig::from_values(None, None, Some(PathBuf::from("/logs")));
        assert_eq!(
            config.log_target(),
            Some((PathBuf::from("/logs"), "readtime.jsonl".to_string()))
        );
    }

    #[test]
    fn log_path_wins_over_dir() {
        let config = ObservabilityConfig::from_values(
            Some(PathBuf::from("/var/log/rt.jsonl")),
            Some(PathBuf::from("/logs")),
            None,
        );
        assert_eq!(
            config.log_target(),
            Some((PathBuf::from("/var/log"), "rt.jsonl".to_string()))
        );
    }

    #[test]
    fn bare_log_file_lands_in_cwd() {
        let config = ObservabilityConfig::from_values(Some(PathBuf::from("rt.jsonl")), None, None);
        assert_eq!(
            config.log_target(),
            Some((PathBuf::from("."), "rt.jsonl".to_string()))
        );
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(true, 3, "info"), "error");
        assert_eq!(level_for(false, 0, "warn"), "warn");
        assert_eq!(level_for(false, 1, "info"), "debug");
        assert_eq!(level_for(false, 2, "info"), "trace");
    }
}
