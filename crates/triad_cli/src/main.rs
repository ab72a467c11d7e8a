//! CLI smoke entry point for `triad_core`.
//!
//! # Responsibility
//! - Verify `triad_core` linkage with deterministic ping/version lines.
//! - Print a zone review of a JSON task export when given its path.
//! - Write core logs under `TRIAD_LOG_DIR` when that variable is set.

use std::error::Error;
use std::process::ExitCode;
use triad_core::{
    analyze, default_log_level, group_by_timeline, init_logging, Calendar, LoggingConfig,
    LoggingError, Task, ViewConfig,
};

const LOG_DIR_ENV: &str = "TRIAD_LOG_DIR";

fn main() -> ExitCode {
    println!("triad_core ping={}", triad_core::ping());
    println!("triad_core version={}", triad_core::core_version());

    let logging = logging_config(std::env::var(LOG_DIR_ENV).ok().as_deref())
        .and_then(|config| config.map_or(Ok(()), |config| init_logging(&config)));
    if let Err(err) = logging {
        eprintln!("logging disabled: {err}");
    }

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match review(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("review failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn review(path: &str) -> Result<(), Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&raw)?;
    let completed: Vec<&Task> = tasks.iter().filter(|task| task.is_completed()).collect();

    let analysis = analyze(completed.iter().copied());
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    let calendar = Calendar::now_local(&ViewConfig::default());
    for bucket in group_by_timeline(completed.iter().copied(), &calendar) {
        println!(
            "timeline period={} count={}",
            bucket.period.as_str(),
            bucket.tasks.len()
        );
    }
    Ok(())
}

/// Logging config for an optional log directory at the build's default level.
fn logging_config(log_dir: Option<&str>) -> Result<Option<LoggingConfig>, LoggingError> {
    match log_dir.map(str::trim) {
        None | Some("") => Ok(None),
        Some(dir) => LoggingConfig::new(default_log_level().as_str(), dir).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::logging_config;
    use std::path::PathBuf;
    use triad_core::{default_log_level, LoggingError};

    #[test]
    fn missing_or_blank_log_dir_skips_logging() {
        assert_eq!(logging_config(None), Ok(None));
        assert_eq!(logging_config(Some("  ")), Ok(None));
    }

    #[test]
    fn absolute_log_dir_uses_default_level() {
        let dir = std::env::temp_dir().join("triad-cli-logs");
        let config = logging_config(dir.to_str()).unwrap().unwrap();
        assert_eq!(config.level, default_log_level());
        assert_eq!(config.log_dir, PathBuf::from(&dir));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        assert!(matches!(
            logging_config(Some("logs")),
            Err(LoggingError::InvalidLogDir(_))
        ));
    }
}
