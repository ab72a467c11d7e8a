//! View configuration.
//!
//! # Responsibility
//! - Hold the tunables shared by view composition (page size, week start).
//! - Parse and validate JSON configuration supplied by the host app.
//!
//! # Invariants
//! - A `ViewConfig` returned by `from_json_str` has `page_size` within
//!   `1..=MAX_PAGE_SIZE`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidPageSize(usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid view config: {err}"),
            Self::InvalidPageSize(value) => write!(
                f,
                "page_size {value} out of range; expected 1..={MAX_PAGE_SIZE}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidPageSize(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables for task view composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: usize,
    /// First day of "this week" for period filters and timeline buckets.
    pub week_start: Weekday,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            week_start: Weekday::Mon,
        }
    }
}

impl ViewConfig {
    /// Parses JSON config; missing fields fall back to defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON or unknown weekday names.
    /// - `ConfigError::InvalidPageSize` when `page_size` is out of range.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewConfig, DEFAULT_PAGE_SIZE};
    use chrono::Weekday;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ViewConfig::from_json_str("{}").expect("defaults should parse");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.week_start, Weekday::Mon);
    }

    #[test]
    fn parses_week_start_names() {
        let config = ViewConfig::from_json_str(r#"{"page_size": 25, "week_start": "Sun"}"#)
            .expect("config should parse");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.week_start, Weekday::Sun);
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let err = ViewConfig::from_json_str(r#"{"page_size": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPageSize(0)));
        let err = ViewConfig::from_json_str(r#"{"page_size": 1000}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPageSize(1000)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ViewConfig::from_json_str("{page_size:").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
