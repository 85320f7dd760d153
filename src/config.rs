//! Content script configuration.
//!
//! Every field has a default, so an empty object (or no config at all) is a
//! valid configuration. The browser entry reads the JSON from extension
//! storage; anything invalid falls back to defaults with a warning.

use log::LevelFilter;
use serde::Deserialize;
use umbra_detect::Detector;
use umbra_detect::aggregate::DEFAULT_EXCLUDE_THRESHOLD;

use crate::error::ConfigError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_BODY_RETRY_MS: u32 = 100;
pub const MAX_BODY_RETRY_MS: u32 = 100;
pub const DEFAULT_BODY_RETRY_LIMIT: u32 = 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Mean positive confidence at which a page is left alone.
    pub exclude_threshold: f64,
    /// Run native dark theme detection at all.
    pub detection: bool,
    /// Delay between checks for `<body>`.
    pub body_retry_ms: u32,
    /// Checks for `<body>` before giving up.
    pub body_retry_limit: u32,
    /// Hostnames added to the known dark theme list.
    pub extra_known_sites: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_threshold: DEFAULT_EXCLUDE_THRESHOLD,
            detection: true,
            body_retry_ms: DEFAULT_BODY_RETRY_MS,
            body_retry_limit: DEFAULT_BODY_RETRY_LIMIT,
            extra_known_sites: Vec::new(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl Config {
    /// Parse and validate JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON, falling back to defaults on any error.
    #[must_use]
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring configuration: {e}");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.exclude_threshold) {
            return Err(ConfigError::Invalid {
                field: "excludeThreshold",
                reason: format!("{} is outside [0, 1]", self.exclude_threshold),
            });
        }
        if !(1..=MAX_BODY_RETRY_MS).contains(&self.body_retry_ms) {
            return Err(ConfigError::Invalid {
                field: "bodyRetryMs",
                reason: format!("{} is outside 1..={MAX_BODY_RETRY_MS}", self.body_retry_ms),
            });
        }
        if self.body_retry_limit == 0 {
            return Err(ConfigError::Invalid { field: "bodyRetryLimit", reason: "must be at least 1".to_owned() });
        }
        parse_log_level(&self.log_level)?;
        Ok(())
    }

    /// Detector configured from this config.
    #[must_use]
    pub fn detector(&self) -> Detector {
        Detector { exclude_threshold: self.exclude_threshold, extra_known_sites: self.extra_known_sites.clone() }
    }

    /// Log filter; invalid levels were rejected by [`Config::validate`].
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    raw.parse::<LevelFilter>().map_err(|_| ConfigError::Invalid {
        field: "logLevel",
        reason: format!("unknown level `{raw}` (expected off, error, warn, info, debug, or trace)"),
    })
}
