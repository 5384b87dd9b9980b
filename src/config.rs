//! Session configuration.
//!
//! Settings are read from TOML. Every field has a default, so an empty file
//! (or no file at all) yields the stock behaviour.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Display and input settings for a workflow session.
///
/// ```rust
/// use snapid::config::WorkflowConfig;
///
/// let config = WorkflowConfig::from_toml_str("probability_decimals = 1").unwrap();
/// assert_eq!(config.probability_decimals, 1);
/// assert_eq!(config.accept, "image/*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Decimal places used when rendering a probability as a percentage.
    pub probability_decimals: usize,
    /// Media type pattern the file input accepts, e.g. `image/*`.
    pub accept: String,
    /// Capture hint handed to the file input; `None` disables camera capture.
    pub capture: Option<String>,
    /// Number of transitions kept in the session history.
    pub history_limit: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            probability_decimals: 2,
            accept: "image/*".into(),
            capture: Some("camera".into()),
            history_limit: 64,
        }
    }
}

const MAX_DECIMALS: usize = 6;

impl WorkflowConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: WorkflowConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.probability_decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "probability_decimals must be at most {MAX_DECIMALS}, got {}",
                self.probability_decimals
            )));
        }
        if self.accept.trim().is_empty() {
            return Err(ConfigError::Invalid("accept must not be empty".into()));
        }
        Ok(())
    }

    /// Check a media type against the `accept` pattern.
    ///
    /// The pattern is a comma separated list of exact types (`image/png`) or
    /// wildcards (`image/*`, `*/*`). Matching is case-insensitive. An empty
    /// media type means the platform could not name the file's type (HEIC
    /// photos often arrive this way) and is always accepted.
    pub fn accepts_media_type(&self, media_type: &str) -> bool {
        let media_type = media_type.trim().to_ascii_lowercase();
        if media_type.is_empty() {
            return true;
        }
        self.accept
            .split(',')
            .map(|p| p.trim().to_ascii_lowercase())
            .any(|pattern| match pattern.strip_suffix("/*") {
                Some("*") => true,
                Some(prefix) => media_type
                    .split_once('/')
                    .is_some_and(|(top, _)| top == prefix),
                None => pattern == media_type,
            })
    }
}
