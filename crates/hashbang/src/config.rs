use std::time::Duration;

use hashbang_codec::Separator;
use serde::{Deserialize, Serialize};

use crate::{CommitMode, HashbangError};

/// Store configuration. Every field has a default, so a partial JSON object
/// is a valid configuration. An empty separator fails to load.
///
/// # Example
///
/// ```
/// use hashbang::Config;
///
/// let config = Config::from_json(r##"{"separator": "#"}"##).unwrap();
/// assert_eq!(config.separator.as_str(), "#");
/// assert_eq!(config.coalesce_ms, 50);
/// assert!(Config::from_json(r#"{"separator": ""}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix both parsing and serializing use.
    pub separator: Separator,
    /// Delay before a burst of mutations is reported as one
    /// `updated-internally` event.
    pub coalesce_ms: u64,
    /// History policy for commits caused by mutations.
    pub commit_mode: CommitMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            coalesce_ms: 50,
            commit_mode: CommitMode::Replace,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, HashbangError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_coalesce_delay(mut self, delay: Duration) -> Self {
        self.coalesce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.commit_mode = mode;
        self
    }

    pub fn coalesce_delay(&self) -> Duration {
        Duration::from_millis(self.coalesce_ms)
    }
}
