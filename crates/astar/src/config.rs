use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Search tunables loaded from TOML.
///
/// These complement the programmatic [`crate::SearchOptions`]: callbacks and
/// oracle functions can only be supplied in code, while budgets and policy
/// switches can live in a config file.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SearchConfig {
    /// Wall-clock budget in milliseconds. `0` means unbounded.
    #[serde(default)]
    pub timeout_ms: u64,

    /// Put a closed state back on the frontier when a cheaper path to it is
    /// found. Off by default: the closed entry's bookkeeping is updated in
    /// place but it is not expanded again, which is only optimal for
    /// consistent heuristics.
    #[serde(default)]
    pub reopen_closed: bool,

    /// Number of expansion steps between cooperative yields to the scheduler.
    #[serde(default = "default_yield_every")]
    pub yield_every: u32,
}

fn default_yield_every() -> u32 {
    1
}

impl SearchConfig {
    /// Log a warning for values that are accepted but adjusted at run time.
    pub fn validate(&self) {
        if self.yield_every == 0 {
            tracing::warn!(
                yield_every = self.yield_every,
                "yield_every = 0 would never yield; treating it as 1"
            );
        }
    }

    /// The configured deadline as a duration, `None` when unbounded.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Steps between yields, never zero.
    pub fn yield_interval(&self) -> u32 {
        self.yield_every.max(1)
    }

    /// Parse a config from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 0,
            reopen_closed: false,
            yield_every: default_yield_every(),
        }
    }
}

/// Read and deserialize a TOML file.
///
/// Generic over the document type so a caller can embed [`SearchConfig`] as
/// a section of a larger file and still get [`ConfigError`] back.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let value = toml::from_str(&contents)?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(value)
}
