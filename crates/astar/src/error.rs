//! Error types for configuration, oracle contract violations, and task failures.
//!
//! Timeout and frontier exhaustion are not errors: they are reported through
//! the `on_timeout` / `on_complete` callbacks and [`crate::SearchStatus`].

use std::path::PathBuf;

/// Invalid or incomplete engine configuration.
///
/// Raised synchronously by [`crate::SearchOptions::build`] before any
/// expansion is scheduled.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No initial state was supplied.
    #[error("missing required option `initial`")]
    MissingInitial,
    /// No neighbor function was supplied.
    #[error("missing required option `neighbors`")]
    MissingNeighbors,
    /// No completion consumer was supplied.
    #[error("missing required option `on_complete`")]
    MissingOnComplete,
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`crate::SearchConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The state-space oracle returned something the engine cannot use.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    /// A neighbor state did not carry the action that produced it.
    #[error("neighbor at depth {depth} has no action")]
    MissingAction { depth: u32 },
    /// The heuristic returned NaN, an infinity, or a negative estimate.
    #[error("heuristic returned {value} at depth {depth}; expected a finite, non-negative value")]
    InvalidHeuristic { value: f64, depth: u32 },
}

/// Errors that can occur while configuring or running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Construction-time configuration error.
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),
    /// Oracle contract violation; the search is aborted.
    #[error("Oracle contract violation: {0}")]
    Contract(#[from] ContractViolation),
    /// The spawned search task panicked or was cancelled by the runtime.
    #[error("Search task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
