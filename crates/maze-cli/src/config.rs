//! TOML config loading for the maze CLI.
//!
//! Deserializes a config file with a `[search]` section, then merges it with
//! CLI overrides.

use std::path::Path;

use astar::{load_toml, SearchConfig};
use serde::Deserialize;

/// Top-level structure of the CLI config file.
#[derive(Debug, Default, Deserialize)]
pub struct MazeToml {
    /// Search engine tunables. Missing section means all defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Load and deserialize a `MazeToml` from a TOML file.
pub fn load_maze_toml(path: &Path) -> anyhow::Result<MazeToml> {
    Ok(load_toml::<MazeToml>(path)?)
}

/// Flags that take priority over the config file.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchOverrides {
    pub timeout_ms: Option<u64>,
    pub reopen_closed: bool,
}

/// Merge CLI flags into a loaded config.
///
/// Priority chain: `SearchConfig::default()` < TOML values < CLI flags.
/// `--reopen-closed` can only switch reopening on.
pub fn apply_overrides(mut config: SearchConfig, overrides: SearchOverrides) -> SearchConfig {
    if let Some(ms) = overrides.timeout_ms {
        config.timeout_ms = ms;
    }
    if overrides.reopen_closed {
        config.reopen_closed = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_maze_toml() {
        let toml_str = r#"
[search]
timeout_ms = 500
reopen_closed = true
yield_every = 32
"#;
        let config: MazeToml = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.timeout_ms, 500);
        assert!(config.search.reopen_closed);
        assert_eq!(config.search.yield_every, 32);
    }

    #[test]
    fn test_deserialize_missing_search_section() {
        let config: MazeToml = toml::from_str("").unwrap();
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("maze.toml");
        std::fs::write(&path, "[search]\ntimeout_ms = 25\n").unwrap();
        let config = load_maze_toml(&path).unwrap();
        assert_eq!(config.search.timeout_ms, 25);
        assert!(!config.search.reopen_closed);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        let err = load_maze_toml(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("maze.toml");
        std::fs::write(&path, "[search]\ntimeout_ms = \"soon\"\n").unwrap();
        let err = load_maze_toml(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<astar::ConfigError>(),
            Some(astar::ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cli_override_priority() {
        let from_file = SearchConfig {
            timeout_ms: 500,
            reopen_closed: false,
            yield_every: 4,
        };

        let merged = apply_overrides(
            from_file.clone(),
            SearchOverrides {
                timeout_ms: Some(10),
                reopen_closed: true,
            },
        );
        assert_eq!(merged.timeout_ms, 10);
        assert!(merged.reopen_closed);
        assert_eq!(merged.yield_every, 4);

        // No flags: the file wins.
        let untouched = apply_overrides(from_file.clone(), SearchOverrides::default());
        assert_eq!(untouched, from_file);
    }
}
