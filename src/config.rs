//! Report configuration
//!
//! Optional TOML file controlling how much detail the report prints. Located
//! by, in priority order: the `--config` flag, the `TRACEDOCTOR_CONFIG_PATH`
//! environment variable, then `tracedoctor/config.toml` in the platform config
//! directory.
//!
//! ```toml
//! max-profile-rows = 20
//! profile-depth = 3
//! show-timelines = false
//! ```

use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReportConfig {
    /// Truncate profile tables after this many rows
    pub max_profile_rows: Option<usize>,
    /// Hide profile rows nested deeper than this (1 shows only roots)
    pub profile_depth: Option<usize>,
    /// Print node and thread timelines
    pub show_timelines: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_profile_rows: None,
            profile_depth: None,
            show_timelines: true,
        }
    }
}

impl ReportConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Split `rows` into (shown, hidden) under `max_profile_rows`.
    pub fn limit_rows(&self, rows: usize) -> (usize, usize) {
        let shown = self.max_profile_rows.map_or(rows, |max| rows.min(max));
        (shown, rows - shown)
    }
}

/// Where to look for the config file.
///
/// Priority:
/// 1. Explicit path (the `--config` flag)
/// 2. `TRACEDOCTOR_CONFIG_PATH` environment variable
/// 3. Platform config directory (XDG on Linux and macOS, `%APPDATA%` on Windows)
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("TRACEDOCTOR_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("tracedoctor").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::parse("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert!(config.show_timelines);
    }

    #[test]
    fn test_parse_all_fields() {
        let config = ReportConfig::parse(
            "max-profile-rows = 20\nprofile-depth = 3\nshow-timelines = false\n",
        )
        .unwrap();
        assert_eq!(config.max_profile_rows, Some(20));
        assert_eq!(config.profile_depth, Some(3));
        assert!(!config.show_timelines);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ReportConfig::parse("max-rows = 3\n").is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max-profile-rows = \"many\"\n").unwrap();
        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse config file"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/explicit.toml");
        assert_eq!(config_path(Some(path)), Some(path.to_path_buf()));
    }

    #[rstest]
    #[case::unlimited(None, 5, (5, 0))]
    #[case::under_limit(Some(10), 5, (5, 0))]
    #[case::over_limit(Some(2), 5, (2, 3))]
    #[case::zero(Some(0), 5, (0, 5))]
    fn test_limit_rows(
        #[case] max: Option<usize>,
        #[case] rows: usize,
        #[case] expected: (usize, usize),
    ) {
        let config = ReportConfig {
            max_profile_rows: max,
            ..ReportConfig::default()
        };
        assert_eq!(config.limit_rows(rows), expected);
    }
}
