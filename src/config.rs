//! Harness Configuration
//!
//! Settings come from an optional TOML file; the CLI layers flags and
//! environment variables on top before calling [`PullConfig::validate`].
//!
//! ```toml
//! [pull]
//! image_list = "images.txt"
//! max_concurrent = 8
//! fetch_timeout_secs = 0
//! fail_on_error = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::puller::{PullOptions, DEFAULT_MAX_CONCURRENT};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "compass.toml";

/// Complete harness configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub pull: PullConfig,
}

/// Image pull configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullConfig {
    /// Line-delimited image list
    pub image_list: PathBuf,
    /// Maximum concurrent fetches
    pub max_concurrent: usize,
    /// Per-fetch timeout in seconds (0 = none)
    pub fetch_timeout_secs: u64,
    /// Exit non-zero when any fetch failed
    pub fail_on_error: bool,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            image_list: PathBuf::from("images.txt"),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            fetch_timeout_secs: 0,
            fail_on_error: false,
        }
    }
}

/// Values layered over the file settings (CLI flags and their env vars).
///
/// `None` leaves the file value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullOverrides {
    pub image_list: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
    pub fetch_timeout_secs: Option<u64>,
    pub fail_on_error: Option<bool>,
}

impl HarnessConfig {
    /// Load from an explicit path (must exist), or from `compass.toml` in the
    /// working directory if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl PullConfig {
    /// Replace every field the overrides set, in either direction
    pub fn apply(&mut self, overrides: PullOverrides) {
        if let Some(list) = overrides.image_list {
            self.image_list = list;
        }
        if let Some(n) = overrides.max_concurrent {
            self.max_concurrent = n;
        }
        if let Some(secs) = overrides.fetch_timeout_secs {
            self.fetch_timeout_secs = secs;
        }
        if let Some(fail) = overrides.fail_on_error {
            self.fail_on_error = fail;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.image_list.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("image_list must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }

    pub fn pull_options(&self) -> PullOptions {
        PullOptions {
            max_concurrent: self.max_concurrent,
            fetch_timeout: self.fetch_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.pull.image_list, PathBuf::from("images.txt"));
        assert_eq!(config.pull.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.pull.fetch_timeout(), None);
        assert!(!config.pull.fail_on_error);
        assert!(config.pull.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HarnessConfig::from_toml("[pull]\nmax_concurrent = 3\n").unwrap();
        assert_eq!(config.pull.max_concurrent, 3);
        assert_eq!(config.pull.image_list, PathBuf::from("images.txt"));

        let empty = HarnessConfig::from_toml("").unwrap();
        assert_eq!(empty, HarnessConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = HarnessConfig::from_toml(
            r#"
            [pull]
            image_list = "lists/verified.txt"
            max_concurrent = 16
            fetch_timeout_secs = 900
            fail_on_error = true
            "#,
        )
        .unwrap();

        let options = config.pull.pull_options();
        assert_eq!(options.max_concurrent, 16);
        assert_eq!(options.fetch_timeout, Some(Duration::from_secs(900)));
        assert!(config.pull.fail_on_error);
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = PullConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            HarnessConfig::from_toml("[pull]\nmax_concurrent = \"many\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let err = HarnessConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compass.toml");
        std::fs::write(&path, "[pull]\nfail_on_error = true\n").unwrap();

        let config = HarnessConfig::load(Some(&path)).unwrap();
        assert!(config.pull.fail_on_error);
    }

    #[test]
    fn test_override_can_disable_fail_on_error() {
        let mut config = HarnessConfig::from_toml("[pull]\nfail_on_error = true\n")
            .unwrap()
            .pull;

        config.apply(PullOverrides::default());
        assert!(config.fail_on_error);

        config.apply(PullOverrides {
            fail_on_error: Some(false),
            ..Default::default()
        });
        assert!(!config.fail_on_error);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = HarnessConfig::from_toml(
            "[pull]\nimage_list = \"a.txt\"\nmax_concurrent = 2\nfetch_timeout_secs = 60\n",
        )
        .unwrap()
        .pull;

        config.apply(PullOverrides {
            image_list: Some(PathBuf::from("b.txt")),
            max_concurrent: Some(5),
            fetch_timeout_secs: Some(0),
            fail_on_error: Some(true),
        });

        assert_eq!(config.image_list, PathBuf::from("b.txt"));
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.fetch_timeout(), None);
        assert!(config.fail_on_error);
    }
}
