use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub trash: TrashConfig,
    pub leftovers: LeftoversConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Default size threshold for find-large, in megabytes
    pub min_size_mb: u64,
    /// Default age threshold for find-old, in days
    pub old_days: u64,
    /// Maximum number of find results (0 = unlimited)
    pub limit: usize,
    /// File suffixes removed by the log cleaner
    pub log_suffixes: Vec<String>,
    /// Additional absolute path prefixes that must never be deleted
    pub extra_exclusions: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashConfig {
    /// Ask Finder to empty the trash when ~/.Trash cannot be listed
    pub finder_fallback: bool,
    /// Also empty the per-volume trashes under /Volumes
    pub volume_trashes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeftoversConfig {
    /// Directories searched for application leftovers (`~` expands to home)
    pub search_paths: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size_mb: 100,
            old_days: 180,
            limit: 20,
            log_suffixes: vec![".log".to_string(), ".txt".to_string()],
            extra_exclusions: vec![],
        }
    }
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            finder_fallback: true,
            volume_trashes: true,
        }
    }
}

impl Default for LeftoversConfig {
    fn default() -> Self {
        Self {
            search_paths: [
                "~/Library/Application Support",
                "~/Library/Caches",
                "~/Library/Preferences",
                "~/Library/LaunchAgents",
                "~/Library/Containers",
                "~/Library/Saved Application State",
                "/Library/Application Support",
                "/Library/LaunchDaemons",
                "/Library/Preferences",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");

        Ok(config)
    }

    /// `<config dir>/mac-sweeper/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mac-sweeper").join("config.toml"))
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sweep.log_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "sweep.log_suffixes must not contain empty entries".to_string(),
            ));
        }

        if let Some(p) = self.sweep.extra_exclusions.iter().find(|p| !p.is_absolute()) {
            return Err(ConfigError::Invalid(format!(
                "sweep.extra_exclusions must be absolute paths, got '{}'",
                p.display()
            )));
        }

        if self.leftovers.search_paths.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "leftovers.search_paths must not contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Leftover search paths with a leading `~` replaced by `home`.
    pub fn leftover_paths(&self, home: &Path) -> Vec<PathBuf> {
        self.leftovers
            .search_paths
            .iter()
            .map(|p| expand_home(p, home))
            .collect()
    }
}

fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
