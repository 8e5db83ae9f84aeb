//! Configuration management for prdiff
//!
//! Supports feature-specific configuration sections:
//! - [diff] - Prompt rendering and chunking budgets

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: &str = "1";

/// Supported configuration versions
pub const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["1"];

/// Repo-local config file name
pub const REPO_CONFIG_FILE: &str = ".prdiff.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version for tracking schema changes
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Diff rendering configuration
    #[serde(default)]
    pub diff: Option<DiffConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            diff: None,
        }
    }
}

/// Configuration for diff rendering and chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Token budget for a rendered prompt
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Characters assumed per model token
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: f64,

    /// Token budget for one chunk when splitting
    #[serde(default = "default_max_tokens_per_chunk")]
    pub max_tokens_per_chunk: usize,

    /// Default output directory for saved chunks
    #[serde(default = "default_diff_output_dir")]
    pub output_dir: String,

    /// Extra case-insensitive regexes for files whose content is skipped
    #[serde(default)]
    pub extra_skip_patterns: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            chars_per_token: default_chars_per_token(),
            max_tokens_per_chunk: default_max_tokens_per_chunk(),
            output_dir: default_diff_output_dir(),
            extra_skip_patterns: Vec::new(),
        }
    }
}

// Default value functions for root Config
fn default_config_version() -> String {
    CURRENT_CONFIG_VERSION.to_string()
}

// Default value functions for Diff
fn default_max_tokens() -> usize {
    8000
}

fn default_chars_per_token() -> f64 {
    3.5
}

fn default_max_tokens_per_chunk() -> usize {
    4000
}

fn default_diff_output_dir() -> String {
    "llm/diff".to_string()
}

impl Config {
    /// Check if the configuration version is supported
    pub fn is_version_supported(&self) -> bool {
        SUPPORTED_CONFIG_VERSIONS.contains(&self.version.as_str())
    }

    /// Get a warning message for unsupported versions
    pub fn version_warning(&self) -> Option<String> {
        if !self.is_version_supported() {
            Some(format!(
                "Configuration version '{}' is not supported. Supported versions: {}. Using defaults where needed.",
                self.version,
                SUPPORTED_CONFIG_VERSIONS.join(", ")
            ))
        } else {
            None
        }
    }

    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(warning) = config.version_warning() {
            tracing::warn!("{}", warning);
        }

        // Set to current version if empty or missing
        if config.version.is_empty() {
            config.version = CURRENT_CONFIG_VERSION.to_string();
        }

        Ok(config)
    }

    /// Get the default config directory path
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("prdiff"))
    }

    /// Load configuration with priority:
    /// 1. Defaults
    /// 2. Global config (~/.config/prdiff/config.toml)
    /// 3. Repo config (.prdiff.toml)
    /// 4. Explicit config file, if given
    ///
    /// Only the explicit file is required to load; the implicit ones are
    /// skipped with a warning when broken.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let global = Self::get_config_dir().map(|dir| dir.join("config.toml"));
        Self::load_layers(global.as_deref(), Path::new(REPO_CONFIG_FILE), explicit)
    }

    fn load_layers(
        global: Option<&Path>,
        repo: &Path,
        explicit: Option<&Path>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in global.into_iter().chain(std::iter::once(repo)) {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config = config.merge(loaded);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if let Some(path) = explicit {
            config = config.merge(Self::load_from_file(path)?);
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(mut self, other: Config) -> Self {
        if !other.version.is_empty() {
            self.version = other.version;
        }
        if other.diff.is_some() {
            self.diff = other.diff;
        }
        self
    }

    /// Diff section, falling back to defaults when absent
    pub fn diff_or_default(&self) -> DiffConfig {
        self.diff.clone().unwrap_or_default()
    }
}
