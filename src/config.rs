//! Configuration
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "limits": { "max_depth": 32, "max_array_len": 10000 },
//!   "contracts_dir": "./contracts",
//!   "builtin": true
//! }
//! ```
//!
//! Every key is optional. A relative `contracts_dir` is resolved against the
//! directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 32;
pub const DEFAULT_MAX_ARRAY_LEN: usize = 10_000;

/// Bounds applied to every validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Maximum container nesting depth (the top-level container is depth 1)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of items in any single array
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_array_len() -> usize {
    DEFAULT_MAX_ARRAY_LEN
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

impl ValidationLimits {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("limits.max_depth must be > 0".into()));
        }
        if self.max_array_len == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_array_len must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: ValidationLimits,

    /// Directory of declarative contract definitions (optional)
    #[serde(default)]
    pub contracts_dir: Option<PathBuf>,

    /// Whether the built-in catalog is registered (default: true)
    #[serde(default = "default_builtin")]
    pub builtin: bool,
}

fn default_builtin() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: ValidationLimits::default(),
            contracts_dir: None,
            builtin: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let (Some(dir), Some(base)) = (config.contracts_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }

        config.validate()?;

        tracing::info!(
            path = %path.display(),
            max_depth = config.limits.max_depth,
            max_array_len = config.limits.max_array_len,
            "configuration loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.limits.validate()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
