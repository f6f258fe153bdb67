//! Planner configuration
//!
//! Loaded from TOML. Every field has a default so an empty file (or no file
//! at all) yields a working configuration.
//!
//! ```toml
//! display_scale = 800.0
//! delete_policy = "block"
//!
//! [storage]
//! path = "plan.json"
//! flush_every = 5
//!
//! [log]
//! filter = "dlv=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`StorageConfig::path`]
pub const DATA_PATH_ENV: &str = "DLV_DATA";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What happens to a strategy's dependents when it is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Remove interventions, schedule, risks and metrics with the strategy
    #[default]
    Cascade,
    /// Refuse to remove a strategy that still has dependents
    Block,
    /// Remove only the strategy; dependents stay keyed by the dead id
    Orphan,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Width of the full Gantt timeline, in display units
    pub display_scale: f64,
    /// Width of one day in the day-granular Gantt layout
    pub px_per_day: f64,
    /// Strategy removal policy
    pub delete_policy: DeletePolicy,
    /// Local persistence
    pub storage: StorageConfig,
    /// Logging
    pub log: LogConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            display_scale: 600.0,
            px_per_day: 10.0,
            delete_policy: DeletePolicy::Cascade,
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply environment overrides
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(DATA_PATH_ENV) {
            self.storage.path = PathBuf::from(path);
        }
        self
    }

    /// With display scale
    #[inline]
    #[must_use]
    pub fn with_display_scale(mut self, scale: f64) -> Self {
        self.display_scale = scale;
        self
    }

    /// With delete policy
    #[inline]
    #[must_use]
    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// With storage path
    #[inline]
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.path = path.into();
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first bad value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.display_scale.is_finite() && self.display_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "display_scale",
                reason: format!("must be a positive number, got {}", self.display_scale),
            });
        }
        if !(self.px_per_day.is_finite() && self.px_per_day > 0.0) {
            return Err(ConfigError::Invalid {
                field: "px_per_day",
                reason: format!("must be a positive number, got {}", self.px_per_day),
            });
        }
        if self.storage.flush_every == 0 {
            return Err(ConfigError::Invalid {
                field: "storage.flush_every",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the key/value store
    pub path: PathBuf,
    /// Number of buffered saves before a write hits the file (1 = write-through)
    pub flush_every: u32,
    /// Key holding the metrics blob
    pub metrics_key: String,
    /// Key holding the whole plan
    pub plan_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dlv-data.json"),
            flush_every: 1,
            metrics_key: "metricsData".to_string(),
            plan_key: "planState".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
