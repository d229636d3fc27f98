//! Configuration system for the timetabler engine.
//!
//! Load generation configuration from TOML or YAML files to control the
//! budget, restarts, search bounds and soft-constraint weights without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use timetabler_config::{GeneratorConfig, ThreadCount};
//! use std::time::Duration;
//!
//! let config = GeneratorConfig::from_toml_str(r#"
//!     random_seed = 7
//!     restart_count = 8
//!     thread_count = { count = 2 }
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!     node_limit = 200000
//!
//!     [weights]
//!     batch_gaps = 10.0
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.node_limit(), Some(200_000));
//! assert_eq!(config.thread_count, ThreadCount::Count(2));
//! assert_eq!(config.weights.batch_gaps, 10.0);
//! assert_eq!(config.weights.day_preference, 5.0);
//! ```
//!
//! Use default config when the file is missing:
//!
//! ```
//! use timetabler_config::GeneratorConfig;
//!
//! let config = GeneratorConfig::load("timetabler.toml").unwrap_or_default();
//! assert_eq!(config.restart_count, 4);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_restart_count() -> usize {
    4
}

fn default_termination() -> Option<TerminationConfig> {
    Some(TerminationConfig::default())
}

/// Main generation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Base seed; restart `i` derives its own seed from it.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of independent randomized restarts.
    #[serde(default = "default_restart_count")]
    pub restart_count: usize,

    /// Worker threads used to run restarts.
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// Budget configuration. Absent from a file, the default budget
    /// applies; an explicit table replaces it as a whole.
    #[serde(default = "default_termination")]
    pub termination: Option<TerminationConfig>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub acceptance: AcceptanceConfig,

    /// Soft-constraint weights.
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            restart_count: default_restart_count(),
            thread_count: ThreadCount::default(),
            termination: default_termination(),
            search: SearchConfig::default(),
            acceptance: AcceptanceConfig::default(),
            weights: WeightsConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a TOML or YAML file, chosen by extension (`.yaml`/`.yml` is
    /// YAML, anything else TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Checks values that parse but cannot drive a generation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero restart count, a zero
    /// thread count, or a negative or non-finite weight or threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restart_count == 0 {
            return Err(ConfigError::Invalid(
                "restart_count must be at least 1".to_string(),
            ));
        }
        if self.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "thread_count must be at least 1".to_string(),
            ));
        }
        for (name, weight) in self.weights.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight `{name}` must be finite and non-negative, got {weight}"
                )));
            }
        }
        if let Some(threshold) = self.acceptance.soft_cost_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "soft_cost_threshold must be finite and non-negative, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Replaces the time limit with `seconds`.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            millis_spent_limit: None,
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Replaces the time limit with `millis`.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: None,
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the per-restart node expansion limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_limit: Some(nodes),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_restart_count(mut self, restarts: usize) -> Self {
        self.restart_count = restarts;
        self
    }

    pub fn with_thread_count(mut self, threads: ThreadCount) -> Self {
        self.thread_count = threads;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_soft_cost_threshold(mut self, threshold: f64) -> Self {
        self.acceptance.soft_cost_threshold = Some(threshold);
        self
    }

    pub fn with_weights(mut self, weights: WeightsConfig) -> Self {
        self.weights = weights;
        self
    }

    /// Returns the base seed, 0 when none is configured.
    pub fn seed(&self) -> u64 {
        self.random_seed.unwrap_or(0)
    }

    /// Returns the shared wall-clock budget, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the per-restart node limit, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_limit)
    }
}

/// Restart thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// One worker per available core.
    #[default]
    Auto,

    /// Run restarts sequentially on the calling thread.
    None,

    /// Specific number of threads.
    Count(usize),
}

/// Default wall-clock budget of a generation run.
pub const DEFAULT_SECONDS_SPENT_LIMIT: u64 = 30;

/// Budget configuration.
///
/// The default is a [`DEFAULT_SECONDS_SPENT_LIMIT`] second time limit and
/// no node limit. Fields missing from an explicit table are unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend generating.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend generating, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum node expansions per restart.
    pub node_limit: Option<u64>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            seconds_spent_limit: Some(DEFAULT_SECONDS_SPENT_LIMIT),
            millis_spent_limit: None,
            node_limit: None,
        }
    }
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    ///
    /// An explicit zero is a real (already exhausted) budget.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.seconds_spent_limit.is_none() && self.millis_spent_limit.is_none() {
            return None;
        }
        let millis = self.seconds_spent_limit.unwrap_or(0).saturating_mul(1000)
            + self.millis_spent_limit.unwrap_or(0);
        Some(Duration::from_millis(millis))
    }
}

fn default_max_backjump_depth() -> usize {
    16
}

fn default_true() -> bool {
    true
}

fn default_refinement_pass_limit() -> usize {
    4
}

/// Search engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Maximum number of decision levels skipped by one conflict-directed jump.
    #[serde(default = "default_max_backjump_depth")]
    pub max_backjump_depth: usize,

    /// Require every hour of a section to be taught by the same faculty member.
    #[serde(default = "default_true")]
    pub same_faculty_per_section: bool,

    /// Hill-climbing passes after a complete schedule is found; 0 disables.
    #[serde(default = "default_refinement_pass_limit")]
    pub refinement_pass_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_backjump_depth: default_max_backjump_depth(),
            same_faculty_per_section: true,
            refinement_pass_limit: default_refinement_pass_limit(),
        }
    }
}

/// Early-exit configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptanceConfig {
    /// A restart whose schedule has no hard violations and a soft cost
    /// strictly below this value cancels the remaining restarts.
    pub soft_cost_threshold: Option<f64>,
}

/// Weights applied to each soft constraint's raw penalty.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WeightsConfig {
    /// Per minute taught outside a faculty member's preferred window.
    pub time_window: f64,
    /// Per hour taught on a day the faculty member did not ask for.
    pub day_preference: f64,
    /// Per unit of daily-load imbalance.
    pub daily_load: f64,
    /// Per idle slot inside a batch's day.
    pub batch_gaps: f64,
    /// Per hour held in a room owned by another branch.
    pub room_affinity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            time_window: 0.1,
            day_preference: 5.0,
            daily_load: 2.0,
            batch_gaps: 3.0,
            room_affinity: 1.0,
        }
    }
}

impl WeightsConfig {
    /// Iterates `(constraint name, weight)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("time_window", self.time_window),
            ("day_preference", self.day_preference),
            ("daily_load", self.daily_load),
            ("batch_gaps", self.batch_gaps),
            ("room_affinity", self.room_affinity),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests;
