//! Configuration loading and typed config structures for the Colony simulation.
//!
//! The canonical configuration lives in `colony-config.yaml` at the project
//! root. Every section and field is optional; anything omitted takes its
//! default, so an empty file (or no file) yields [`SimulationConfig::default`].

use std::path::Path;

use colony_agents::WorkerConfig;
use colony_jobs::JobConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `colony-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Map size, seed, starting population.
    #[serde(default)]
    pub world: WorldConfig,

    /// Clock rates.
    #[serde(default)]
    pub time: TimeConfig,

    /// Job durations and tunables.
    #[serde(default)]
    pub jobs: JobConfig,

    /// Worker needs and movement.
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run bounds and pacing.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file) for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Colony name, shown in logs.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for worker generation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Map width in cells.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Map height in cells.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Ticks a planted crop needs to mature.
    #[serde(default = "default_crop_growth_ticks")]
    pub crop_growth_ticks: u64,

    /// Workers present at the start.
    #[serde(default = "default_initial_workers")]
    pub initial_workers: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_width(),
            height: default_height(),
            crop_growth_ticks: default_crop_growth_ticks(),
            initial_workers: default_initial_workers(),
        }
    }
}

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Ticks in one in-game hour.
    #[serde(default = "default_ticks_per_hour")]
    pub ticks_per_hour: u64,

    /// Hours in one in-game day.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            ticks_per_hour: default_ticks_per_hour(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Log a tick summary every N ticks (0 = never).
    #[serde(default = "default_summary_interval_ticks")]
    pub summary_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            summary_interval_ticks: default_summary_interval_ticks(),
        }
    }
}

/// Simulation boundary and pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Real-time milliseconds between ticks (0 = as fast as possible).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Re-check every designated cell every N ticks (0 = never).
    #[serde(default = "default_revalidate_interval_ticks")]
    pub revalidate_interval_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            tick_interval_ms: 0,
            revalidate_interval_ticks: default_revalidate_interval_ticks(),
        }
    }
}

fn default_world_name() -> String {
    "Boatmurdered".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_width() -> u32 {
    32
}

const fn default_height() -> u32 {
    20
}

const fn default_crop_growth_ticks() -> u64 {
    colony_world::DEFAULT_GROWTH_TICKS
}

const fn default_initial_workers() -> u32 {
    7
}

const fn default_ticks_per_hour() -> u64 {
    60
}

const fn default_hours_per_day() -> u64 {
    24
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_interval_ticks() -> u64 {
    100
}

const fn default_max_ticks() -> u64 {
    2_000
}

const fn default_revalidate_interval_ticks() -> u64 {
    50
}
