//! CLI configuration management
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file given with `--config`
//! 3. `HESTONMC_*` environment variables
//! 4. Command-line flags
//!
//! Layers 3 and 4 are both resolved by clap (`env = ...` on each flag), so
//! this module only merges an already-resolved [`EngineOverrides`] onto the
//! file settings.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use pricer_models::models::schemes::{QeParams, SchemeKind};
use pricer_pricing::mc::{
    ConfigError as EngineConfigError, Discounting, MonteCarloConfig, DEFAULT_TIME_STEP,
    DEFAULT_TRIALS,
};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Monte Carlo knobs as they appear in the TOML `[engine]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub trials: usize,
    pub dt: f64,
    #[serde(deserialize_with = "deserialize_scheme")]
    pub scheme: SchemeKind,
    pub psi_c: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub seed: Option<u64>,
    pub discount_rate: Option<f64>,
    pub sequential: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let qe = QeParams::default();
        Self {
            trials: DEFAULT_TRIALS,
            dt: DEFAULT_TIME_STEP,
            scheme: SchemeKind::default(),
            psi_c: qe.psi_c,
            gamma1: qe.gamma_1,
            gamma2: qe.gamma_2,
            seed: None,
            discount_rate: None,
            sequential: false,
        }
    }
}

impl EngineSettings {
    /// Merge with CLI/env overrides (overrides take precedence)
    pub fn merge(&mut self, overrides: &EngineOverrides) {
        if let Some(trials) = overrides.trials {
            self.trials = trials;
        }
        if let Some(dt) = overrides.dt {
            self.dt = dt;
        }
        if let Some(scheme) = overrides.scheme {
            self.scheme = scheme;
        }
        if let Some(psi_c) = overrides.psi_c {
            self.psi_c = psi_c;
        }
        if let Some(gamma1) = overrides.gamma1 {
            self.gamma1 = gamma1;
        }
        if let Some(gamma2) = overrides.gamma2 {
            self.gamma2 = gamma2;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.discount_rate.is_some() {
            self.discount_rate = overrides.discount_rate;
        }
        if overrides.sequential {
            self.sequential = true;
        }
    }

    /// Build a validated engine configuration, replacing the seed with `seed`
    pub fn to_mc_config(&self, seed: Option<u64>) -> Result<MonteCarloConfig, EngineConfigError> {
        let discounting = match self.discount_rate {
            Some(rate) => Discounting::Continuous { rate },
            None => Discounting::None,
        };
        MonteCarloConfig::builder()
            .n_trials(self.trials)
            .time_step(self.dt)
            .scheme(self.scheme)
            .qe_params(QeParams {
                psi_c: self.psi_c,
                gamma_1: self.gamma1,
                gamma_2: self.gamma2,
            })
            .maybe_seed(seed)
            .parallel(!self.sequential)
            .discounting(discounting)
            .build()
    }
}

/// Engine knobs resolved from flags and environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOverrides {
    pub trials: Option<usize>,
    pub dt: Option<f64>,
    pub scheme: Option<SchemeKind>,
    pub psi_c: Option<f64>,
    pub gamma1: Option<f64>,
    pub gamma2: Option<f64>,
    pub seed: Option<u64>,
    pub discount_rate: Option<f64>,
    pub sequential: bool,
}

/// Full CLI settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    #[serde(deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
    pub engine: EngineSettings,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_scheme<'de, D>(deserializer: D) -> Result<SchemeKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    SchemeKind::from_str(&s).map_err(serde::de::Error::custom)
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Build settings from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments and environment variables (already merged by clap)
/// 2. Config file
/// 3. Default values
pub fn build_settings(
    config_file: Option<&Path>,
    log_level: Option<LogLevel>,
    format: Option<OutputFormat>,
    overrides: &EngineOverrides,
) -> Result<Settings, ConfigError> {
    let mut settings = match config_file {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    if let Some(level) = log_level {
        settings.log_level = level;
    }
    if let Some(format) = format {
        settings.format = format;
    }
    settings.engine.merge(overrides);

    Ok(settings)
}
