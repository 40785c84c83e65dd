//! TOML-based application configuration.
//!
//! Stores:
//! - Engine policy (spotting spacing, streak gap tolerance, phase boundaries,
//!   regularity threshold)
//! - Profile defaults for subjects without a saved profile
//! - Log filter
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::cycle::{
    CycleSegmenter, PhaseClassifier, LUTEAL_PHASE_DAYS, MAX_STREAK_GAP_DAYS,
    MIN_CYCLE_SPACING_DAYS, OVULATION_WINDOW_RADIUS,
};
use crate::error::{ConfigError, CoreError, Result};
use crate::profile::{
    CycleProfile, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH,
};
use crate::stats::{CycleStatsAnalyzer, REGULARITY_THRESHOLD_DAYS};

const MAX_STREAK_GAP_LIMIT: u32 = 3;
const MIN_LUTEAL_PHASE_DAYS: u32 = 7;
const MAX_WINDOW_RADIUS: u32 = 3;

fn check_range(key: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be between {min} and {max} (got {value})"),
        }
        .into());
    }
    Ok(())
}

/// Engine policy knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_min_cycle_spacing_days")]
    pub min_cycle_spacing_days: u32,
    #[serde(default = "default_max_streak_gap_days")]
    pub max_streak_gap_days: u32,
    #[serde(default = "default_regularity_threshold_days")]
    pub regularity_threshold_days: u32,
    #[serde(default = "default_luteal_phase_days")]
    pub luteal_phase_days: u32,
    #[serde(default = "default_ovulation_window_radius")]
    pub ovulation_window_radius: u32,
}

/// Profile values used when a subject has none saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_cycle_length")]
    pub average_cycle_length: u32,
    #[serde(default = "default_period_length")]
    pub average_period_length: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Subject used when the CLI is not given one.
    #[serde(default = "default_subject")]
    pub default_subject: String,
}

// Default functions
fn default_min_cycle_spacing_days() -> u32 {
    MIN_CYCLE_SPACING_DAYS
}
fn default_max_streak_gap_days() -> u32 {
    MAX_STREAK_GAP_DAYS
}
fn default_regularity_threshold_days() -> u32 {
    REGULARITY_THRESHOLD_DAYS
}
fn default_luteal_phase_days() -> u32 {
    LUTEAL_PHASE_DAYS
}
fn default_ovulation_window_radius() -> u32 {
    OVULATION_WINDOW_RADIUS
}
fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}
fn default_period_length() -> u32 {
    DEFAULT_PERIOD_LENGTH
}
fn default_log_filter() -> String {
    "warn".into()
}
fn default_subject() -> String {
    "default".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_cycle_spacing_days: default_min_cycle_spacing_days(),
            max_streak_gap_days: default_max_streak_gap_days(),
            regularity_threshold_days: default_regularity_threshold_days(),
            luteal_phase_days: default_luteal_phase_days(),
            ovulation_window_radius: default_ovulation_window_radius(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
            average_period_length: DEFAULT_PERIOD_LENGTH,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            defaults: DefaultsConfig::default(),
            logging: LoggingConfig::default(),
            default_subject: default_subject(),
        }
    }
}

impl EngineConfig {
    pub fn segmenter(&self) -> CycleSegmenter {
        CycleSegmenter::with_policy(self.min_cycle_spacing_days, self.max_streak_gap_days)
    }

    pub fn classifier(&self) -> PhaseClassifier {
        PhaseClassifier::with_settings(self.luteal_phase_days, self.ovulation_window_radius)
    }

    pub fn stats_analyzer(&self) -> CycleStatsAnalyzer {
        CycleStatsAnalyzer::with_threshold(self.regularity_threshold_days)
    }
}

impl DefaultsConfig {
    pub fn profile(&self) -> CycleProfile {
        CycleProfile {
            average_cycle_length: self.average_cycle_length,
            average_period_length: self.average_period_length,
            ..CycleProfile::default()
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the config file inside the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails [`Config::validate`], or if the default cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate().map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config fails validation. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values that the engine relies on being sane.
    ///
    /// # Errors
    ///
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<()> {
        CycleProfile::new(
            Some(self.defaults.average_cycle_length),
            Some(self.defaults.average_period_length),
        )?;

        let engine = &self.engine;
        check_range(
            "engine.min_cycle_spacing_days",
            engine.min_cycle_spacing_days,
            1,
            MIN_CYCLE_LENGTH,
        )?;
        check_range(
            "engine.max_streak_gap_days",
            engine.max_streak_gap_days,
            0,
            MAX_STREAK_GAP_LIMIT,
        )?;
        check_range(
            "engine.regularity_threshold_days",
            engine.regularity_threshold_days,
            0,
            MAX_CYCLE_LENGTH - MIN_CYCLE_LENGTH,
        )?;
        check_range(
            "engine.luteal_phase_days",
            engine.luteal_phase_days,
            MIN_LUTEAL_PHASE_DAYS,
            MIN_CYCLE_LENGTH - 1,
        )?;
        // Keeps at least one luteal day after the window in every cycle.
        check_range(
            "engine.ovulation_window_radius",
            engine.ovulation_window_radius,
            0,
            MAX_WINDOW_RADIUS,
        )?;

        if self.default_subject.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "default_subject".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

}
