//! Per-subject cycle configuration.
//!
//! The profile is user-editable. Values are checked here, at the write
//! boundary; the engine functions trust the numbers they receive.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;

pub const MIN_CYCLE_LENGTH: u32 = 21;
pub const MAX_CYCLE_LENGTH: u32 = 45;
pub const MIN_PERIOD_LENGTH: u32 = 2;
pub const MAX_PERIOD_LENGTH: u32 = 8;

/// Historical cycle regularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleRegularity {
    Regular,
    Irregular,
}

impl std::fmt::Display for CycleRegularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Irregular => write!(f, "irregular"),
        }
    }
}

impl std::str::FromStr for CycleRegularity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "irregular" => Ok(Self::Irregular),
            _ => Err(format!("Unknown cycle regularity: {}", s)),
        }
    }
}

/// Cycle configuration for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleProfile {
    #[serde(default = "default_cycle_length")]
    pub average_cycle_length: u32,
    #[serde(default = "default_period_length")]
    pub average_period_length: u32,
    #[serde(default = "default_true")]
    pub is_tracking: bool,
    #[serde(default)]
    pub cycle_regularity: Option<CycleRegularity>,
}

fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}
fn default_period_length() -> u32 {
    DEFAULT_PERIOD_LENGTH
}
fn default_true() -> bool {
    true
}

impl Default for CycleProfile {
    fn default() -> Self {
        Self {
            average_cycle_length: DEFAULT_CYCLE_LENGTH,
            average_period_length: DEFAULT_PERIOD_LENGTH,
            is_tracking: true,
            cycle_regularity: None,
        }
    }
}

impl CycleProfile {
    /// Build a profile from optional user input, falling back to 28/5.
    ///
    /// # Errors
    /// Returns an error if a supplied length is outside its bounds.
    pub fn new(
        average_cycle_length: Option<u32>,
        average_period_length: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let profile = Self {
            average_cycle_length: average_cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH),
            average_period_length: average_period_length.unwrap_or(DEFAULT_PERIOD_LENGTH),
            ..Self::default()
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check both lengths against their domain bounds.
    ///
    /// # Errors
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(
            "average_cycle_length",
            self.average_cycle_length,
            MIN_CYCLE_LENGTH,
            MAX_CYCLE_LENGTH,
        )?;
        check_range(
            "average_period_length",
            self.average_period_length,
            MIN_PERIOD_LENGTH,
            MAX_PERIOD_LENGTH,
        )
    }

    /// Copy of this profile with both lengths clamped into bounds.
    pub fn clamped(&self) -> Self {
        Self {
            average_cycle_length: self
                .average_cycle_length
                .clamp(MIN_CYCLE_LENGTH, MAX_CYCLE_LENGTH),
            average_period_length: self
                .average_period_length
                .clamp(MIN_PERIOD_LENGTH, MAX_PERIOD_LENGTH),
            ..self.clone()
        }
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value as i64,
            min: min as i64,
            max: max as i64,
        })
    }
}
