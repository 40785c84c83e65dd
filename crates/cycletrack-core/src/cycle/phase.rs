//! Cycle phase classification.
//!
//! Phase boundaries are day offsets from the cycle start (day 1):
//!
//! - **Menstrual**: day 1 through the period length
//! - **Follicular**: after menstruation, up to the ovulation window
//! - **Ovulation**: `ovulation_day ± OVULATION_WINDOW_RADIUS`, where
//!   `ovulation_day = cycle_length - LUTEAL_PHASE_DAYS`
//! - **Luteal**: after the ovulation window through the end of the cycle
//!
//! Checks run in that order, so every cycle day maps to exactly one phase even
//! when a long period overlaps the ovulation window of a short cycle.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Assumed luteal phase length; ovulation is modeled this many days before
/// the next cycle starts.
pub const LUTEAL_PHASE_DAYS: u32 = 14;

/// Days on either side of the ovulation day that still count as ovulation.
pub const OVULATION_WINDOW_RADIUS: u32 = 1;

/// Days before ovulation included in the fertile window.
pub const FERTILE_DAYS_BEFORE_OVULATION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub const ALL: [CyclePhase; 4] = [
        CyclePhase::Menstrual,
        CyclePhase::Follicular,
        CyclePhase::Ovulation,
        CyclePhase::Luteal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "menstrual",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
        }
    }
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CyclePhase {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menstrual" => Ok(Self::Menstrual),
            "follicular" => Ok(Self::Follicular),
            "ovulation" => Ok(Self::Ovulation),
            "luteal" => Ok(Self::Luteal),
            _ => Err(format!("Unknown cycle phase: {}", s)),
        }
    }
}

/// Phase and 1-indexed cycle day for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReading {
    pub phase: CyclePhase,
    pub cycle_day: u32,
}

/// Estimated fertile days around ovulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ovulation_date: NaiveDate,
}

impl FertileWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Classifies dates into cycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseClassifier {
    pub luteal_phase_days: u32,
    pub ovulation_window_radius: u32,
}

impl Default for PhaseClassifier {
    fn default() -> Self {
        Self {
            luteal_phase_days: LUTEAL_PHASE_DAYS,
            ovulation_window_radius: OVULATION_WINDOW_RADIUS,
        }
    }
}

impl PhaseClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(luteal_phase_days: u32, ovulation_window_radius: u32) -> Self {
        Self {
            luteal_phase_days,
            ovulation_window_radius,
        }
    }

    /// Modeled ovulation day (1-indexed) for a cycle of `cycle_length` days.
    pub fn ovulation_day(&self, cycle_length: u32) -> u32 {
        cycle_length.saturating_sub(self.luteal_phase_days).max(1)
    }

    /// Phase for a 1-indexed cycle day. Days past `cycle_length` are luteal.
    pub fn phase_for_day(&self, cycle_day: u32, cycle_length: u32, period_length: u32) -> CyclePhase {
        let ovulation = self.ovulation_day(cycle_length);
        let window_start = ovulation.saturating_sub(self.ovulation_window_radius);
        let window_end = ovulation.saturating_add(self.ovulation_window_radius);

        if cycle_day <= period_length {
            CyclePhase::Menstrual
        } else if cycle_day < window_start {
            CyclePhase::Follicular
        } else if cycle_day <= window_end {
            CyclePhase::Ovulation
        } else {
            CyclePhase::Luteal
        }
    }

    /// Phase reading for `date` against the cycle that began on `cycle_start`.
    ///
    /// Returns `None` when no start is known or `date` precedes it. A date
    /// beyond the expected cycle end is still read against `cycle_start`.
    pub fn classify(
        &self,
        date: NaiveDate,
        cycle_start: Option<NaiveDate>,
        cycle_length: u32,
        period_length: u32,
    ) -> Option<PhaseReading> {
        let start = cycle_start?;
        let offset = (date - start).num_days();
        if offset < 0 {
            tracing::debug!("{} precedes cycle start {}; phase indeterminate", date, start);
            return None;
        }

        let cycle_day = offset as u32 + 1;
        Some(PhaseReading {
            phase: self.phase_for_day(cycle_day, cycle_length, period_length),
            cycle_day,
        })
    }

    /// Fertile window for the cycle beginning on `cycle_start`.
    pub fn fertile_window(&self, cycle_start: NaiveDate, cycle_length: u32) -> FertileWindow {
        let ovulation_date =
            cycle_start + Duration::days(self.ovulation_day(cycle_length) as i64 - 1);
        FertileWindow {
            start: ovulation_date - Duration::days(FERTILE_DAYS_BEFORE_OVULATION as i64),
            end: ovulation_date,
            ovulation_date,
        }
    }
}

/// Phase reading for `date` using the default boundaries.
pub fn get_cycle_phase_for_date(
    date: NaiveDate,
    cycle_start: Option<NaiveDate>,
    cycle_length: u32,
    period_length: u32,
) -> Option<PhaseReading> {
    PhaseClassifier::default().classify(date, cycle_start, cycle_length, period_length)
}

/// Latest start on or before `date`, regardless of the order of `starts`.
pub fn most_recent_start(starts: &[NaiveDate], date: NaiveDate) -> Option<NaiveDate> {
    starts.iter().filter(|s| **s <= date).max().copied()
}
