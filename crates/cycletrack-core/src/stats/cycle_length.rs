//! Cycle length statistics and regularity.
//!
//! Lengths are the day differences between consecutive cycle starts. At least
//! two starts are needed for a length; anything less is reported as unknown
//! (`None`), never as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profile::CycleRegularity;

/// Maximum spread (longest minus shortest cycle) still considered regular.
pub const REGULARITY_THRESHOLD_DAYS: u32 = 7;

/// Minimum number of cycle lengths before regularity is classified.
pub const MIN_INTERVALS_FOR_REGULARITY: usize = 2;

/// Aggregate cycle length statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleLengthStats {
    /// Start-to-start lengths in chronological order
    pub intervals: Vec<u32>,
    /// Mean length at full precision
    pub mean_days: f64,
    pub shortest: u32,
    pub longest: u32,
    /// `longest - shortest`
    pub spread: u32,
    /// Sample standard deviation (0.0 with a single interval)
    pub std_dev: f64,
    pub regularity: Option<CycleRegularity>,
}

impl CycleLengthStats {
    /// Mean length rounded to the nearest day.
    pub fn average_days(&self) -> u32 {
        self.mean_days.round() as u32
    }
}

/// Computes cycle length statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStatsAnalyzer {
    pub regularity_threshold_days: u32,
}

impl Default for CycleStatsAnalyzer {
    fn default() -> Self {
        Self {
            regularity_threshold_days: REGULARITY_THRESHOLD_DAYS,
        }
    }
}

impl CycleStatsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(regularity_threshold_days: u32) -> Self {
        Self {
            regularity_threshold_days,
        }
    }

    /// Statistics for `starts`, or `None` with fewer than two starts.
    pub fn compute(&self, starts: &[NaiveDate]) -> Option<CycleLengthStats> {
        let intervals = cycle_intervals(starts);
        let shortest = *intervals.iter().min()?;
        let longest = *intervals.iter().max()?;

        let values: Vec<f64> = intervals.iter().map(|v| *v as f64).collect();
        let mean_days = mean(&values);

        Some(CycleLengthStats {
            mean_days,
            shortest,
            longest,
            spread: longest - shortest,
            std_dev: std_deviation(&values),
            regularity: self.classify_regularity(&intervals),
            intervals,
        })
    }

    /// `Regular` when the spread of `intervals` is within the threshold.
    pub fn classify_regularity(&self, intervals: &[u32]) -> Option<CycleRegularity> {
        if intervals.len() < MIN_INTERVALS_FOR_REGULARITY {
            return None;
        }
        let shortest = intervals.iter().min()?;
        let longest = intervals.iter().max()?;
        if longest - shortest <= self.regularity_threshold_days {
            Some(CycleRegularity::Regular)
        } else {
            Some(CycleRegularity::Irregular)
        }
    }
}

/// Day differences between consecutive starts, in chronological order.
///
/// `starts` may be in either order; repeated dates are ignored.
pub fn cycle_intervals(starts: &[NaiveDate]) -> Vec<u32> {
    let mut sorted = starts.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as u32)
        .collect()
}

/// Average cycle length in whole days, or `None` with fewer than two starts.
pub fn calculate_average_cycle_length(starts: &[NaiveDate]) -> Option<u32> {
    cycle_length_stats(starts).map(|s| s.average_days())
}

/// Cycle length statistics with the default regularity threshold.
pub fn cycle_length_stats(starts: &[NaiveDate]) -> Option<CycleLengthStats> {
    CycleStatsAnalyzer::default().compute(starts)
}

/// Regularity of `intervals` with the default threshold.
pub fn classify_regularity(intervals: &[u32]) -> Option<CycleRegularity> {
    CycleStatsAnalyzer::default().classify_regularity(intervals)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
