//! Statistics module for cycletrack
//!
//! This module provides aggregate views over a subject's cycles:
//! cycle length statistics and regularity, the cycle history summary,
//! and symptom frequency by phase.

mod cycle_length;
mod history;
mod symptom_patterns;

pub use cycle_length::{
    calculate_average_cycle_length, classify_regularity, cycle_intervals, cycle_length_stats,
    CycleLengthStats, CycleStatsAnalyzer, MIN_INTERVALS_FOR_REGULARITY, REGULARITY_THRESHOLD_DAYS,
};

pub use history::{CycleHistory, CycleRecord};

pub use symptom_patterns::{symptom_patterns, symptom_patterns_with, PhaseSymptoms, SymptomCount};
