//! # cycletrack Core Library
//!
//! This library provides the menstrual cycle inference engine and the small
//! amount of plumbing needed to host it: a SQLite store for daily entries and
//! profiles, and a TOML configuration for engine policy.
//!
//! ## Architecture
//!
//! - **Cycle Engine**: pure functions over a snapshot of daily entries.
//!   Segmentation finds cycle starts, the phase classifier reads any date
//!   against a start, and the context facade answers "what is happening today
//!   and when is the next period expected"
//! - **Statistics**: cycle length averages, regularity, history and symptom
//!   patterns
//! - **Storage**: SQLite entry/profile storage and TOML-based configuration
//!
//! Insufficient data is always reported as `None` (or
//! [`TrackingStatus::InsufficientData`]), never as a guessed phase or a zero
//! length.
//!
//! ## Key Components
//!
//! - [`identify_cycle_starts`]: cycle segmentation
//! - [`calculate_average_cycle_length`]: cycle length statistics
//! - [`get_cycle_phase_for_date`]: phase classification
//! - [`get_cycle_context`]: today's phase and next period prediction
//! - [`Database`]: entry and profile persistence
//! - [`Config`]: application configuration management

pub mod cycle;
pub mod entry;
pub mod error;
pub mod profile;
pub mod stats;
pub mod storage;

pub use cycle::{
    get_cycle_context, get_cycle_phase_for_date, identify_cycle_starts, CycleContext, CyclePhase,
    CycleSegment, CycleSegmenter, FertileWindow, PhaseClassifier, PhaseReading, TrackingStatus,
};
pub use entry::{CervicalMucus, CycleEntry, EntrySource, FlowIntensity, PainLevel, Symptom, Symptoms};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use profile::{CycleProfile, CycleRegularity};
pub use stats::{
    calculate_average_cycle_length, cycle_length_stats, symptom_patterns, CycleHistory,
    CycleLengthStats, CycleStatsAnalyzer, PhaseSymptoms,
};
pub use storage::{Config, Database};
