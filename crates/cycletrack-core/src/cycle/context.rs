//! "Today" view of a subject's cycle.
//!
//! Combines segmentation and phase classification into the summary shown on
//! dashboards: current phase, cycle day, and the next expected period.
//!
//! The next period is a naive linear projection (last start + configured
//! cycle length). It ignores trends and recent irregularity.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::phase::{most_recent_start, CyclePhase, FertileWindow, PhaseClassifier};
use super::segmentation::CycleSegmenter;
use crate::entry::CycleEntry;
use crate::profile::CycleProfile;

/// Current cycle summary for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleContext {
    pub phase: CyclePhase,
    pub cycle_day: u32,
    pub cycle_start: NaiveDate,
    pub next_period: NaiveDate,
    pub days_until_next_period: u32,
    pub fertile_window: FertileWindow,
}

/// Outcome of a context lookup gated by the profile's tracking flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackingStatus {
    /// The subject has switched tracking off; nothing is computed.
    NotTracking,
    /// No cycle start on or before the reference date.
    InsufficientData,
    Tracking { context: CycleContext },
}

/// Whole days from `today` until `next_period`, never negative.
pub fn days_until_next_period(next_period: NaiveDate, today: NaiveDate) -> u32 {
    (next_period - today).num_days().max(0) as u32
}

/// Cycle context as of `today`, or `None` when no cycle start is known yet.
///
/// Phase and prediction use the configured lengths, not the historical
/// average.
pub fn cycle_context_with(
    segmenter: &CycleSegmenter,
    classifier: &PhaseClassifier,
    entries: &[CycleEntry],
    average_cycle_length: u32,
    average_period_length: u32,
    today: NaiveDate,
) -> Option<CycleContext> {
    let starts = segmenter.identify_cycle_starts(entries);
    let cycle_start = most_recent_start(&starts, today)?;
    let reading = classifier.classify(
        today,
        Some(cycle_start),
        average_cycle_length,
        average_period_length,
    )?;

    let next_period = cycle_start + Duration::days(average_cycle_length as i64);

    Some(CycleContext {
        phase: reading.phase,
        cycle_day: reading.cycle_day,
        cycle_start,
        next_period,
        days_until_next_period: days_until_next_period(next_period, today),
        fertile_window: classifier.fertile_window(cycle_start, average_cycle_length),
    })
}

/// Cycle context as of `today` using the default segmentation and phase
/// boundaries.
pub fn get_cycle_context(
    entries: &[CycleEntry],
    average_cycle_length: u32,
    average_period_length: u32,
    today: NaiveDate,
) -> Option<CycleContext> {
    cycle_context_with(
        &CycleSegmenter::default(),
        &PhaseClassifier::default(),
        entries,
        average_cycle_length,
        average_period_length,
        today,
    )
}

impl CycleProfile {
    /// Context for this profile, honoring the tracking flag.
    pub fn status(&self, entries: &[CycleEntry], today: NaiveDate) -> TrackingStatus {
        self.status_with(
            &CycleSegmenter::default(),
            &PhaseClassifier::default(),
            entries,
            today,
        )
    }

    pub fn status_with(
        &self,
        segmenter: &CycleSegmenter,
        classifier: &PhaseClassifier,
        entries: &[CycleEntry],
        today: NaiveDate,
    ) -> TrackingStatus {
        if !self.is_tracking {
            return TrackingStatus::NotTracking;
        }
        match cycle_context_with(
            segmenter,
            classifier,
            entries,
            self.average_cycle_length,
            self.average_period_length,
            today,
        ) {
            Some(context) => TrackingStatus::Tracking { context },
            None => TrackingStatus::InsufficientData,
        }
    }
}
