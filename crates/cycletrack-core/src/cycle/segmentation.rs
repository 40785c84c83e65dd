//! Cycle segmentation.
//!
//! Turns a subject's daily entries into the ordered list of cycle starts.
//! Period days are grouped into bleeding runs; the first non-spotting day of
//! each run is a candidate start, and candidates that follow an accepted start
//! too closely are treated as spotting rather than a new cycle. A run made only
//! of spotting days never opens a cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entry::{CycleEntry, FlowIntensity};

/// Minimum days between two accepted cycle starts. A candidate closer than
/// this to the previous start is spotting.
pub const MIN_CYCLE_SPACING_DAYS: u32 = 10;

/// Calendar days that may separate two period days inside one bleeding run.
/// The gap may be unlogged or logged as a non-period day.
pub const MAX_STREAK_GAP_DAYS: u32 = 1;

/// A cycle opened by a bleeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSegment {
    /// Day 1 of the cycle
    pub start: NaiveDate,
    /// Last period day of the opening run
    pub period_end: NaiveDate,
    /// Number of period-flagged days in the opening run
    pub bleeding_days: u32,
}

impl CycleSegment {
    /// Calendar span of the opening bleed, gap days included.
    pub fn period_length(&self) -> u32 {
        ((self.period_end - self.start).num_days() + 1) as u32
    }
}

/// A maximal streak of period days, trimmed to start at its first day of
/// real flow.
#[derive(Debug, Clone, Copy)]
struct BleedingRun {
    first: NaiveDate,
    last: NaiveDate,
    days: u32,
}

/// Segments entries into cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSegmenter {
    pub min_cycle_spacing_days: u32,
    pub max_streak_gap_days: u32,
}

impl Default for CycleSegmenter {
    fn default() -> Self {
        Self {
            min_cycle_spacing_days: MIN_CYCLE_SPACING_DAYS,
            max_streak_gap_days: MAX_STREAK_GAP_DAYS,
        }
    }
}

impl CycleSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(min_cycle_spacing_days: u32, max_streak_gap_days: u32) -> Self {
        Self {
            min_cycle_spacing_days,
            max_streak_gap_days,
        }
    }

    /// Ascending cycle-start dates found in `entries`.
    pub fn identify_cycle_starts(&self, entries: &[CycleEntry]) -> Vec<NaiveDate> {
        self.segment(entries).into_iter().map(|s| s.start).collect()
    }

    /// Ascending cycle segments found in `entries`.
    ///
    /// Entries may arrive in any order. Repeated period dates count once.
    pub fn segment(&self, entries: &[CycleEntry]) -> Vec<CycleSegment> {
        let mut accepted: Vec<CycleSegment> = Vec::new();

        for run in self.bleeding_runs(entries) {
            if let Some(previous) = accepted.last() {
                let spacing = (run.first - previous.start).num_days();
                if spacing < self.min_cycle_spacing_days as i64 {
                    tracing::debug!(
                        "Treating bleed on {} as spotting ({} days after cycle start {})",
                        run.first,
                        spacing,
                        previous.start
                    );
                    continue;
                }
            }
            accepted.push(CycleSegment {
                start: run.first,
                period_end: run.last,
                bleeding_days: run.days,
            });
        }

        accepted
    }

    fn bleeding_runs(&self, entries: &[CycleEntry]) -> Vec<BleedingRun> {
        // Period date -> whether every entry on that date is spotting
        let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.is_period) {
            let spotting = entry.flow_intensity == Some(FlowIntensity::Spotting);
            days.entry(entry.date)
                .and_modify(|only_spotting| *only_spotting &= spotting)
                .or_insert(spotting);
        }

        let max_step = self.max_streak_gap_days as i64 + 1;
        let mut streaks: Vec<Vec<(NaiveDate, bool)>> = Vec::new();
        for (day, spotting) in days {
            match streaks.last_mut() {
                Some(streak)
                    if streak
                        .last()
                        .is_some_and(|(last, _)| (day - *last).num_days() <= max_step) =>
                {
                    streak.push((day, spotting));
                }
                _ => streaks.push(vec![(day, spotting)]),
            }
        }

        streaks
            .into_iter()
            .filter_map(|streak| {
                let Some(flow_at) = streak.iter().position(|(_, spotting)| !spotting) else {
                    tracing::debug!(
                        "Ignoring spotting-only bleed {}..{}",
                        streak[0].0,
                        streak[streak.len() - 1].0
                    );
                    return None;
                };
                Some(BleedingRun {
                    first: streak[flow_at].0,
                    last: streak[streak.len() - 1].0,
                    days: (streak.len() - flow_at) as u32,
                })
            })
            .collect()
    }
}

/// Ascending cycle-start dates using the default policy.
pub fn identify_cycle_starts(entries: &[CycleEntry]) -> Vec<NaiveDate> {
    CycleSegmenter::default().identify_cycle_starts(entries)
}
