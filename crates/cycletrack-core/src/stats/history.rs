//! Cycle history summary.
//!
//! Lists every identified cycle with its bleed and length, plus aggregate
//! statistics. The most recent cycle is still open, so its length is unknown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cycle_length::{CycleLengthStats, CycleStatsAnalyzer};
use crate::cycle::CycleSegmenter;
use crate::entry::CycleEntry;
use crate::profile::CycleRegularity;

/// One cycle in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub start: NaiveDate,
    /// Calendar span of the opening bleed
    pub period_length: u32,
    /// Period-flagged days in the opening bleed
    pub bleeding_days: u32,
    /// Days until the next start; `None` for the current cycle
    pub length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleHistory {
    pub cycles: Vec<CycleRecord>,
    pub average_cycle_length: Option<u32>,
    pub average_period_length: Option<u32>,
    pub regularity: Option<CycleRegularity>,
    pub cycle_length: Option<CycleLengthStats>,
}

impl CycleHistory {
    pub fn from_entries(entries: &[CycleEntry]) -> Self {
        Self::from_entries_with(
            &CycleSegmenter::default(),
            &CycleStatsAnalyzer::default(),
            entries,
        )
    }

    pub fn from_entries_with(
        segmenter: &CycleSegmenter,
        analyzer: &CycleStatsAnalyzer,
        entries: &[CycleEntry],
    ) -> Self {
        let segments = segmenter.segment(entries);
        let starts: Vec<NaiveDate> = segments.iter().map(|s| s.start).collect();

        let cycles: Vec<CycleRecord> = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| CycleRecord {
                start: segment.start,
                period_length: segment.period_length(),
                bleeding_days: segment.bleeding_days,
                length: segments
                    .get(i + 1)
                    .map(|next| (next.start - segment.start).num_days() as u32),
            })
            .collect();

        let average_period_length = if cycles.is_empty() {
            None
        } else {
            let total: u32 = cycles.iter().map(|c| c.period_length).sum();
            Some((total as f64 / cycles.len() as f64).round() as u32)
        };

        let cycle_length = analyzer.compute(&starts);

        Self {
            average_cycle_length: cycle_length.as_ref().map(|s| s.average_days()),
            regularity: cycle_length.as_ref().and_then(|s| s.regularity),
            cycle_length,
            average_period_length,
            cycles,
        }
    }

    pub fn cycle_starts(&self) -> Vec<NaiveDate> {
        self.cycles.iter().map(|c| c.start).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period_run(start: &str, days: i64) -> Vec<CycleEntry> {
        (0..days)
            .map(|i| CycleEntry::period(d(start) + Duration::days(i)))
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let history = CycleHistory::from_entries(&[]);
        assert!(history.is_empty());
        assert_eq!(history.average_cycle_length, None);
        assert_eq!(history.average_period_length, None);
        assert_eq!(history.regularity, None);
        assert!(history.cycle_length.is_none());
    }

    #[test]
    fn test_single_cycle_has_period_but_no_length() {
        let history = CycleHistory::from_entries(&period_run("2024-01-01", 4));
        assert_eq!(history.cycles.len(), 1);
        assert_eq!(history.cycles[0].length, None);
        assert_eq!(history.average_period_length, Some(4));
        assert_eq!(history.average_cycle_length, None);
    }

    #[test]
    fn test_three_cycles() {
        let mut entries = period_run("2024-01-01", 5);
        entries.extend(period_run("2024-01-29", 4));
        entries.extend(period_run("2024-02-28", 6));

        let history = CycleHistory::from_entries(&entries);
        assert_eq!(
            history.cycle_starts(),
            vec![d("2024-01-01"), d("2024-01-29"), d("2024-02-28")]
        );
        assert_eq!(history.cycles[0].length, Some(28));
        assert_eq!(history.cycles[1].length, Some(30));
        assert_eq!(history.cycles[2].length, None);
        assert_eq!(history.average_cycle_length, Some(29));
        assert_eq!(history.average_period_length, Some(5));
        assert_eq!(history.regularity, Some(CycleRegularity::Regular));
    }
}
