//! Property-based tests for the cycle engine.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use cycletrack_core::cycle::{CycleSegmenter, MIN_CYCLE_SPACING_DAYS};
use cycletrack_core::{
    calculate_average_cycle_length, get_cycle_context, get_cycle_phase_for_date,
    identify_cycle_starts, CycleEntry, CyclePhase,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy for a snapshot of daily entries spread over roughly half a year,
/// in arbitrary order and possibly with duplicate dates.
fn entries_strategy() -> impl Strategy<Value = Vec<CycleEntry>> {
    prop::collection::vec((0i64..200, any::<bool>()), 0..120).prop_map(|days| {
        days.into_iter()
            .map(|(offset, is_period)| {
                let date = base_date() + Duration::days(offset);
                if is_period {
                    CycleEntry::period(date)
                } else {
                    CycleEntry::new(date)
                }
            })
            .collect()
    })
}

proptest! {
    /// Property: segmentation is a pure function of its input.
    #[test]
    fn prop_cycle_starts_are_deterministic(entries in entries_strategy()) {
        let first = identify_cycle_starts(&entries);
        let second = identify_cycle_starts(&entries);
        prop_assert_eq!(&first, &second);

        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(identify_cycle_starts(&reversed), first);
    }

    /// Property: accepted starts are strictly ascending and at least the
    /// minimum spacing apart.
    #[test]
    fn prop_cycle_starts_are_spaced_and_ascending(entries in entries_strategy()) {
        let starts = identify_cycle_starts(&entries);
        for pair in starts.windows(2) {
            prop_assert!(pair[0] < pair[1]);
            prop_assert!((pair[1] - pair[0]).num_days() >= MIN_CYCLE_SPACING_DAYS as i64);
        }
    }

    /// Property: custom spacing is honored too.
    #[test]
    fn prop_custom_spacing_is_honored(entries in entries_strategy(), spacing in 1u32..40) {
        let starts = CycleSegmenter::with_policy(spacing, 1).identify_cycle_starts(&entries);
        for pair in starts.windows(2) {
            prop_assert!((pair[1] - pair[0]).num_days() >= spacing as i64);
        }
    }

    /// Property: every start is a logged period day.
    #[test]
    fn prop_starts_are_period_days(entries in entries_strategy()) {
        for start in identify_cycle_starts(&entries) {
            prop_assert!(entries.iter().any(|e| e.date == start && e.is_period));
        }
    }

    /// Property: the average lies between the shortest and longest cycle.
    #[test]
    fn prop_average_within_interval_bounds(entries in entries_strategy()) {
        let starts = identify_cycle_starts(&entries);
        match calculate_average_cycle_length(&starts) {
            None => prop_assert!(starts.len() < 2),
            Some(average) => {
                let intervals: Vec<u32> = starts
                    .windows(2)
                    .map(|p| (p[1] - p[0]).num_days() as u32)
                    .collect();
                prop_assert!(average >= *intervals.iter().min().unwrap());
                prop_assert!(average <= *intervals.iter().max().unwrap());
            }
        }
    }

    /// Property: every day of a cycle gets exactly one phase, and phases never
    /// go backwards within a cycle.
    #[test]
    fn prop_phases_cover_cycle_in_order(cycle_length in 21u32..=45, period_length in 2u32..=8) {
        let start = base_date();
        let mut previous = CyclePhase::Menstrual;
        for day in 1..=cycle_length {
            let date = start + Duration::days(day as i64 - 1);
            let reading = get_cycle_phase_for_date(date, Some(start), cycle_length, period_length);
            prop_assert!(reading.is_some());
            let reading = reading.unwrap();
            prop_assert_eq!(reading.cycle_day, day);
            prop_assert!(reading.phase >= previous);
            if day == 1 {
                prop_assert_eq!(reading.phase, CyclePhase::Menstrual);
            }
            previous = reading.phase;
        }
    }

    /// Property: days until the next period is the clamped calendar difference.
    #[test]
    fn prop_days_until_next_period_is_clamped(
        cycle_length in 21u32..=45,
        elapsed in 0i64..120,
    ) {
        let entries = vec![CycleEntry::period(base_date())];
        let today = base_date() + Duration::days(elapsed);
        let ctx = get_cycle_context(&entries, cycle_length, 5, today).unwrap();

        let expected = (ctx.next_period - today).num_days().max(0) as u32;
        prop_assert_eq!(ctx.days_until_next_period, expected);
        prop_assert!(ctx.days_until_next_period <= cycle_length);
    }
}
