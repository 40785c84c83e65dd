//! Symptom frequency by cycle phase.
//!
//! Each logged day is placed in the cycle that contains it and classified into
//! a phase; present symptoms are then tallied per phase. Days before the first
//! known cycle start carry no phase and are skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cycle::{most_recent_start, CyclePhase, PhaseClassifier};
use crate::entry::{CycleEntry, Symptom};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCount {
    pub symptom: Symptom,
    pub count: u32,
    /// Share of logged days in the phase with this symptom (0.0 to 1.0)
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSymptoms {
    pub phase: CyclePhase,
    pub days_logged: u32,
    /// Most frequent first
    pub symptoms: Vec<SymptomCount>,
}

/// Symptom tallies per phase, in phase order. Phases with no logged days are
/// omitted.
pub fn symptom_patterns(
    entries: &[CycleEntry],
    starts: &[NaiveDate],
    cycle_length: u32,
    period_length: u32,
) -> Vec<PhaseSymptoms> {
    symptom_patterns_with(
        &PhaseClassifier::default(),
        entries,
        starts,
        cycle_length,
        period_length,
    )
}

pub fn symptom_patterns_with(
    classifier: &PhaseClassifier,
    entries: &[CycleEntry],
    starts: &[NaiveDate],
    cycle_length: u32,
    period_length: u32,
) -> Vec<PhaseSymptoms> {
    let mut days: BTreeMap<CyclePhase, u32> = BTreeMap::new();
    let mut tallies: BTreeMap<CyclePhase, BTreeMap<Symptom, u32>> = BTreeMap::new();

    for entry in entries {
        let start = most_recent_start(starts, entry.date);
        let Some(reading) = classifier.classify(entry.date, start, cycle_length, period_length)
        else {
            continue;
        };

        *days.entry(reading.phase).or_insert(0) += 1;
        let phase_tally = tallies.entry(reading.phase).or_default();
        for symptom in entry.symptoms.present() {
            *phase_tally.entry(symptom).or_insert(0) += 1;
        }
    }

    days.into_iter()
        .map(|(phase, days_logged)| {
            let mut symptoms: Vec<SymptomCount> = tallies
                .remove(&phase)
                .unwrap_or_default()
                .into_iter()
                .map(|(symptom, count)| SymptomCount {
                    symptom,
                    count,
                    rate: count as f64 / days_logged as f64,
                })
                .collect();
            symptoms.sort_by(|a, b| b.count.cmp(&a.count).then(a.symptom.cmp(&b.symptom)));
            PhaseSymptoms {
                phase,
                days_logged,
                symptoms,
            }
        })
        .collect()
}
