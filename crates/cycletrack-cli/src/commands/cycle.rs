//! Cycle phase, prediction and history commands.
//!
//! All output is JSON. Engine policy comes from the `[engine]` config section.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use cycletrack_core::cycle::most_recent_start;
use cycletrack_core::stats::symptom_patterns_with;
use cycletrack_core::{Config, CycleHistory, CycleProfile, Database};

use super::profile::load_profile;

#[derive(Subcommand)]
pub enum CycleAction {
    /// Current phase and next expected period
    Today {
        /// Reference day instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Every identified cycle with length statistics
    History,
    /// Symptom frequency per phase
    Patterns,
    /// Phase for an arbitrary day
    Phase {
        /// Day to classify (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Cycle start; defaults to the latest start in the journal
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Cycle length override (21-45)
        #[arg(long)]
        cycle_length: Option<u32>,
        /// Period length override (2-8)
        #[arg(long)]
        period_length: Option<u32>,
    },
}

pub fn run(
    action: CycleAction,
    subject: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let entries = db.entries(subject)?;
    let segmenter = config.engine.segmenter();
    let classifier = config.engine.classifier();

    match action {
        CycleAction::Today { date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let profile = load_profile(&db, subject, config)?.clamped();
            let status = profile.status_with(&segmenter, &classifier, &entries, today);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        CycleAction::History => {
            let history =
                CycleHistory::from_entries_with(&segmenter, &config.engine.stats_analyzer(), &entries);
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        CycleAction::Patterns => {
            let profile = load_profile(&db, subject, config)?.clamped();
            let starts = segmenter.identify_cycle_starts(&entries);
            let patterns = symptom_patterns_with(
                &classifier,
                &entries,
                &starts,
                profile.average_cycle_length,
                profile.average_period_length,
            );
            println!("{}", serde_json::to_string_pretty(&patterns)?);
        }
        CycleAction::Phase {
            date,
            start,
            cycle_length,
            period_length,
        } => {
            let saved = load_profile(&db, subject, config)?;
            let lengths = CycleProfile::new(
                Some(cycle_length.unwrap_or(saved.average_cycle_length)),
                Some(period_length.unwrap_or(saved.average_period_length)),
            )?;
            let start = match start {
                Some(start) => Some(start),
                None => most_recent_start(&segmenter.identify_cycle_starts(&entries), date),
            };
            let reading = classifier.classify(
                date,
                start,
                lengths.average_cycle_length,
                lengths.average_period_length,
            );
            println!("{}", serde_json::to_string_pretty(&reading)?);
        }
    }
    Ok(())
}
