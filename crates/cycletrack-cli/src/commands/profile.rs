//! Cycle profile commands.
//!
//! A subject without a saved profile uses the `[defaults]` section of the
//! config.

use clap::Subcommand;
use cycletrack_core::{Config, CycleProfile, Database};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the subject's profile
    Show,
    /// Update the subject's profile and recompute regularity
    Set {
        /// Average cycle length in days (21-45)
        #[arg(long)]
        cycle_length: Option<u32>,
        /// Average period length in days (2-8)
        #[arg(long)]
        period_length: Option<u32>,
        /// Whether cycle tracking is on
        #[arg(long)]
        tracking: Option<bool>,
    },
}

pub fn run(
    action: ProfileAction,
    subject: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProfileAction::Show => {
            let profile = load_profile(&db, subject, config)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Set {
            cycle_length,
            period_length,
            tracking,
        } => {
            let current = load_profile(&db, subject, config)?;
            let updated = CycleProfile {
                average_cycle_length: cycle_length.unwrap_or(current.average_cycle_length),
                average_period_length: period_length.unwrap_or(current.average_period_length),
                is_tracking: tracking.unwrap_or(current.is_tracking),
                ..current
            };
            db.save_profile(subject, &updated)?;

            let profile = db.refresh_regularity(
                subject,
                &config.engine.segmenter(),
                &config.engine.stats_analyzer(),
                &updated,
            )?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}

/// Saved profile for `subject`, or one built from config defaults.
pub fn load_profile(
    db: &Database,
    subject: &str,
    config: &Config,
) -> Result<CycleProfile, Box<dyn std::error::Error>> {
    Ok(db
        .find_profile(subject)?
        .unwrap_or_else(|| config.defaults.profile()))
}
