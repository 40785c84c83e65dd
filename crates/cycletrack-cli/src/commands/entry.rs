//! Daily entry journaling commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use cycletrack_core::{
    CervicalMucus, CycleEntry, Database, EntrySource, FlowIntensity, PainLevel, Symptom,
};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log the entry for a day, replacing any existing one
    Log {
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Mark the day as a period day
        #[arg(long)]
        period: bool,
        /// Flow intensity: spotting, light, medium, heavy
        #[arg(long)]
        flow: Option<FlowIntensity>,
        /// Period pain: none, mild, moderate, severe
        #[arg(long)]
        pain: Option<PainLevel>,
        /// Symptom present on the day (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<Symptom>,
        /// Cervical mucus: dry, sticky, creamy, watery, egg_white
        #[arg(long)]
        mucus: Option<CervicalMucus>,
        /// Basal body temperature in °C
        #[arg(long)]
        temp: Option<f64>,
        /// Free-form note
        #[arg(long)]
        notes: Option<String>,
        /// Who recorded the entry: self_reported, practitioner, imported
        #[arg(long, default_value = "self_reported")]
        source: EntrySource,
    },
    /// List entries, oldest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the entry for a day
    Delete {
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Import entries from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

pub fn run(action: EntryAction, subject: &str) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EntryAction::Log {
            date,
            period,
            flow,
            pain,
            symptoms,
            mucus,
            temp,
            notes,
            source,
        } => {
            let entry = CycleEntry {
                date,
                is_period: period,
                flow_intensity: flow,
                period_pain: pain,
                symptoms: symptoms.into_iter().collect(),
                cervical_mucus: mucus,
                basal_temperature: temp,
                notes,
                source,
            };
            let db = Database::open()?;
            db.upsert_entry(subject, &entry)?;
            println!(
                "Logged {} for {}{}",
                date,
                subject,
                if period { " (period)" } else { "" }
            );
        }
        EntryAction::List { json } => {
            let db = Database::open()?;
            let entries = db.entries(subject)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries for {subject}");
            } else {
                for entry in &entries {
                    print_entry(entry);
                }
            }
        }
        EntryAction::Delete { date } => {
            let db = Database::open()?;
            if db.delete_entry(subject, date)? {
                println!("Deleted {date} for {subject}");
            } else {
                return Err(format!("no entry for {date}").into());
            }
        }
        EntryAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let mut entries: Vec<CycleEntry> = serde_json::from_str(&content)?;
            for entry in &mut entries {
                entry.source = EntrySource::Imported;
            }
            let mut db = Database::open()?;
            let count = db.upsert_entries(subject, &entries)?;
            println!("Imported {count} entries for {subject}");
        }
    }
    Ok(())
}

fn print_entry(entry: &CycleEntry) {
    let mut line = format!(
        "{}  {}",
        entry.date,
        if entry.is_period { "period" } else { "-     " }
    );
    if let Some(flow) = entry.flow_intensity {
        line.push_str(&format!("  flow={flow}"));
    }
    if let Some(pain) = entry.period_pain {
        line.push_str(&format!("  pain={pain}"));
    }
    let symptoms: Vec<&str> = entry.symptoms.present().iter().map(|s| s.as_str()).collect();
    if !symptoms.is_empty() {
        line.push_str(&format!("  symptoms={}", symptoms.join(",")));
    }
    if let Some(mucus) = entry.cervical_mucus {
        line.push_str(&format!("  mucus={mucus}"));
    }
    if let Some(temp) = entry.basal_temperature {
        line.push_str(&format!("  temp={temp:.2}"));
    }
    if let Some(ref notes) = entry.notes {
        line.push_str(&format!("  \"{notes}\""));
    }
    println!("{line}");
}
