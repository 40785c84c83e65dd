//! SQLite-based entry and profile storage.
//!
//! Provides persistent storage for:
//! - Daily cycle entries, one per (subject, date); writes are upserts and the
//!   last write wins
//! - Per-subject cycle profiles
//!
//! The engine never touches this module; callers load a consistent entry
//! snapshot here and pass it to the pure functions in [`crate::cycle`].

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, migrations};
use crate::cycle::CycleSegmenter;
use crate::entry::{
    CervicalMucus, CycleEntry, EntrySource, FlowIntensity, PainLevel, Symptoms,
};
use crate::error::{DatabaseError, Result};
use crate::profile::{CycleProfile, CycleRegularity};
use crate::stats::CycleStatsAnalyzer;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw column values of one `cycle_entries` row.
struct EntryRow {
    date: String,
    is_period: bool,
    flow_intensity: Option<String>,
    period_pain: Option<String>,
    symptoms: String,
    cervical_mucus: Option<String>,
    basal_temperature: Option<f64>,
    notes: Option<String>,
    source: String,
}

impl EntryRow {
    fn decode(self) -> Result<CycleEntry, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            table: "cycle_entries".to_string(),
            message,
        };

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("date '{}': {}", self.date, e)))?;
        let symptoms: Symptoms = serde_json::from_str(&self.symptoms)
            .map_err(|e| corrupt(format!("symptoms on {}: {}", self.date, e)))?;

        Ok(CycleEntry {
            date,
            is_period: self.is_period,
            flow_intensity: self
                .flow_intensity
                .map(|s| s.parse::<FlowIntensity>())
                .transpose()
                .map_err(corrupt)?,
            period_pain: self
                .period_pain
                .map(|s| s.parse::<PainLevel>())
                .transpose()
                .map_err(corrupt)?,
            symptoms,
            cervical_mucus: self
                .cervical_mucus
                .map(|s| s.parse::<CervicalMucus>())
                .transpose()
                .map_err(corrupt)?,
            basal_temperature: self.basal_temperature,
            notes: self.notes,
            source: self.source.parse::<EntrySource>().map_err(corrupt)?,
        })
    }
}

/// SQLite database for cycle entries and profiles.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/cycletrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("cycletrack.db"))
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Insert or replace the entry for (`subject`, `entry.date`).
    ///
    /// # Errors
    /// Returns a validation error for an implausible entry, or a database
    /// error if the write fails.
    pub fn upsert_entry(&self, subject: &str, entry: &CycleEntry) -> Result<()> {
        write_entry(&self.conn, subject, entry)?;
        tracing::debug!("Upserted entry {} for subject {}", entry.date, subject);
        Ok(())
    }

    /// Upsert many entries in one transaction.
    ///
    /// # Errors
    /// Returns an error if any entry is invalid or any write fails; nothing
    /// is written in that case.
    pub fn upsert_entries(&mut self, subject: &str, entries: &[CycleEntry]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for entry in entries {
            write_entry(&tx, subject, entry)?;
        }
        tx.commit()?;
        tracing::info!("Imported {} entries for subject {}", entries.len(), subject);
        Ok(entries.len())
    }

    /// All entries for `subject`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn entries(&self, subject: &str) -> Result<Vec<CycleEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, is_period, flow_intensity, period_pain, symptoms,
                    cervical_mucus, basal_temperature, notes, source
             FROM cycle_entries
             WHERE subject = ?1
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![subject], read_entry_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.decode()?);
        }
        Ok(entries)
    }

    /// The entry for (`subject`, `date`), if any.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_entry(&self, subject: &str, date: NaiveDate) -> Result<Option<CycleEntry>> {
        let row = self
            .conn
            .query_row(
                "SELECT date, is_period, flow_intensity, period_pain, symptoms,
                        cervical_mucus, basal_temperature, notes, source
                 FROM cycle_entries
                 WHERE subject = ?1 AND date = ?2",
                params![subject, date.format(DATE_FORMAT).to_string()],
                read_entry_row,
            )
            .optional()?;
        Ok(row.map(EntryRow::decode).transpose()?)
    }

    /// Delete the entry for (`subject`, `date`). Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_entry(&self, subject: &str, date: NaiveDate) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM cycle_entries WHERE subject = ?1 AND date = ?2",
            params![subject, date.format(DATE_FORMAT).to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Subjects with at least one entry or a saved profile.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn subjects(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject FROM cycle_entries
             UNION
             SELECT subject FROM cycle_profiles
             ORDER BY subject",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut subjects = Vec::new();
        for row in rows {
            subjects.push(row?);
        }
        Ok(subjects)
    }

    /// The saved profile for `subject`, if any.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn find_profile(&self, subject: &str) -> Result<Option<CycleProfile>> {
        let row = self
            .conn
            .query_row(
                "SELECT average_cycle_length, average_period_length, is_tracking, cycle_regularity
                 FROM cycle_profiles WHERE subject = ?1",
                params![subject],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((cycle_length, period_length, is_tracking, regularity)) = row else {
            return Ok(None);
        };
        let cycle_regularity = regularity
            .map(|s| s.parse::<CycleRegularity>())
            .transpose()
            .map_err(|message| DatabaseError::CorruptRow {
                table: "cycle_profiles".to_string(),
                message,
            })?;

        Ok(Some(CycleProfile {
            average_cycle_length: cycle_length,
            average_period_length: period_length,
            is_tracking,
            cycle_regularity,
        }))
    }

    /// The saved profile for `subject`, or the default 28/5 profile.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_profile(&self, subject: &str) -> Result<CycleProfile> {
        Ok(self.find_profile(subject)?.unwrap_or_default())
    }

    /// Validate and save the profile for `subject`.
    ///
    /// # Errors
    /// Returns a validation error for out-of-range lengths, or a database
    /// error if the write fails.
    pub fn save_profile(&self, subject: &str, profile: &CycleProfile) -> Result<()> {
        profile.validate()?;
        self.conn.execute(
            "INSERT INTO cycle_profiles (
                subject, average_cycle_length, average_period_length,
                is_tracking, cycle_regularity, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(subject) DO UPDATE SET
                average_cycle_length = excluded.average_cycle_length,
                average_period_length = excluded.average_period_length,
                is_tracking = excluded.is_tracking,
                cycle_regularity = excluded.cycle_regularity,
                updated_at = excluded.updated_at",
            params![
                subject,
                profile.average_cycle_length,
                profile.average_period_length,
                profile.is_tracking,
                profile.cycle_regularity.map(|r| r.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        tracing::info!(
            "Saved profile for {}: cycle {}d, period {}d, tracking {}",
            subject,
            profile.average_cycle_length,
            profile.average_period_length,
            profile.is_tracking
        );
        Ok(())
    }

    /// Recompute the cached regularity for `subject` from its entries and
    /// save it. Returns the updated profile.
    ///
    /// # Errors
    /// Returns an error if loading or saving fails.
    pub fn refresh_regularity(
        &self,
        subject: &str,
        segmenter: &CycleSegmenter,
        analyzer: &CycleStatsAnalyzer,
        fallback: &CycleProfile,
    ) -> Result<CycleProfile> {
        let entries = self.entries(subject)?;
        let starts = segmenter.identify_cycle_starts(&entries);
        let intervals = crate::stats::cycle_intervals(&starts);

        let mut profile = self
            .find_profile(subject)?
            .unwrap_or_else(|| fallback.clone());
        profile.cycle_regularity = analyzer.classify_regularity(&intervals);
        self.save_profile(subject, &profile)?;
        Ok(profile)
    }
}

fn write_entry(conn: &Connection, subject: &str, entry: &CycleEntry) -> Result<()> {
    entry.validate()?;
    let symptoms = serde_json::to_string(&entry.symptoms)?;
    conn.execute(
        "INSERT INTO cycle_entries (
            subject, date, is_period, flow_intensity, period_pain, symptoms,
            cervical_mucus, basal_temperature, notes, source, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(subject, date) DO UPDATE SET
            is_period = excluded.is_period,
            flow_intensity = excluded.flow_intensity,
            period_pain = excluded.period_pain,
            symptoms = excluded.symptoms,
            cervical_mucus = excluded.cervical_mucus,
            basal_temperature = excluded.basal_temperature,
            notes = excluded.notes,
            source = excluded.source,
            updated_at = excluded.updated_at",
        params![
            subject,
            entry.date.format(DATE_FORMAT).to_string(),
            entry.is_period,
            entry.flow_intensity.map(|f| f.as_str()),
            entry.period_pain.map(|p| p.as_str()),
            symptoms,
            entry.cervical_mucus.map(|m| m.as_str()),
            entry.basal_temperature,
            entry.notes,
            entry.source.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn read_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        date: row.get(0)?,
        is_period: row.get(1)?,
        flow_intensity: row.get(2)?,
        period_pain: row.get(3)?,
        symptoms: row.get(4)?,
        cervical_mucus: row.get(5)?,
        basal_temperature: row.get(6)?,
        notes: row.get(7)?,
        source: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Symptom;
    use crate::error::CoreError;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_upsert_and_read_back() {
        let db = Database::open_memory().unwrap();
        let mut entry = CycleEntry::period(d("2024-01-01"))
            .with_flow(FlowIntensity::Heavy)
            .with_symptom(Symptom::Cramps);
        entry.period_pain = Some(PainLevel::Moderate);
        entry.basal_temperature = Some(36.4);
        entry.notes = Some("first day".to_string());
        db.upsert_entry("alice", &entry).unwrap();

        let stored = db.get_entry("alice", d("2024-01-01")).unwrap().unwrap();
        assert_eq!(stored, entry);
        assert!(db.get_entry("bob", d("2024-01-01")).unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let db = Database::open_memory().unwrap();
        db.upsert_entry("alice", &CycleEntry::period(d("2024-01-01"))).unwrap();
        db.upsert_entry("alice", &CycleEntry::new(d("2024-01-01"))).unwrap();

        let entries = db.entries("alice").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_period);
    }

    #[test]
    fn test_entries_are_sorted_and_scoped_by_subject() {
        let mut db = Database::open_memory().unwrap();
        db.upsert_entries(
            "alice",
            &[
                CycleEntry::period(d("2024-01-03")),
                CycleEntry::period(d("2024-01-01")),
            ],
        )
        .unwrap();
        db.upsert_entry("bob", &CycleEntry::period(d("2024-01-02"))).unwrap();

        let dates: Vec<_> = db.entries("alice").unwrap().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d("2024-01-01"), d("2024-01-03")]);
        assert_eq!(db.subjects().unwrap(), vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_delete_entry() {
        let db = Database::open_memory().unwrap();
        db.upsert_entry("alice", &CycleEntry::period(d("2024-01-01"))).unwrap();
        assert!(db.delete_entry("alice", d("2024-01-01")).unwrap());
        assert!(!db.delete_entry("alice", d("2024-01-01")).unwrap());
        assert!(db.entries("alice").unwrap().is_empty());
    }

    #[test]
    fn test_profile_defaults_and_save() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.find_profile("alice").unwrap(), None);
        assert_eq!(db.get_profile("alice").unwrap(), CycleProfile::default());

        let profile = CycleProfile {
            average_cycle_length: 31,
            average_period_length: 4,
            is_tracking: false,
            cycle_regularity: Some(CycleRegularity::Irregular),
        };
        db.save_profile("alice", &profile).unwrap();
        assert_eq!(db.get_profile("alice").unwrap(), profile);
    }

    #[test]
    fn test_save_profile_rejects_out_of_range() {
        let db = Database::open_memory().unwrap();
        let profile = CycleProfile {
            average_cycle_length: 14,
            ..CycleProfile::default()
        };
        let err = db.save_profile("alice", &profile).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(db.find_profile("alice").unwrap(), None);
    }

    #[test]
    fn test_refresh_regularity() {
        let db = Database::open_memory().unwrap();
        for start in ["2024-01-01", "2024-01-29", "2024-02-26"] {
            db.upsert_entry("alice", &CycleEntry::period(d(start))).unwrap();
        }
        let profile = db
            .refresh_regularity(
                "alice",
                &CycleSegmenter::default(),
                &CycleStatsAnalyzer::default(),
                &CycleProfile::default(),
            )
            .unwrap();
        assert_eq!(profile.cycle_regularity, Some(CycleRegularity::Regular));
        assert_eq!(
            db.get_profile("alice").unwrap().cycle_regularity,
            Some(CycleRegularity::Regular)
        );
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO cycle_entries (subject, date, symptoms, updated_at)
                 VALUES ('alice', 'not-a-date', '{}', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let err = db.entries("alice").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::CorruptRow { .. })
        ));
    }
}
