//! Database schema migrations for cycletrack.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {}", e);
        }
        0
    })
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: daily entries keyed by (subject, date) and per-subject profiles.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cycle_entries (
            subject           TEXT NOT NULL,
            date              TEXT NOT NULL,
            is_period         INTEGER NOT NULL DEFAULT 0,
            flow_intensity    TEXT,
            period_pain       TEXT,
            symptoms          TEXT NOT NULL DEFAULT '{}',
            cervical_mucus    TEXT,
            basal_temperature REAL,
            notes             TEXT,
            source            TEXT NOT NULL DEFAULT 'self_reported',
            updated_at        TEXT NOT NULL,
            PRIMARY KEY (subject, date)
        );

        CREATE TABLE IF NOT EXISTS cycle_profiles (
            subject               TEXT PRIMARY KEY,
            average_cycle_length  INTEGER NOT NULL,
            average_period_length INTEGER NOT NULL,
            is_tracking           INTEGER NOT NULL DEFAULT 1,
            cycle_regularity      TEXT,
            updated_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cycle_entries_subject_period
            ON cycle_entries(subject, is_period);",
    )?;

    set_schema_version(conn, 1)?;
    tracing::info!("Applied schema migration v1");
    Ok(())
}
