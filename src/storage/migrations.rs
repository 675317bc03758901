/// Database migration management
///
/// This module handles creating and updating the SQLite schema for the
/// tabular entry store.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables if they don't exist and records the
/// schema version for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // No version row yet

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)
            .map_err(|e| StorageError::Migration(format!("v1 failed: {}", e)))?;
    }

    Ok(())
}

/// Migration to version 1: the entries table
///
/// Columns carry no declared type so that cells keep whatever type they
/// were written with; decoding coerces them back into a record.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            date TEXT PRIMARY KEY,
            symptom_severity,
            symptoms,
            stool_type,
            bowel_movements,
            stress_level,
            stress_type,
            sleep_hours,
            sleep_quality,
            diet_notes,
            meal_speed,
            water_intake,
            exercise,
            timestamp
        )",
        [],
    )?;

    tracing::info!("Applied migration v1: Created entries table");
    Ok(())
}
