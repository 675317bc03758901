/// Storage layer for persisting health records
///
/// This module defines the EntryStore contract and its two backends: a
/// date-keyed JSON file and a date-first SQLite table. Both persist the same
/// canonical HealthRecord through their own codec.

pub mod json_file;
pub mod sqlite;
pub mod migrations;
pub mod tabular;

// Re-export the main storage types
pub use json_file::*;
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{date_range, EntryCollection, HealthRecord};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace data file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Corrupted data: {0}")]
    Corrupted(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for health records
///
/// Backends only implement whole-collection reads and writes. Everything
/// else is load-modify-save on top of those, so a save racing a save from
/// another process is last-write-wins; there is no optimistic concurrency
/// check.
pub trait EntryStore {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Read the full collection, reporting failures
    fn read_all(&self) -> Result<EntryCollection, StorageError>;

    /// Replace the full collection, reporting failures
    fn write_all(&self, collection: &EntryCollection) -> Result<(), StorageError>;

    /// Load a snapshot of every record
    ///
    /// A failed read is logged and yields an empty collection.
    fn load(&self) -> EntryCollection {
        match self.read_all() {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("Failed to load entries from {} storage: {}. Returning empty.", self.backend_name(), e);
                EntryCollection::new()
            }
        }
    }

    /// Overwrite the stored collection; returns whether it succeeded
    fn save(&self, collection: &EntryCollection) -> bool {
        match self.write_all(collection) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save entries to {} storage: {}", self.backend_name(), e);
                false
            }
        }
    }

    /// Save a single day's record, replacing any existing one for that date
    ///
    /// Fails without writing when the stored collection cannot be read, so
    /// an unreadable file is never replaced by a one-entry collection.
    fn save_entry(&self, record: HealthRecord) -> bool {
        let mut collection = match self.read_all() {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("Not saving entry for {}: {} storage unreadable: {}", record.date, self.backend_name(), e);
                return false;
            }
        };
        tracing::info!("Saving entry for {} ({} storage)", record.date, self.backend_name());
        collection.insert(record);
        self.save(&collection)
    }

    /// Retrieve a specific day's record
    fn get_entry(&self, date: NaiveDate) -> Option<HealthRecord> {
        self.load().get(&date).cloned()
    }

    /// Records for the last `days` days ending at `today`
    fn get_date_range(&self, days: u32, today: NaiveDate) -> EntryCollection {
        self.load().subset(&date_range(days, today))
    }

    /// Remove a day's record
    ///
    /// Returns false, leaving storage untouched, when there is no record for
    /// that date or the stored collection cannot be read.
    fn delete_entry(&self, date: NaiveDate) -> bool {
        let mut collection = match self.read_all() {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("Not deleting entry for {}: {} storage unreadable: {}", date, self.backend_name(), e);
                return false;
            }
        };
        if collection.remove(&date).is_none() {
            return false;
        }
        tracing::info!("Deleted entry for {}", date);
        self.save(&collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn damaged_store() -> (TempDir, JsonFileStore, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        let store = JsonFileStore::new(path.clone()).unwrap();
        for d in 1..=5 {
            assert!(store.save_entry(HealthRecord::empty(day(d))));
        }

        // A stray comma from a bad hand edit
        let text = fs::read_to_string(&path).unwrap().replacen('{', "{,", 1);
        fs::write(&path, &text).unwrap();
        (dir, store, text)
    }

    #[test]
    fn test_save_entry_refuses_to_overwrite_unreadable_file() {
        let (_dir, store, damaged) = damaged_store();

        assert!(!store.save_entry(HealthRecord::empty(day(6))));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), damaged);
    }

    #[test]
    fn test_delete_entry_leaves_unreadable_file_alone() {
        let (_dir, store, damaged) = damaged_store();

        assert!(!store.delete_entry(day(2)));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), damaged);
    }

    #[test]
    fn test_save_entry_adds_to_existing_records() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.save_entry(HealthRecord::empty(day(1))));
        assert!(store.save_entry(HealthRecord::empty(day(2))));

        assert_eq!(store.load().len(), 2);
    }
}
