/// JSON file implementation of the entry store
///
/// Records are kept in a single indented JSON object keyed by date:
/// `{"2024-06-01": {"symptom_severity": 7, ...}, ...}`. Every save rewrites
/// the whole file through a temporary file and an atomic rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::domain::{parse_date_key, EntryCollection, HealthRecord};
use crate::storage::{EntryStore, StorageError};

/// Encode a collection as indented, date-keyed JSON
///
/// This is also the JSON export format.
pub fn encode_collection(collection: &EntryCollection) -> Result<String, StorageError> {
    let mut object = Map::new();
    for record in collection.records() {
        object.insert(record.date.to_string(), serde_json::to_value(record)?);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(object))?)
}

/// Decode date-keyed JSON into a collection
///
/// The top level must be a JSON object. Individual entries whose key is not
/// a date, or whose body is not an object, are skipped with a warning. The
/// key always wins over a `date` field inside the body.
pub fn decode_collection(text: &str) -> Result<EntryCollection, StorageError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(object) = value else {
        return Err(StorageError::Corrupted("top-level JSON value is not an object".to_string()));
    };

    let mut collection = EntryCollection::new();
    for (key, body) in object {
        let Some(date) = parse_date_key(&key) else {
            tracing::warn!("Skipping entry with invalid date key: {}", key);
            continue;
        };
        let Value::Object(mut fields) = body else {
            tracing::warn!("Skipping entry for {}: not an object", key);
            continue;
        };
        fields.insert("date".to_string(), Value::String(key.clone()));

        match serde_json::from_value::<HealthRecord>(Value::Object(fields)) {
            Ok(mut record) => {
                record.date = date;
                collection.insert(record);
            }
            Err(e) => tracing::warn!("Skipping unreadable entry for {}: {}", key, e),
        }
    }

    Ok(collection)
}

/// File-backed store holding the whole collection as one JSON document
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open (or create) a JSON data file
    ///
    /// A missing file is created empty. A file that is not a JSON object is
    /// renamed to `.bak` and replaced with an empty collection.
    pub fn new(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self { path };
        store.ensure_data_file()?;

        tracing::info!("JSON storage initialized at: {:?}", store.path);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_data_file(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return self.write_all(&EntryCollection::new());
        }

        let text = fs::read_to_string(&self.path)?;
        if !matches!(serde_json::from_str::<Value>(&text), Ok(Value::Object(_))) {
            let backup = self.path.with_extension("bak");
            tracing::error!("Corrupted data file found. Backing up to {:?} and resetting.", backup);
            fs::rename(&self.path, &backup)?;
            self.write_all(&EntryCollection::new())?;
        }
        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn read_all(&self) -> Result<EntryCollection, StorageError> {
        let text = fs::read_to_string(&self.path)?;
        decode_collection(&text)
    }

    fn write_all(&self, collection: &EntryCollection) -> Result<(), StorageError> {
        let encoded = encode_collection(collection)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        tracing::debug!("Wrote {} entries to {:?}", collection.len(), self.path);
        Ok(())
    }
}
