/// Runtime configuration
///
/// `main` parses command-line flags and environment into an `AppConfig`,
/// which then builds the store and the insight requester. Nothing reads the
/// environment after startup.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::insights::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::storage::{EntryStore, JsonFileStore, SqliteStore, StorageError};

/// Which backend persists the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Date-keyed JSON document
    Json,
    /// Date-first SQLite table
    Sqlite,
}

impl StorageBackend {
    /// File name used when no data file is given
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StorageBackend::Json => "ibs_data.json",
            StorageBackend::Sqlite => "ibs_data.db",
        }
    }
}

/// Settings for the language-model client
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub backend: StorageBackend,
    pub insights: InsightConfig,
}

impl AppConfig {
    /// Open the configured store, creating its file if needed
    pub fn open_store(&self) -> Result<Box<dyn EntryStore>, StorageError> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store: Box<dyn EntryStore> = match self.backend {
            StorageBackend::Json => Box::new(JsonFileStore::new(self.data_file.clone())?),
            StorageBackend::Sqlite => Box::new(SqliteStore::new(self.data_file.clone())?),
        };
        Ok(store)
    }
}

/// Find a writable directory for the journal
///
/// Tries the home directory, then the platform data and config
/// directories, then the working directory, and finally the temp directory.
pub fn default_data_dir() -> PathBuf {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".wellness_journal")),
        dirs::data_dir().map(|p| p.join("wellness_journal")),
        dirs::config_dir().map(|p| p.join("wellness_journal")),
        std::env::current_dir().ok().map(|p| p.join(".wellness_journal")),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return dir.clone();
        }
    }

    let fallback = std::env::temp_dir().join("wellness_journal");
    tracing::warn!("Using temporary directory for journal data: {}", fallback.display());
    fallback
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".test_write");
    if std::fs::write(&probe, "test").is_ok() {
        let _ = std::fs::remove_file(&probe);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_store_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_file: dir.path().join("nested").join("journal.json"),
            backend: StorageBackend::Json,
            insights: InsightConfig::default(),
        };

        let store = config.open_store().unwrap();
        assert_eq!(store.backend_name(), "json");
        assert!(config.data_file.exists());
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_file: dir.path().join("journal.db"),
            backend: StorageBackend::Sqlite,
            insights: InsightConfig::default(),
        };

        let store = config.open_store().unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_insight_defaults() {
        let config = InsightConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.max_tokens, 1000);
        assert!(config.api_key.is_none());
    }
}
