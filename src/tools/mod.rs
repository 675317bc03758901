/// MCP tools for the wellness journal
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to log days, browse history, run analytics and request AI
/// insights. Each tool is a plain function over an `EntryStore`.

pub mod log;
pub mod history;
pub mod analytics;
pub mod insights;
pub mod export;

// Re-export tool functions for easy access
pub use log::*;
pub use history::*;
pub use analytics::*;
pub use insights::*;
pub use export::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{parse_date_key, DomainError};
use crate::storage::StorageError;

/// Errors returned by tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to save entry for {date}. Check logs.")]
    SaveFailed { date: NaiveDate },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an optional `YYYY-MM-DD` parameter, defaulting to `today`
pub(crate) fn date_param(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ToolError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(s) => parse_date_key(s).ok_or_else(|| {
            DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)).into()
        }),
    }
}
