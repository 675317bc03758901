/// Domain module containing the health record model and its rules
///
/// This module defines the daily record, the date-keyed collection of records,
/// the categorical types and display labels, and the validation applied when
/// a user saves a log.

pub mod record;
pub mod collection;
pub mod types;
pub mod labels;
pub mod dates;
pub(crate) mod lenient;

// Re-export public types for easy access
pub use record::*;
pub use collection::*;
pub use types::*;
pub use labels::*;
pub use dates::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Weekly analysis accepts at most {max} records, got {got}")]
    TooManyRecords { max: usize, got: usize },
}
