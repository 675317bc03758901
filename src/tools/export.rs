/// Tool for exporting the journal
///
/// This module implements the journal_export MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::json_file::encode_collection;
use crate::storage::tabular::to_csv;
use crate::storage::EntryStore;
use crate::tools::ToolError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// Export format: 'csv' or 'json' (optional, defaults to 'csv')
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub format: ExportFormat,
    pub entries: usize,
    pub content: String,
}

/// Export every entry as CSV or date-keyed JSON
pub fn export_entries<S: EntryStore + ?Sized>(store: &S, params: ExportParams) -> Result<ExportResponse, ToolError> {
    let collection = store.load();
    let format = params.format.unwrap_or_default();

    let content = match format {
        ExportFormat::Csv => to_csv(&collection),
        ExportFormat::Json => encode_collection(&collection)?,
    };

    tracing::debug!("Exported {} entries as {:?}", collection.len(), format);

    Ok(ExportResponse {
        format,
        entries: collection.len(),
        content,
    })
}
