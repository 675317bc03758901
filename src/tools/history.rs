/// Tools for browsing and editing past entries
///
/// This module implements the journal_get, journal_history and
/// journal_delete MCP tools.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{
    bristol_description, severity_label, sleep_quality_label, stress_label, HealthRecord, SeverityBand,
};
use crate::storage::EntryStore;
use crate::tools::{date_param, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetEntryParams {
    /// Date of the entry (YYYY-MM-DD, optional - defaults to today)
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetEntryResponse {
    pub found: bool,
    pub message: String,
    pub entry: Option<HealthRecord>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HistoryParams {
    /// Maximum number of entries to show, newest first (optional - shows all if omitted)
    pub limit: Option<usize>,
}

/// One line of the history listing
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub date: NaiveDate,
    pub symptom_severity: Option<u8>,
    pub band: Option<SeverityBand>,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total_entries: usize,
    pub entries: Vec<HistoryItem>,
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteEntryParams {
    /// Date of the entry to delete (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
    pub message: String,
}

/// Render a record as a readable multi-line summary
pub fn describe_entry(record: &HealthRecord) -> String {
    let mut lines = vec![format!("📅 **{}**", record.date)];

    if let Some(severity) = record.symptom_severity {
        lines.push(format!(
            "{} Severity: {}/10 ({})",
            SeverityBand::from_severity(severity).indicator(),
            severity,
            severity_label(severity)
        ));
    }
    if !record.symptoms.is_empty() {
        let symptoms: Vec<&str> = record.symptoms.iter().map(String::as_str).collect();
        lines.push(format!("🩺 Symptoms: {}", symptoms.join(", ")));
    }
    if let Some(stool) = record.stool_type {
        lines.push(format!("🚽 Stool: {}", bristol_description(stool)));
    }
    if let Some(movements) = record.bowel_movements {
        lines.push(format!("   Bowel movements: {}", movements));
    }
    if let Some(stress) = record.stress_level {
        let context = record
            .stress_type
            .map(|t| format!(", {}", t.label()))
            .unwrap_or_default();
        lines.push(format!("🧠 Stress: {}/10 ({}{})", stress, stress_label(stress), context));
    }
    match (record.sleep_hours, record.sleep_quality) {
        (Some(hours), Some(quality)) => {
            lines.push(format!("😴 Sleep: {}h, quality {}/10 ({})", hours, quality, sleep_quality_label(quality)))
        }
        (Some(hours), None) => lines.push(format!("😴 Sleep: {}h", hours)),
        (None, Some(quality)) => {
            lines.push(format!("😴 Sleep quality: {}/10 ({})", quality, sleep_quality_label(quality)))
        }
        (None, None) => {}
    }
    if record.has_diet_notes() {
        lines.push(format!("🥗 Diet: {}", record.diet_notes.as_deref().unwrap_or_default()));
    }
    if let Some(speed) = record.meal_speed {
        lines.push(format!("   Eating speed: {}", speed.label()));
    }
    if let Some(water) = record.water_intake {
        lines.push(format!("💧 Water: {}L", water));
    }
    if let Some(minutes) = record.exercise {
        if minutes > 0 {
            lines.push(format!("🏃 Exercise: {} min", minutes));
        } else {
            lines.push("🏃 Exercise: none".to_string());
        }
    }

    lines.join("\n")
}

/// Fetch the entry for one date
pub fn get_entry<S: EntryStore + ?Sized>(
    store: &S,
    params: GetEntryParams,
    today: NaiveDate,
) -> Result<GetEntryResponse, ToolError> {
    let date = date_param(params.date.as_deref(), today)?;

    Ok(match store.get_entry(date) {
        Some(entry) => GetEntryResponse {
            found: true,
            message: describe_entry(&entry),
            entry: Some(entry),
        },
        None => GetEntryResponse {
            found: false,
            message: format!("No entry logged for {}.", date),
            entry: None,
        },
    })
}

/// List entries newest first
pub fn list_history<S: EntryStore + ?Sized>(store: &S, params: HistoryParams) -> Result<HistoryResponse, ToolError> {
    let collection = store.load();
    let limit = params.limit.unwrap_or(usize::MAX);

    let entries: Vec<HistoryItem> = collection
        .records()
        .rev()
        .take(limit)
        .map(|record| HistoryItem {
            date: record.date,
            symptom_severity: record.symptom_severity,
            band: record.symptom_severity.map(SeverityBand::from_severity),
            symptoms: record.symptoms.iter().cloned().collect(),
        })
        .collect();

    let message = if entries.is_empty() {
        "No history available. Log your first day to get started!".to_string()
    } else {
        let header = format!("📋 **History** ({} of {} entries)\n\n", entries.len(), collection.len());
        let lines = entries
            .iter()
            .map(|item| match (item.symptom_severity, item.band) {
                (Some(severity), Some(band)) => {
                    format!("{} {} - Severity: {}/10", band.indicator(), item.date, severity)
                }
                _ => format!("⚪ {} - Severity: not logged", item.date),
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}{}", header, lines)
    };

    Ok(HistoryResponse {
        total_entries: collection.len(),
        entries,
        message,
    })
}

/// Delete the entry for one date
///
/// A missing date is reported with `deleted: false` and leaves storage
/// untouched.
pub fn delete_entry<S: EntryStore + ?Sized>(
    store: &S,
    params: DeleteEntryParams,
    today: NaiveDate,
) -> Result<DeleteEntryResponse, ToolError> {
    let date = date_param(Some(&params.date), today)?;

    if !store.read_all()?.contains(&date) {
        return Ok(DeleteEntryResponse {
            deleted: false,
            message: format!("No entry found for {}. Nothing was deleted.", date),
        });
    }

    if !store.delete_entry(date) {
        return Err(ToolError::SaveFailed { date });
    }

    Ok(DeleteEntryResponse {
        deleted: true,
        message: format!("🗑️ Deleted entry for {}", date),
    })
}
