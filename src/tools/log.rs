/// Tool for logging a day's observations
///
/// This module implements the journal_log MCP tool.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{severity_label, HealthRecord, MealSpeed, SeverityBand, StressType};
use crate::storage::EntryStore;
use crate::tools::{date_param, ToolError};

/// Parameters for logging a day
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LogEntryParams {
    /// Date of the entry (YYYY-MM-DD, optional - defaults to today)
    pub date: Option<String>,
    /// Overall symptom severity, 1-10
    pub symptom_severity: Option<u8>,
    /// Specific symptoms, e.g. "Bloating", "Abdominal Pain"
    pub symptoms: Option<Vec<String>>,
    /// Bristol stool type, 1-7
    pub stool_type: Option<u8>,
    /// Number of bowel movements
    pub bowel_movements: Option<u32>,
    /// Stress level, 1-10
    pub stress_level: Option<u8>,
    pub stress_type: Option<StressType>,
    /// Hours slept, 0-24
    pub sleep_hours: Option<f64>,
    /// Sleep quality, 1-10
    pub sleep_quality: Option<u8>,
    /// Meals eaten and suspected triggers
    pub diet_notes: Option<String>,
    pub meal_speed: Option<MealSpeed>,
    /// Water intake in litres
    pub water_intake: Option<f64>,
    /// Exercise in minutes (0 = none)
    pub exercise: Option<u32>,
    /// Keep fields of an existing entry that are not given here (default: false)
    pub merge: Option<bool>,
}

/// Response from logging a day
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub success: bool,
    pub message: String,
    pub date: NaiveDate,
    /// Whether an earlier entry for the date was overwritten
    pub replaced: bool,
    pub entry: HealthRecord,
}

fn apply(params: LogEntryParams, record: &mut HealthRecord) {
    if let Some(v) = params.symptom_severity { record.symptom_severity = Some(v); }
    if let Some(v) = params.stool_type { record.stool_type = Some(v); }
    if let Some(v) = params.bowel_movements { record.bowel_movements = Some(v); }
    if let Some(v) = params.stress_level { record.stress_level = Some(v); }
    if let Some(v) = params.stress_type { record.stress_type = Some(v); }
    if let Some(v) = params.sleep_hours { record.sleep_hours = Some(v); }
    if let Some(v) = params.sleep_quality { record.sleep_quality = Some(v); }
    if let Some(v) = params.diet_notes { record.diet_notes = Some(v); }
    if let Some(v) = params.meal_speed { record.meal_speed = Some(v); }
    if let Some(v) = params.water_intake { record.water_intake = Some(v); }
    if let Some(v) = params.exercise { record.exercise = Some(v); }

    if let Some(symptoms) = params.symptoms {
        record.symptoms = symptoms.into_iter().map(|s| s.trim().to_string()).collect();
    }
}

/// Save the entry for a date, overwriting whatever was logged before
pub fn log_entry<S: EntryStore + ?Sized>(
    store: &S,
    params: LogEntryParams,
    today: NaiveDate,
) -> Result<LogEntryResponse, ToolError> {
    let date = date_param(params.date.as_deref(), today)?;
    let existing = store.read_all()?.get(&date).cloned();

    let mut record = match (&existing, params.merge.unwrap_or(false)) {
        (Some(previous), true) => previous.clone(),
        _ => HealthRecord::new(date),
    };
    record.timestamp = Some(Utc::now());
    apply(params, &mut record);
    record.validate()?;

    if !store.save_entry(record.clone()) {
        return Err(ToolError::SaveFailed { date });
    }

    let mut message = format!("✅ Daily log saved for {}", date);
    if let Some(severity) = record.symptom_severity {
        message.push_str(&format!(
            "\n{} Severity: {}/10 ({})",
            SeverityBand::from_severity(severity).indicator(),
            severity,
            severity_label(severity)
        ));
    }
    if existing.is_some() {
        message.push_str("\n(Replaced the earlier entry for this date)");
    }

    Ok(LogEntryResponse {
        success: true,
        message,
        date,
        replaced: existing.is_some(),
        entry: record,
    })
}
