/// HealthRecord entity for one day of observations
///
/// This module defines the HealthRecord struct: everything the user logged
/// for a single calendar day. Every observation is optional so that a value
/// that was never entered (or could not be read back from storage) is
/// distinguishable from a real zero.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{lenient, DomainError, MealSpeed, StressType};

/// A record of one calendar day's symptoms, sleep, stress and diet
///
/// The date is the unique key of the record inside an EntryCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Which day this record describes
    #[serde(deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    /// Overall symptom severity, 1-10
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub symptom_severity: Option<u8>,
    /// Specific symptoms experienced (e.g. "Bloating")
    #[serde(default, deserialize_with = "lenient::symptoms")]
    pub symptoms: BTreeSet<String>,
    /// Bristol stool scale category, 1-7
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub stool_type: Option<u8>,
    /// Number of bowel movements
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub bowel_movements: Option<u32>,
    /// Stress level, 1-10
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<u8>,
    #[serde(default, deserialize_with = "lenient::opt_stress_type", skip_serializing_if = "Option::is_none")]
    pub stress_type: Option<StressType>,
    /// Hours slept the night before
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// Sleep quality, 1-10
    #[serde(default, deserialize_with = "lenient::opt_u8", skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
    /// Free-text notes about meals and possible triggers
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub diet_notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_meal_speed", skip_serializing_if = "Option::is_none")]
    pub meal_speed: Option<MealSpeed>,
    /// Water intake in litres
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<f64>,
    /// Minutes of exercise (0 means none)
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub exercise: Option<u32>,
    /// When the record was created; informational only
    #[serde(default, deserialize_with = "lenient::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthRecord {
    /// Create an empty record for a day, stamped with the current time
    pub fn new(date: NaiveDate) -> Self {
        Self {
            timestamp: Some(Utc::now()),
            ..Self::empty(date)
        }
    }

    /// Create a record with no observations and no timestamp
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            symptom_severity: None,
            symptoms: BTreeSet::new(),
            stool_type: None,
            bowel_movements: None,
            stress_level: None,
            stress_type: None,
            sleep_hours: None,
            sleep_quality: None,
            diet_notes: None,
            meal_speed: None,
            water_intake: None,
            exercise: None,
            timestamp: None,
        }
    }

    /// Check if this record has diet notes worth showing
    pub fn has_diet_notes(&self) -> bool {
        self.diet_notes
            .as_deref()
            .map(|notes| !notes.trim().is_empty())
            .unwrap_or(false)
    }

    /// Validate a record before it is saved
    ///
    /// Records read back from storage are not re-validated; this is only
    /// applied on the user-facing save path.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_range("symptom_severity", self.symptom_severity, 1, 10)?;
        validate_range("stool_type", self.stool_type, 1, 7)?;
        validate_range("stress_level", self.stress_level, 1, 10)?;
        validate_range("sleep_quality", self.sleep_quality, 1, 10)?;
        validate_range("bowel_movements", self.bowel_movements, 0, 50)?;
        validate_range("exercise", self.exercise, 0, 24 * 60)?;
        validate_real("sleep_hours", self.sleep_hours, 24.0)?;
        validate_real("water_intake", self.water_intake, 10.0)?;
        Self::validate_symptoms(&self.symptoms)?;
        Self::validate_diet_notes(&self.diet_notes)?;
        Ok(())
    }

    fn validate_symptoms(symptoms: &BTreeSet<String>) -> Result<(), DomainError> {
        for label in symptoms {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return Err(DomainError::InvalidValue {
                    field: "symptoms",
                    message: "Symptom labels cannot be empty".to_string(),
                });
            }
            if trimmed.chars().count() > 100 {
                return Err(DomainError::InvalidValue {
                    field: "symptoms",
                    message: "Symptom labels cannot be longer than 100 characters".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_diet_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = notes {
            if text.chars().count() > 2000 {
                return Err(DomainError::InvalidValue {
                    field: "diet_notes",
                    message: "Diet notes cannot be longer than 2000 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn validate_range<T>(field: &'static str, value: Option<T>, min: T, max: T) -> Result<(), DomainError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    match value {
        Some(v) if v < min || v > max => Err(DomainError::InvalidValue {
            field,
            message: format!("must be between {} and {}, got {}", min, max, v),
        }),
        _ => Ok(()),
    }
}

fn validate_real(field: &'static str, value: Option<f64>, max: f64) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 || v > max => Err(DomainError::InvalidValue {
            field,
            message: format!("must be between 0 and {}, got {}", max, v),
        }),
        _ => Ok(()),
    }
}
