/// Time-series construction from the date-keyed collection
///
/// Turns the sparse date→record mapping into rows ordered by date. Dates that
/// were never logged are not synthesized, so consecutive rows may be several
/// calendar days apart.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::domain::{EntryCollection, HealthRecord};

/// A numeric column of the analytics table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SymptomSeverity,
    StoolType,
    BowelMovements,
    StressLevel,
    SleepHours,
    SleepQuality,
    WaterIntake,
    Exercise,
    /// Trailing 7-row mean of symptom severity
    Severity7dAvg,
    /// Trailing 7-row mean of stress level
    Stress7dAvg,
    /// Previous row's stress level
    StressLag1,
    /// Previous row's sleep hours
    SleepLag1,
    /// Previous row's symptom severity
    SeverityLag1,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::SymptomSeverity,
        Column::StoolType,
        Column::BowelMovements,
        Column::StressLevel,
        Column::SleepHours,
        Column::SleepQuality,
        Column::WaterIntake,
        Column::Exercise,
        Column::Severity7dAvg,
        Column::Stress7dAvg,
        Column::StressLag1,
        Column::SleepLag1,
        Column::SeverityLag1,
    ];

    /// Column name, matching the record field for base columns
    pub fn name(&self) -> &'static str {
        match self {
            Column::SymptomSeverity => "symptom_severity",
            Column::StoolType => "stool_type",
            Column::BowelMovements => "bowel_movements",
            Column::StressLevel => "stress_level",
            Column::SleepHours => "sleep_hours",
            Column::SleepQuality => "sleep_quality",
            Column::WaterIntake => "water_intake",
            Column::Exercise => "exercise",
            Column::Severity7dAvg => "severity_7d_avg",
            Column::Stress7dAvg => "stress_7d_avg",
            Column::StressLag1 => "stress_lag1",
            Column::SleepLag1 => "sleep_lag1",
            Column::SeverityLag1 => "severity_lag1",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL.iter().copied().find(|c| c.name() == wanted)
    }

    /// Whether this column is computed by the feature deriver
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Column::Severity7dAvg
                | Column::Stress7dAvg
                | Column::StressLag1
                | Column::SleepLag1
                | Column::SeverityLag1
        )
    }

    /// Value of a base column in a record; derived columns are always None here
    pub fn base_value(&self, record: &HealthRecord) -> Option<f64> {
        match self {
            Column::SymptomSeverity => record.symptom_severity.map(f64::from),
            Column::StoolType => record.stool_type.map(f64::from),
            Column::BowelMovements => record.bowel_movements.map(f64::from),
            Column::StressLevel => record.stress_level.map(f64::from),
            Column::SleepHours => record.sleep_hours,
            Column::SleepQuality => record.sleep_quality.map(f64::from),
            Column::WaterIntake => record.water_intake,
            Column::Exercise => record.exercise.map(f64::from),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Records ordered ascending by date
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    rows: Vec<HealthRecord>,
}

impl TimeSeries {
    /// Build the ordered series from a collection
    pub fn build(collection: &EntryCollection) -> Self {
        let mut rows: Vec<HealthRecord> = collection.records().cloned().collect();
        rows.sort_by_key(|record| record.date);
        Self { rows }
    }

    /// True when the collection had no entries; a valid terminal state
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[HealthRecord] {
        &self.rows
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// A base column as an ordered vector, missing values kept as None
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| column.base_value(r)).collect()
    }
}
