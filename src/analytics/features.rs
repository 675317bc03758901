/// Rolling and lagged features over the ordered time series
///
/// Rolling means use a trailing window of rows (not calendar days) and need
/// only one sample, so the first rows of a series get a mean over fewer
/// values. Lags are by position: a row's lag is the previous logged day,
/// however many calendar days back that was.
///
/// Features are computed for any number of rows. Consumers that interpret
/// them statistically must check the row count themselves.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::timeseries::{Column, TimeSeries};
use crate::domain::HealthRecord;

/// Window size of the rolling means, in rows
pub const ROLLING_WINDOW: usize = 7;

/// Trailing mean over up to `window` values ending at each position
///
/// Missing values are skipped. A position whose window holds fewer than
/// `min_periods` present values gets None.
pub fn rolling_mean(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if present.is_empty() || present.len() < min_periods {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        })
        .collect()
}

/// Shift values down by `periods` rows; the first rows become None
pub fn lag(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| if i >= periods { values[i - periods] } else { None })
        .collect()
}

/// One row of the derived table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(flatten)]
    pub record: HealthRecord,
    pub severity_7d_avg: Option<f64>,
    pub stress_7d_avg: Option<f64>,
    pub stress_lag1: Option<f64>,
    pub sleep_lag1: Option<f64>,
    pub severity_lag1: Option<f64>,
}

impl DerivedRow {
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Severity7dAvg => self.severity_7d_avg,
            Column::Stress7dAvg => self.stress_7d_avg,
            Column::StressLag1 => self.stress_lag1,
            Column::SleepLag1 => self.sleep_lag1,
            Column::SeverityLag1 => self.severity_lag1,
            base => base.base_value(&self.record),
        }
    }
}

/// The ordered series extended with derived columns
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    rows: Vec<DerivedRow>,
}

impl DerivedTable {
    /// Derive rolling and lag features for every row of a series
    pub fn derive(series: &TimeSeries) -> Self {
        let severity = series.column(Column::SymptomSeverity);
        let stress = series.column(Column::StressLevel);
        let sleep = series.column(Column::SleepHours);

        let severity_avg = rolling_mean(&severity, ROLLING_WINDOW, 1);
        let stress_avg = rolling_mean(&stress, ROLLING_WINDOW, 1);
        let stress_lag = lag(&stress, 1);
        let sleep_lag = lag(&sleep, 1);
        let severity_lag = lag(&severity, 1);

        let rows = series
            .rows()
            .iter()
            .enumerate()
            .map(|(i, record)| DerivedRow {
                record: record.clone(),
                severity_7d_avg: severity_avg[i],
                stress_7d_avg: stress_avg[i],
                stress_lag1: stress_lag[i],
                sleep_lag1: sleep_lag[i],
                severity_lag1: severity_lag[i],
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&DerivedRow> {
        self.rows.last()
    }

    /// A column as an ordered vector, missing values kept as None
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.value(column)).collect()
    }

    /// A column is present when at least one row has a value for it
    pub fn has_column(&self, column: Column) -> bool {
        self.rows.iter().any(|row| row.value(column).is_some())
    }
}
