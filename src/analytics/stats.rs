/// Aggregate statistics and correlations
///
/// Every operation here is a pure function of a snapshot. Correlations are
/// plain Pearson coefficients over pairwise-complete rows. Operations that
/// need a minimum amount of data report `StatOutcome::InsufficientData`
/// instead of returning a degenerate number.

use std::fmt;

use serde::Serialize;

use crate::analytics::features::DerivedTable;
use crate::analytics::timeseries::Column;
use crate::domain::EntryCollection;

/// Rows required before correlations or trends are reported
pub const MIN_ROWS: usize = 3;

/// Columns required for a correlation matrix
pub const MIN_MATRIX_COLUMNS: usize = 2;

/// Columns of the default correlation matrix
pub const DEFAULT_MATRIX_COLUMNS: [Column; 5] = [
    Column::SymptomSeverity,
    Column::SleepHours,
    Column::SleepQuality,
    Column::StressLevel,
    Column::Exercise,
];

/// Why a statistic could not be computed yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InsufficientData {
    TooFewRows { rows: usize, required: usize },
    TooFewColumns { valid: usize, required: usize },
    NoComputableValue,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientData::TooFewRows { rows, required } => {
                write!(f, "Needs more data: {} of {} days logged", rows, required)
            }
            InsufficientData::TooFewColumns { valid, required } => {
                write!(f, "Not enough metrics recorded ({} of {})", valid, required)
            }
            InsufficientData::NoComputableValue => write!(f, "Not enough matched data yet"),
        }
    }
}

/// Result of a statistic that may not be computable yet
///
/// Insufficient data is an expected state for a new journal, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum StatOutcome<T> {
    Computed(T),
    InsufficientData(InsufficientData),
}

impl<T> StatOutcome<T> {
    pub fn is_computed(&self) -> bool {
        matches!(self, StatOutcome::Computed(_))
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            StatOutcome::Computed(value) => Some(value),
            StatOutcome::InsufficientData(_) => None,
        }
    }
}

/// Mean severity, sleep and stress over all records
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub avg_severity: f64,
    pub avg_sleep: f64,
    pub avg_stress: f64,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            avg_severity: 0.0,
            avg_sleep: 0.0,
            avg_stress: 0.0,
        }
    }
}

/// Round to one decimal place for display
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean_present<I: Iterator<Item = Option<f64>>>(values: I) -> f64 {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Average severity, sleep hours and stress level, one decimal
///
/// Each mean only counts records where that field is present. An empty
/// collection, or a field nobody recorded, gives 0.0.
pub fn aggregate_stats(collection: &EntryCollection) -> AggregateStats {
    if collection.is_empty() {
        return AggregateStats::default();
    }

    let avg_severity = mean_present(collection.records().map(|r| r.symptom_severity.map(f64::from)));
    let avg_sleep = mean_present(collection.records().map(|r| r.sleep_hours));
    let avg_stress = mean_present(collection.records().map(|r| r.stress_level.map(f64::from)));

    AggregateStats {
        avg_severity: round1(avg_severity),
        avg_sleep: round1(avg_sleep),
        avg_stress: round1(avg_stress),
    }
}

/// Pearson correlation over the rows where both values are present
///
/// Returns None with fewer than two complete pairs or when either side has
/// zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < 1e-12 {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise correlations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`; None when undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

/// Pairwise-complete correlation matrix over the requested columns
///
/// Columns with no values at all are dropped. Needs at least three rows and
/// two remaining columns.
pub fn correlation_matrix(table: &DerivedTable, columns: &[Column]) -> StatOutcome<CorrelationMatrix> {
    if table.len() < MIN_ROWS {
        return StatOutcome::InsufficientData(InsufficientData::TooFewRows {
            rows: table.len(),
            required: MIN_ROWS,
        });
    }

    let mut valid: Vec<Column> = Vec::new();
    for column in columns {
        if table.has_column(*column) && !valid.contains(column) {
            valid.push(*column);
        }
    }
    if valid.len() < MIN_MATRIX_COLUMNS {
        return StatOutcome::InsufficientData(InsufficientData::TooFewColumns {
            valid: valid.len(),
            required: MIN_MATRIX_COLUMNS,
        });
    }

    let data: Vec<Vec<Option<f64>>> = valid.iter().map(|c| table.column(*c)).collect();
    let values = data
        .iter()
        .map(|xs| data.iter().map(|ys| pearson(xs, ys)).collect())
        .collect();

    StatOutcome::Computed(CorrelationMatrix { columns: valid, values })
}

/// A named column tested against the target in lag analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagCandidate {
    pub label: &'static str,
    pub column: Column,
}

/// Today's and yesterday's stress and sleep
pub const LAG_CANDIDATES: [LagCandidate; 4] = [
    LagCandidate { label: "Stress (Today)", column: Column::StressLevel },
    LagCandidate { label: "Stress (Yesterday)", column: Column::StressLag1 },
    LagCandidate { label: "Sleep (Hours Today)", column: Column::SleepHours },
    LagCandidate { label: "Sleep (Yesterday)", column: Column::SleepLag1 },
];

/// Correlation of the target with one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaggedCorrelation {
    pub label: String,
    pub column: Column,
    /// None when the pair has no variance or too few complete rows
    pub correlation: Option<f64>,
}

/// Correlate the target column with each candidate column
///
/// Candidates whose column has no values are left out. Needs at least three
/// rows, a present target, and at least one candidate with a defined
/// correlation.
pub fn lagged_correlation(
    table: &DerivedTable,
    target: Column,
    candidates: &[LagCandidate],
) -> StatOutcome<Vec<LaggedCorrelation>> {
    if table.len() < MIN_ROWS {
        return StatOutcome::InsufficientData(InsufficientData::TooFewRows {
            rows: table.len(),
            required: MIN_ROWS,
        });
    }
    if !table.has_column(target) {
        return StatOutcome::InsufficientData(InsufficientData::NoComputableValue);
    }

    let target_values = table.column(target);
    let results: Vec<LaggedCorrelation> = candidates
        .iter()
        .filter(|candidate| table.has_column(candidate.column))
        .map(|candidate| LaggedCorrelation {
            label: candidate.label.to_string(),
            column: candidate.column,
            correlation: pearson(&target_values, &table.column(candidate.column)),
        })
        .collect();

    if results.iter().all(|r| r.correlation.is_none()) {
        return StatOutcome::InsufficientData(InsufficientData::NoComputableValue);
    }
    StatOutcome::Computed(results)
}

/// Latest 7-day severity average compared with the all-time average
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    pub recent_avg: f64,
    pub all_time_avg: f64,
    pub delta: f64,
}

/// Summarize the most recent rolling severity mean
///
/// Gated on the same minimum row count as the correlations.
pub fn trend_summary(table: &DerivedTable, stats: &AggregateStats) -> StatOutcome<TrendSummary> {
    if table.len() < MIN_ROWS {
        return StatOutcome::InsufficientData(InsufficientData::TooFewRows {
            rows: table.len(),
            required: MIN_ROWS,
        });
    }

    match table.last().and_then(|row| row.severity_7d_avg) {
        Some(recent) => StatOutcome::Computed(TrendSummary {
            recent_avg: round1(recent),
            all_time_avg: stats.avg_severity,
            delta: round1(recent - stats.avg_severity),
        }),
        None => StatOutcome::InsufficientData(InsufficientData::NoComputableValue),
    }
}
