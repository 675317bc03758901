/// Analytics engine for health journal data
///
/// This module turns the stored collection into an ordered time series,
/// derives rolling and lagged features, and computes summary statistics,
/// correlations and trigger days. Everything here works on an in-memory
/// snapshot and never touches storage.

pub mod timeseries;
pub mod features;
pub mod stats;
pub mod triggers;

pub use timeseries::{Column, TimeSeries};
pub use features::{DerivedRow, DerivedTable, ROLLING_WINDOW};
pub use stats::{
    aggregate_stats, correlation_matrix, lagged_correlation, pearson, trend_summary, AggregateStats,
    CorrelationMatrix, InsufficientData, LagCandidate, LaggedCorrelation, StatOutcome, TrendSummary,
    DEFAULT_MATRIX_COLUMNS, LAG_CANDIDATES, MIN_ROWS,
};
pub use triggers::{detect_triggers, DEFAULT_TRIGGER_THRESHOLD, NO_MEALS_RECORDED};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{date_range, EntryCollection};

/// Number of days shown in the recent-window sections by default
pub const DEFAULT_RECENT_DAYS: u32 = 8;

/// Everything the analytics view shows for one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_entries: usize,
    /// Days covered by the recent-window sections
    pub recent_days: u32,
    /// All-time averages
    pub stats: AggregateStats,
    /// Latest 7-day severity average against the all-time average
    pub trend: StatOutcome<TrendSummary>,
    /// Severity against today's and yesterday's stress and sleep, all-time
    pub lag_analysis: StatOutcome<Vec<LaggedCorrelation>>,
    /// Correlation matrix over the recent window
    pub correlations: StatOutcome<CorrelationMatrix>,
    /// Derived rows of the recent window, oldest first
    pub recent_series: Vec<DerivedRow>,
    /// Trigger days within the recent window
    pub triggers: BTreeMap<NaiveDate, String>,
}

/// Analytics engine for processing journal snapshots
pub struct AnalyticsEngine {
    trigger_threshold: u8,
}

impl AnalyticsEngine {
    /// Create a new analytics engine with the default trigger threshold
    pub fn new() -> Self {
        Self::with_trigger_threshold(DEFAULT_TRIGGER_THRESHOLD)
    }

    pub fn with_trigger_threshold(trigger_threshold: u8) -> Self {
        Self { trigger_threshold }
    }

    pub fn trigger_threshold(&self) -> u8 {
        self.trigger_threshold
    }

    /// Build the ordered series and derive its features
    pub fn derive(&self, collection: &EntryCollection) -> DerivedTable {
        DerivedTable::derive(&TimeSeries::build(collection))
    }

    pub fn triggers(&self, collection: &EntryCollection) -> BTreeMap<NaiveDate, String> {
        detect_triggers(collection, self.trigger_threshold)
    }

    /// Compute the full analytics report
    ///
    /// Averages, the trend and the lag analysis use every record. The
    /// correlation matrix, the chart series and the trigger list only use
    /// the last `recent_days` days ending at `today`.
    pub fn report(&self, collection: &EntryCollection, recent_days: u32, today: NaiveDate) -> AnalyticsReport {
        let stats = aggregate_stats(collection);
        let full = self.derive(collection);

        let recent = collection.subset(&date_range(recent_days, today));
        let recent_table = self.derive(&recent);

        tracing::debug!(
            "Analytics over {} entries ({} in the last {} days)",
            collection.len(),
            recent.len(),
            recent_days
        );

        AnalyticsReport {
            total_entries: collection.len(),
            recent_days,
            stats,
            trend: trend_summary(&full, &stats),
            lag_analysis: lagged_correlation(&full, Column::SymptomSeverity, &LAG_CANDIDATES),
            correlations: correlation_matrix(&recent_table, &DEFAULT_MATRIX_COLUMNS),
            recent_series: recent_table.rows().to_vec(),
            triggers: self.triggers(&recent),
        }
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
