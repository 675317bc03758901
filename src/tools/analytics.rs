/// Tool for journal analytics
///
/// This module implements the journal_analytics MCP tool: averages, the
/// 7-day trend, lag analysis, the correlation matrix and trigger days,
/// rendered as text with the full report attached.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, AnalyticsReport, StatOutcome, DEFAULT_RECENT_DAYS};
use crate::domain::DomainError;
use crate::storage::EntryStore;
use crate::tools::ToolError;

/// Longest recent window the tool accepts
pub const MAX_RECENT_DAYS: u32 = 366;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AnalyticsParams {
    /// Days covered by charts, correlations and triggers (optional, defaults to 8)
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub message: String,
    pub report: AnalyticsReport,
}

fn render(report: &AnalyticsReport) -> String {
    let mut out = String::from("📊 **Analytics**\n\n");

    out.push_str(&format!(
        "**All-time averages** ({} entries)\n- Avg severity: {}\n- Avg sleep: {}h\n- Avg stress: {}\n",
        report.total_entries, report.stats.avg_severity, report.stats.avg_sleep, report.stats.avg_stress
    ));

    match &report.trend {
        StatOutcome::Computed(trend) => out.push_str(&format!(
            "\n**7-Day Symptom Trend**: {:.1}/10 ({:+.1} vs All-time)\n",
            trend.recent_avg, trend.delta
        )),
        StatOutcome::InsufficientData(reason) => {
            out.push_str(&format!("\n**7-Day Symptom Trend**: {}\n", reason))
        }
    }

    out.push_str("\n**Symptom Drivers (Lag Analysis)**\n");
    match &report.lag_analysis {
        StatOutcome::Computed(results) => {
            for result in results {
                match result.correlation {
                    Some(r) => out.push_str(&format!("- {}: {:+.2}\n", result.label, r)),
                    None => out.push_str(&format!("- {}: no variation yet\n", result.label)),
                }
            }
        }
        StatOutcome::InsufficientData(reason) => out.push_str(&format!("{}\n", reason)),
    }

    out.push_str(&format!("\n**Correlations** (last {} days)\n", report.recent_days));
    match &report.correlations {
        StatOutcome::Computed(matrix) => {
            for (i, a) in matrix.columns.iter().enumerate() {
                for (j, b) in matrix.columns.iter().enumerate().skip(i + 1) {
                    let cell = matrix.values[i][j]
                        .map(|r| format!("{:+.2}", r))
                        .unwrap_or_else(|| "n/a".to_string());
                    out.push_str(&format!("- {} ~ {}: {}\n", a, b, cell));
                }
            }
        }
        StatOutcome::InsufficientData(reason) => out.push_str(&format!("{}\n", reason)),
    }

    out.push_str("\n**Potential Triggers**\n");
    if report.triggers.is_empty() {
        out.push_str("No high symptom days recorded recently.\n");
    } else {
        for (date, meals) in &report.triggers {
            out.push_str(&format!("⚠️ {} (High Severity): {}\n", date, meals));
        }
    }

    out
}

/// Compute analytics over the stored journal
pub fn get_analytics<S: EntryStore + ?Sized>(
    store: &S,
    engine: &AnalyticsEngine,
    params: AnalyticsParams,
    today: NaiveDate,
) -> Result<AnalyticsResponse, ToolError> {
    let days = params.days.unwrap_or(DEFAULT_RECENT_DAYS);
    if days == 0 || days > MAX_RECENT_DAYS {
        return Err(DomainError::InvalidValue {
            field: "days",
            message: format!("must be between 1 and {}", MAX_RECENT_DAYS),
        }
        .into());
    }

    let collection = store.load();
    let report = engine.report(&collection, days, today);

    let message = if collection.is_empty() {
        "No data available for analysis. Start logging!".to_string()
    } else {
        render(&report)
    };

    Ok(AnalyticsResponse { message, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthRecord;
    use crate::storage::SqliteStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn log(store: &SqliteStore, d: u32, severity: u8, stress: u8, sleep: f64, notes: Option<&str>) {
        let mut record = HealthRecord::empty(day(d));
        record.symptom_severity = Some(severity);
        record.stress_level = Some(stress);
        record.sleep_hours = Some(sleep);
        record.diet_notes = notes.map(str::to_string);
        assert!(store.save_entry(record));
    }

    #[test]
    fn test_empty_journal() {
        let store = SqliteStore::in_memory().unwrap();
        let response = get_analytics(&store, &AnalyticsEngine::new(), AnalyticsParams::default(), day(10)).unwrap();

        assert_eq!(response.message, "No data available for analysis. Start logging!");
        assert_eq!(response.report.total_entries, 0);
        assert_eq!(response.report.recent_days, DEFAULT_RECENT_DAYS);
    }

    #[test]
    fn test_two_days_reports_insufficient_data() {
        let store = SqliteStore::in_memory().unwrap();
        log(&store, 8, 5, 4, 7.0, None);
        log(&store, 9, 7, 6, 6.0, Some("pizza"));

        let response = get_analytics(&store, &AnalyticsEngine::new(), AnalyticsParams::default(), day(10)).unwrap();
        assert!(!response.report.lag_analysis.is_computed());
        assert!(!response.report.correlations.is_computed());
        assert!(response.message.contains("Needs more data: 2 of 3 days logged"));
        assert!(response.message.contains("2024-08-09 (High Severity): pizza"));
    }

    #[test]
    fn test_three_days_computes_everything() {
        let store = SqliteStore::in_memory().unwrap();
        log(&store, 7, 3, 2, 8.0, None);
        log(&store, 8, 5, 4, 7.0, None);
        log(&store, 9, 8, 7, 5.0, None);

        let response = get_analytics(&store, &AnalyticsEngine::new(), AnalyticsParams::default(), day(10)).unwrap();
        assert!(response.report.lag_analysis.is_computed());
        assert!(response.report.correlations.is_computed());
        assert!(response.report.trend.is_computed());
        assert!(response.message.contains("Stress (Today)"));
        assert!(response.message.contains("symptom_severity ~ stress_level"));
    }

    #[test]
    fn test_rejects_zero_days() {
        let store = SqliteStore::in_memory().unwrap();
        let params = AnalyticsParams { days: Some(0) };
        assert!(get_analytics(&store, &AnalyticsEngine::new(), params, day(10)).is_err());
    }
}
