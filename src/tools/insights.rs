/// Tool for AI-generated wellness insights
///
/// This module implements the journal_insights MCP tool. Daily mode sends
/// today's entry; weekly mode sends the entries of the last 7 days.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::insights::{
    DailyInsight, InsightError, InsightFailure, InsightRequester, WeeklyInsight, WEEKLY_MAX_RECORDS,
};
use crate::storage::EntryStore;
use crate::tools::ToolError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightMode {
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct InsightsParams {
    /// Analysis type: 'daily' (today's entry) or 'weekly' (last 7 days), defaults to 'daily'
    pub mode: Option<InsightMode>,
}

/// Typed insight for either mode
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Insight {
    Daily(DailyInsight),
    Weekly(WeeklyInsight),
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<Insight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<InsightFailure>,
}

impl InsightsResponse {
    fn no_data(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            insight: None,
            failure: None,
        }
    }

    fn from_result(result: Result<Insight, InsightError>) -> Result<Self, ToolError> {
        match result {
            Ok(insight) => Ok(Self {
                success: true,
                message: render(&insight),
                insight: Some(insight),
                failure: None,
            }),
            Err(InsightError::Domain(e)) => Err(e.into()),
            Err(e) => {
                let failure = e.to_failure();
                Ok(Self {
                    success: false,
                    message: format!("Analysis Failed: {}", failure.message),
                    insight: None,
                    failure: Some(failure),
                })
            }
        }
    }
}

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("{}\n", empty);
    }
    items.iter().map(|item| format!("• {}\n", item)).collect()
}

fn render(insight: &Insight) -> String {
    match insight {
        Insight::Daily(daily) => format!(
            "🤖 **Wellness Score**: {}/100\n\n**Daily Summary**\n{}\n\n🚨 **Detected Triggers**\n{}\n💡 **Recommendations**\n{}",
            daily.wellness_score,
            daily.summary,
            bullet_list(&daily.triggers, "No specific triggers identified yet."),
            bullet_list(&daily.recommendations, "None"),
        ),
        Insight::Weekly(weekly) => {
            let triggers: Vec<String> = weekly
                .identified_triggers
                .iter()
                .map(|t| format!("{} (Confidence: {:?})", t.trigger, t.confidence))
                .collect();
            format!(
                "🤖 **Wellness Score**: {}/100\n\n**Trend Analysis**\n{}\n\n🚨 **Detected Triggers**\n{}\n💡 **Recommendations**\n{}",
                weekly.wellness_score,
                weekly.trend_analysis,
                bullet_list(&triggers, "No specific triggers identified yet."),
                bullet_list(&weekly.recommendations, "None"),
            )
        }
    }
}

/// Ask the language model for a daily or weekly assessment
pub async fn get_insights<S: EntryStore + ?Sized>(
    store: &S,
    requester: &InsightRequester,
    params: InsightsParams,
    today: NaiveDate,
) -> Result<InsightsResponse, ToolError> {
    match params.mode.unwrap_or_default() {
        InsightMode::Daily => {
            let Some(record) = store.get_entry(today) else {
                return Ok(InsightsResponse::no_data("No data found for today. Please log data first."));
            };
            let result = requester.analyze_daily(&record).await.map(Insight::Daily);
            InsightsResponse::from_result(result)
        }
        InsightMode::Weekly => {
            let week = store.get_date_range(WEEKLY_MAX_RECORDS as u32, today);
            if week.is_empty() {
                return Ok(InsightsResponse::no_data("No data found for the last 7 days."));
            }
            let records: Vec<_> = week.into_iter().collect();
            let result = requester.analyze_weekly(&records).await.map(Insight::Weekly);
            InsightsResponse::from_result(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthRecord;
    use crate::insights::LanguageModel;
    use crate::storage::SqliteStore;
    use async_trait::async_trait;

    struct FixedAnswer(&'static str);

    #[async_trait]
    impl LanguageModel for FixedAnswer {
        async fn complete(&self, _prompt: &str) -> Result<String, InsightError> {
            Ok(self.0.to_string())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn store_with(days: &[u32]) -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        for d in days {
            let mut record = HealthRecord::empty(day(*d));
            record.symptom_severity = Some(5);
            assert!(store.save_entry(record));
        }
        store
    }

    #[tokio::test]
    async fn test_daily_without_entry() {
        let store = store_with(&[1]);
        let requester = InsightRequester::new(Some(Box::new(FixedAnswer("{}"))));

        let response = get_insights(&store, &requester, InsightsParams::default(), day(2)).await.unwrap();
        assert!(!response.success);
        assert!(response.message.contains("No data found for today"));
    }

    #[tokio::test]
    async fn test_daily_success() {
        let store = store_with(&[2]);
        let requester = InsightRequester::new(Some(Box::new(FixedAnswer(
            r#"{"wellness_score": 80, "summary": "Good day", "triggers": [], "recommendations": ["Keep hydrated"]}"#,
        ))));

        let response = get_insights(&store, &requester, InsightsParams::default(), day(2)).await.unwrap();
        assert!(response.success);
        assert!(response.message.contains("80/100"));
        assert!(response.message.contains("No specific triggers identified yet."));
        assert!(response.message.contains("• Keep hydrated"));
    }

    #[tokio::test]
    async fn test_weekly_uses_last_seven_days() {
        let store = store_with(&[1, 2, 5, 9]);
        let requester = InsightRequester::new(Some(Box::new(FixedAnswer(
            r#"{"wellness_score": 55, "trend_analysis": "Stable", "identified_triggers": [{"trigger": "Dairy", "confidence": "Medium"}]}"#,
        ))));

        let params = InsightsParams { mode: Some(InsightMode::Weekly) };
        let response = get_insights(&store, &requester, params, day(9)).await.unwrap();
        assert!(response.success);
        assert!(response.message.contains("Dairy (Confidence: Medium)"));
    }

    #[tokio::test]
    async fn test_missing_key_is_a_failure_result() {
        let store = store_with(&[2]);
        let response = get_insights(&store, &InsightRequester::disabled(), InsightsParams::default(), day(2))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.failure.unwrap().error, "API Key Missing");
    }
}
