/// Prompt templates for the wellness assistant
///
/// Both prompts embed the logged data as JSON and spell out the exact JSON
/// object the model must answer with.

use std::collections::BTreeMap;

use crate::domain::{date_key, HealthRecord};

const DAILY_TEMPLATE: &str = r#"
You are an expert IBS Wellness Assistant. Analyze the following daily log and return a Valid JSON object.
Do NOT return markdown formatting like ```json ... ```. Just the raw JSON object.

Data:
{data}

Required JSON Structure:
{
    "wellness_score": <int 1-100 based on overall health>,
    "summary": "<concise summary of the day>",
    "triggers": ["<potential trigger 1>", "<potential trigger 2>"],
    "recommendations": ["<actionable tip 1>", "<actionable tip 2>"]
}
"#;

const WEEKLY_TEMPLATE: &str = r#"
You are an expert IBS Wellness Assistant. Analyze the following weekly data and return a Valid JSON object.
Do NOT return markdown formatting like ```json ... ```. Just the raw JSON object.

Data:
{data}

Required JSON Structure:
{
    "wellness_score": <int 1-100 average wellness>,
    "trend_analysis": "<analysis of symptom/lifestyle trends>",
    "identified_triggers": [
        {"trigger": "<trigger name>", "confidence": "<High/Medium/Low>"}
    ],
    "recommendations": ["<strategic recommendation 1>", "<strategic recommendation 2>"]
}
"#;

fn render(template: &str, data: &str) -> String {
    template.replacen("{data}", data, 1)
}

/// Prompt for a single day's record
pub fn daily_prompt(record: &HealthRecord) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(record)?;
    Ok(render(DAILY_TEMPLATE, &data))
}

/// Prompt for several days, keyed by date
pub fn weekly_prompt(records: &[HealthRecord]) -> Result<String, serde_json::Error> {
    let keyed: BTreeMap<String, &HealthRecord> =
        records.iter().map(|record| (date_key(record.date), record)).collect();
    let data = serde_json::to_string_pretty(&keyed)?;
    Ok(render(WEEKLY_TEMPLATE, &data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_daily_prompt_embeds_record() {
        let mut record = HealthRecord::empty(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        record.diet_notes = Some("Oatmeal, coffee".to_string());

        let prompt = daily_prompt(&record).unwrap();
        assert!(prompt.contains("\"date\": \"2024-06-01\""));
        assert!(prompt.contains("Oatmeal, coffee"));
        assert!(prompt.contains("\"wellness_score\""));
        assert!(!prompt.contains("{data}"));
    }

    #[test]
    fn test_weekly_prompt_keys_by_date() {
        let records: Vec<HealthRecord> = (1..=3)
            .map(|d| HealthRecord::empty(NaiveDate::from_ymd_opt(2024, 6, d).unwrap()))
            .collect();

        let prompt = weekly_prompt(&records).unwrap();
        assert!(prompt.contains("\"2024-06-01\": {"));
        assert!(prompt.contains("\"2024-06-03\": {"));
        assert!(prompt.contains("identified_triggers"));
    }
}
