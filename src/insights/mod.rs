/// Language-model analysis of logged days
///
/// The requester renders a prompt from one record (daily) or up to a week of
/// records (weekly), sends it to a `LanguageModel`, and parses the answer
/// into a typed insight. Failures come back as `InsightError`, which
/// serializes to the `{error, message, raw_content?}` shape clients display.

pub mod client;
pub mod prompt;

pub use client::{LanguageModel, OpenAiChatClient, DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::InsightConfig;
use crate::domain::{lenient, DomainError, HealthRecord};

/// Most records a weekly analysis accepts
pub const WEEKLY_MAX_RECORDS: usize = 7;

/// Errors from requesting an insight
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("OPENAI_API_KEY not found in environment variables.")]
    ApiKeyMissing,

    #[error("{0}")]
    Api(String),

    #[error("{message}")]
    Parsing { message: String, raw_content: String },

    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),
}

impl InsightError {
    /// Short label shown as the failure kind
    pub fn kind_label(&self) -> &'static str {
        match self {
            InsightError::ApiKeyMissing => "API Key Missing",
            InsightError::Api(_) => "API Error",
            InsightError::Parsing { .. } => "Parsing Error",
            InsightError::Domain(_) => "Validation Error",
        }
    }

    pub fn to_failure(&self) -> InsightFailure {
        InsightFailure {
            error: self.kind_label().to_string(),
            message: self.to_string(),
            raw_content: match self {
                InsightError::Parsing { raw_content, .. } => Some(raw_content.clone()),
                _ => None,
            },
        }
    }
}

/// Serializable form of an insight failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightFailure {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedTrigger {
    pub trigger: String,
    pub confidence: Confidence,
}

/// Assessment of a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInsight {
    #[serde(deserialize_with = "wellness_score")]
    pub wellness_score: u8,
    pub summary: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Assessment of up to a week of days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyInsight {
    #[serde(deserialize_with = "wellness_score")]
    pub wellness_score: u8,
    pub trend_analysis: String,
    #[serde(default)]
    pub identified_triggers: Vec<IdentifiedTrigger>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Read a score as a number (or numeric string) and clamp it into 1-100
fn wellness_score<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    let score = lenient::number(&value).ok_or_else(|| D::Error::custom("wellness_score is not a number"))?;
    Ok(score.round().clamp(1.0, 100.0) as u8)
}

/// Remove markdown code fences around a model answer
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_answer<T: for<'de> Deserialize<'de>>(content: String) -> Result<T, InsightError> {
    let cleaned = strip_code_fences(&content);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!("Failed to parse model answer as JSON: {}", e);
        InsightError::Parsing {
            message: "AI returned unstructured text.".to_string(),
            raw_content: content,
        }
    })
}

/// Sends journal data to a language model and parses its assessment
pub struct InsightRequester {
    model: Option<Box<dyn LanguageModel>>,
}

impl InsightRequester {
    pub fn new(model: Option<Box<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// Build a requester from configuration; no API key means no model
    pub fn from_config(config: &InsightConfig) -> Self {
        let model = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                Box::new(OpenAiChatClient::new(key, &config.api_base, &config.model, config.max_tokens))
                    as Box<dyn LanguageModel>
            });

        if model.is_none() {
            tracing::info!("No OpenAI API key configured; AI analysis disabled");
        }
        Self { model }
    }

    /// A requester with no model; every request fails with `ApiKeyMissing`
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    async fn ask(&self, prompt: &str) -> Result<String, InsightError> {
        let model = self.model.as_ref().ok_or(InsightError::ApiKeyMissing)?;
        let answer = model.complete(prompt).await;
        if let Err(e) = &answer {
            tracing::error!("Language model request failed: {}", e);
        }
        answer
    }

    /// Analyze one day's record
    pub async fn analyze_daily(&self, record: &HealthRecord) -> Result<DailyInsight, InsightError> {
        let prompt = prompt::daily_prompt(record).map_err(|e| InsightError::Api(e.to_string()))?;
        let answer = self.ask(&prompt).await?;
        parse_answer(answer)
    }

    /// Analyze between one and seven records, oldest first
    pub async fn analyze_weekly(&self, records: &[HealthRecord]) -> Result<WeeklyInsight, InsightError> {
        if records.is_empty() {
            return Err(DomainError::Validation {
                message: "Weekly analysis needs at least one record".to_string(),
            }
            .into());
        }
        if records.len() > WEEKLY_MAX_RECORDS {
            return Err(DomainError::TooManyRecords {
                max: WEEKLY_MAX_RECORDS,
                got: records.len(),
            }
            .into());
        }

        let prompt = prompt::weekly_prompt(records).map_err(|e| InsightError::Api(e.to_string()))?;
        let answer = self.ask(&prompt).await?;
        parse_answer(answer)
    }
}
