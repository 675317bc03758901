/// Human-readable labels for the numeric scales in a daily log

use serde::Serialize;

const SEVERITY_LABELS: [&str; 10] = [
    "Minimal", "Very Mild", "Mild", "Low-Moderate", "Moderate",
    "Noticeable", "Uncomfortable", "Severe", "Very Severe", "Unbearable",
];

const SLEEP_QUALITY_LABELS: [&str; 10] = [
    "Terrible", "Very Poor", "Poor", "Below Average", "Average",
    "Decent", "Good", "Very Good", "Excellent", "Perfect",
];

const STRESS_LEVEL_LABELS: [&str; 10] = [
    "Zen", "Calm", "Relaxed", "Manageable", "Neutral",
    "Busy", "Stressed", "High Stress", "Very High", "Overwhelming",
];

const BRISTOL_SCALE: [&str; 7] = [
    "Type 1: Separate hard lumps (Severe Constipation)",
    "Type 2: Lumpy sausage (Mild Constipation)",
    "Type 3: Sausage with cracks (Normal)",
    "Type 4: Smooth sausage/snake (Ideal)",
    "Type 5: Soft blobs, clear-cut edges (Mild Diarrhea)",
    "Type 6: Mushy pieces, ragged edges (Moderate Diarrhea)",
    "Type 7: Watery, no solid pieces (Severe Diarrhea)",
];

/// Symptom labels offered by the log form; free text is accepted as well
pub const COMMON_SYMPTOMS: [&str; 9] = [
    "Bloating", "Abdominal Pain", "Gas", "Constipation", "Diarrhea",
    "Nausea", "Heartburn", "Incomplete Evacuation", "Urgency",
];

fn scale_label(labels: &'static [&'static str], value: u8) -> &'static str {
    match value {
        0 => "Unknown",
        v => labels.get(v as usize - 1).copied().unwrap_or("Unknown"),
    }
}

/// Label for a symptom severity rating (1-10)
pub fn severity_label(value: u8) -> &'static str {
    scale_label(&SEVERITY_LABELS, value)
}

/// Label for a sleep quality rating (1-10)
pub fn sleep_quality_label(value: u8) -> &'static str {
    scale_label(&SLEEP_QUALITY_LABELS, value)
}

/// Label for a stress level rating (1-10)
pub fn stress_label(value: u8) -> &'static str {
    scale_label(&STRESS_LEVEL_LABELS, value)
}

/// Description of a Bristol stool scale category (1-7)
pub fn bristol_description(stool_type: u8) -> &'static str {
    scale_label(&BRISTOL_SCALE, stool_type)
}

/// Coarse traffic-light band for a severity rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,
    Moderate,
    High,
}

impl SeverityBand {
    pub fn from_severity(severity: u8) -> Self {
        if severity < 4 {
            SeverityBand::Low
        } else if severity < 7 {
            SeverityBand::Moderate
        } else {
            SeverityBand::High
        }
    }

    /// Emoji indicator used in tool output
    pub fn indicator(&self) -> &'static str {
        match self {
            SeverityBand::Low => "🟢",
            SeverityBand::Moderate => "🟡",
            SeverityBand::High => "🔴",
        }
    }
}
