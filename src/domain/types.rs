/// Core enumerated types used by health records
///
/// This module defines the categorical fields of a daily log (stress context
/// and eating speed). Their serialized form is the human-readable label shown
/// in the log form, so stored files stay readable and compatible.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// What kind of stress the user experienced on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum StressType {
    /// No notable stress
    #[serde(rename = "None")]
    NoStress,
    /// A sudden, one-off event
    #[serde(rename = "Acute (Sudden Event)")]
    Acute,
    /// Background anxiety that lasts for days
    #[serde(rename = "Chronic (Background Anxiety)")]
    Chronic,
    #[serde(rename = "Social/Work")]
    SocialWork,
    #[serde(rename = "Physical/Fatigue")]
    PhysicalFatigue,
}

impl StressType {
    /// All stress types in form order
    pub const ALL: [StressType; 5] = [
        StressType::NoStress,
        StressType::Acute,
        StressType::Chronic,
        StressType::SocialWork,
        StressType::PhysicalFatigue,
    ];

    /// Get the display label for this stress type
    pub fn label(&self) -> &'static str {
        match self {
            StressType::NoStress => "None",
            StressType::Acute => "Acute (Sudden Event)",
            StressType::Chronic => "Chronic (Background Anxiety)",
            StressType::SocialWork => "Social/Work",
            StressType::PhysicalFatigue => "Physical/Fatigue",
        }
    }

    /// Parse a stored or user-supplied label
    ///
    /// Matching is case-insensitive and also accepts the short form before
    /// the parenthesis (e.g. "acute").
    pub fn from_label(s: &str) -> Option<Self> {
        find_by_label(&Self::ALL, s, Self::label)
    }
}

/// How quickly the user ate their meals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MealSpeed {
    #[serde(rename = "Slow / Mindful (20+ min)")]
    Slow,
    #[serde(rename = "Average (10-20 min)")]
    Average,
    #[serde(rename = "Fast / Rushed (<10 min)")]
    Fast,
    #[serde(rename = "Distracted (TV/Phone)")]
    Distracted,
}

impl MealSpeed {
    /// All meal speeds in form order
    pub const ALL: [MealSpeed; 4] = [
        MealSpeed::Slow,
        MealSpeed::Average,
        MealSpeed::Fast,
        MealSpeed::Distracted,
    ];

    /// Get the display label for this meal speed
    pub fn label(&self) -> &'static str {
        match self {
            MealSpeed::Slow => "Slow / Mindful (20+ min)",
            MealSpeed::Average => "Average (10-20 min)",
            MealSpeed::Fast => "Fast / Rushed (<10 min)",
            MealSpeed::Distracted => "Distracted (TV/Phone)",
        }
    }

    /// Parse a stored or user-supplied label
    pub fn from_label(s: &str) -> Option<Self> {
        find_by_label(&Self::ALL, s, Self::label)
    }
}

fn find_by_label<T: Copy>(all: &[T], s: &str, label: fn(&T) -> &'static str) -> Option<T> {
    let wanted = s.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    all.iter()
        .find(|item| {
            let full = label(item).to_lowercase();
            let short = full.split(" (").next().unwrap_or(&full).trim().to_string();
            full == wanted || short == wanted
        })
        .copied()
}
