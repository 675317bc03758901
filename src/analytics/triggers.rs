/// High-symptom day detection
///
/// Flags each day whose severity reached the threshold and pairs it with
/// what was eaten that day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::EntryCollection;

/// Severity at or above which a day counts as a trigger day
pub const DEFAULT_TRIGGER_THRESHOLD: u8 = 6;

/// Shown in place of diet notes when none were written
pub const NO_MEALS_RECORDED: &str = "No meals recorded";

/// Map each trigger day to its diet notes
///
/// Days without a severity are never trigger days.
pub fn detect_triggers(collection: &EntryCollection, threshold: u8) -> BTreeMap<NaiveDate, String> {
    collection
        .records()
        .filter(|record| record.symptom_severity.map_or(false, |s| s >= threshold))
        .map(|record| {
            let meals = if record.has_diet_notes() {
                record.diet_notes.clone().unwrap_or_default()
            } else {
                NO_MEALS_RECORDED.to_string()
            };
            (record.date, meals)
        })
        .collect()
}
