/// Tolerant field decoders for stored records.
///
/// Stored data may come from hand-edited JSON or from a table whose cells
/// were typed as text. A value that cannot be read as the expected kind is
/// decoded as missing rather than failing the whole record, so aggregates
/// skip it instead of counting it as zero.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{parse_date_key, MealSpeed, StressType};

/// Read a value as a finite number, accepting numeric strings
pub(crate) fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Read a value as a non-negative whole number no larger than `max`
fn whole(value: &Value, max: u64) -> Option<u64> {
    let n = number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > max as f64 {
        return None;
    }
    Some(n as u64)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let value = Value::deserialize(d)?;
    value
        .as_str()
        .and_then(parse_date_key)
        .ok_or_else(|| D::Error::custom(format!("invalid date key: {}", value)))
}

pub(crate) fn opt_u8<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(|v| whole(v, u8::MAX as u64)).map(|n| n as u8))
}

pub(crate) fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(|v| whole(v, u32::MAX as u64)).map(|n| n as u32))
}

pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number))
}

pub(crate) fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(text))
}

/// Symptoms arrive as a JSON array, or as a single cell holding either a
/// JSON array or a comma-separated list.
pub(crate) fn symptoms<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let labels: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            match serde_json::from_str::<Vec<String>>(trimmed) {
                Ok(items) => items,
                Err(_) => trimmed
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(',')
                    .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
                    .collect(),
            }
        }
        _ => Vec::new(),
    };

    Ok(labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect())
}

pub(crate) fn opt_stress_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<StressType>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(label_field(value, "stress_type", StressType::from_label))
}

pub(crate) fn opt_meal_speed<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MealSpeed>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(label_field(value, "meal_speed", MealSpeed::from_label))
}

fn label_field<T>(value: Option<Value>, field: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = value.as_ref().and_then(text)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        tracing::warn!("Ignoring unknown {} label: {}", field, raw);
    }
    parsed
}

/// Accepts RFC 3339 as well as naive `YYYY-MM-DD HH:MM:SS[.f]` timestamps,
/// which are taken as UTC.
pub(crate) fn opt_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(raw) = value.as_ref().and_then(Value::as_str).map(str::trim) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let naive = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok());
    Ok(naive.map(|n| n.and_utc()))
}
