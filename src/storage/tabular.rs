/// Tabular codec for health records
///
/// A table holds one row per date with `date` as the first column and the
/// remaining columns named exactly like the record fields. The SQLite
/// backend and the CSV export both go through this codec, so the table
/// layout is defined in one place.

use serde_json::{Map, Number, Value};

use crate::domain::{EntryCollection, HealthRecord};

/// Column order of the tabular layout
pub const COLUMNS: [&str; 14] = [
    "date",
    "symptom_severity",
    "symptoms",
    "stool_type",
    "bowel_movements",
    "stress_level",
    "stress_type",
    "sleep_hours",
    "sleep_quality",
    "diet_notes",
    "meal_speed",
    "water_intake",
    "exercise",
    "timestamp",
];

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::Null,
            Cell::Integer(n) => Value::Number((*n).into()),
            Cell::Real(r) => Number::from_f64(*r).map(Value::Number).unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }

    /// Render the cell as a CSV field
    fn to_csv_field(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Integer(n) => n.to_string(),
            Cell::Real(r) => r.to_string(),
            Cell::Text(s) => {
                if s.contains([',', '"', '\n', '\r']) {
                    format!("\"{}\"", s.replace('"', "\"\""))
                } else {
                    s.clone()
                }
            }
        }
    }
}

fn int<T: Into<i64>>(value: Option<T>) -> Cell {
    value.map(|v| Cell::Integer(v.into())).unwrap_or(Cell::Empty)
}

fn real(value: Option<f64>) -> Cell {
    value.map(Cell::Real).unwrap_or(Cell::Empty)
}

fn text(value: Option<&str>) -> Cell {
    value.map(|v| Cell::Text(v.to_string())).unwrap_or(Cell::Empty)
}

/// Flatten a record into a row following `COLUMNS`
pub fn record_to_row(record: &HealthRecord) -> Vec<Cell> {
    let symptoms = serde_json::to_string(&record.symptoms).unwrap_or_else(|_| "[]".to_string());

    vec![
        Cell::Text(record.date.to_string()),
        int(record.symptom_severity),
        Cell::Text(symptoms),
        int(record.stool_type),
        int(record.bowel_movements),
        int(record.stress_level),
        text(record.stress_type.as_ref().map(|s| s.label())),
        real(record.sleep_hours),
        int(record.sleep_quality),
        text(record.diet_notes.as_deref()),
        text(record.meal_speed.as_ref().map(|m| m.label())),
        real(record.water_intake),
        int(record.exercise),
        text(record.timestamp.map(|t| t.to_rfc3339()).as_deref()),
    ]
}

/// Rebuild a record from named cells
///
/// Unknown columns are ignored and missing columns decode as missing
/// fields. Returns None when the row has no readable date.
pub fn record_from_row<'a, I>(cells: I) -> Option<HealthRecord>
where
    I: IntoIterator<Item = (&'a str, Cell)>,
{
    let fields: Map<String, Value> = cells
        .into_iter()
        .filter(|(name, _)| COLUMNS.contains(name))
        .map(|(name, cell)| (name.to_string(), cell.to_json()))
        .collect();

    let date = fields.get("date").cloned();
    match serde_json::from_value::<HealthRecord>(Value::Object(fields)) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Skipping unreadable row (date {:?}): {}", date, e);
            None
        }
    }
}

/// Render a collection as CSV, one row per date in ascending order
pub fn to_csv(collection: &EntryCollection) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');

    for record in collection.records() {
        let line = record_to_row(record)
            .iter()
            .map(Cell::to_csv_field)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
