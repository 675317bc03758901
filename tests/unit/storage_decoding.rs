/// Decoding of hand-edited and legacy journal files
use chrono::NaiveDate;
use tempfile::TempDir;
use wellness_journal_mcp::storage::decode_collection;
use wellness_journal_mcp::*;

#[cfg(test)]
mod storage_decoding_tests {
    use super::*;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_malformed_numerics_become_missing() {
        let collection =
            decode_collection(r#"{"2024-01-01": {"symptom_severity": "high", "sleep_hours": "7.5"}}"#).unwrap();

        let record = collection.get(&jan(1)).expect("entry kept");
        assert_eq!(record.symptom_severity, None);
        assert_eq!(record.sleep_hours, Some(7.5));
    }

    #[test]
    fn test_invalid_date_keys_are_skipped() {
        let collection = decode_collection(
            r#"{
                "2024-01-01": {"symptom_severity": 4},
                "yesterday": {"symptom_severity": 9},
                "2024-02-30": {"symptom_severity": 2}
            }"#,
        )
        .unwrap();

        let dates: Vec<NaiveDate> = collection.dates().copied().collect();
        assert_eq!(dates, vec![jan(1)]);
    }

    #[test]
    fn test_key_wins_over_body_date() {
        let collection = decode_collection(r#"{"2024-01-03": {"date": "2019-05-05", "exercise": 20}}"#).unwrap();

        let record = collection.get(&jan(3)).expect("entry stored under its key");
        assert_eq!(record.date, jan(3));
        assert_eq!(record.exercise, Some(20));
    }

    #[test]
    fn test_labels_and_symptom_lists() {
        let collection = decode_collection(
            r#"{"2024-01-04": {
                "stress_type": "Chronic (Background Anxiety)",
                "meal_speed": "Lightning",
                "symptoms": "Bloating, Gas"
            }}"#,
        )
        .unwrap();

        let record = collection.get(&jan(4)).unwrap();
        assert_eq!(record.stress_type, Some(StressType::Chronic));
        assert_eq!(record.meal_speed, None);
        assert!(record.symptoms.contains("Bloating"));
        assert!(record.symptoms.contains("Gas"));
    }

    #[test]
    fn test_store_reads_hand_edited_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(
            &path,
            r#"{
                "2024-01-01": {"symptom_severity": "7", "water_intake": "n/a"},
                "not-a-date": {"symptom_severity": 1},
                "2024-01-02": "garbage"
            }"#,
        )
        .unwrap();

        let store = JsonFileStore::new(path).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);

        let record = loaded.get(&jan(1)).unwrap();
        assert_eq!(record.symptom_severity, Some(7));
        assert_eq!(record.water_intake, None);
    }
}
