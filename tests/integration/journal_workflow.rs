/// Journal workflows against real files on disk
use chrono::NaiveDate;
use tempfile::TempDir;
use wellness_journal_mcp::*;

#[cfg(test)]
mod journal_workflow_tests {
    use super::*;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample_record() -> HealthRecord {
        let mut record = HealthRecord::new(june(1));
        record.symptom_severity = Some(7);
        record.sleep_hours = Some(6.5);
        record.symptoms.insert("Bloating".to_string());
        record.symptoms.insert("Gas".to_string());
        record.stress_type = Some(StressType::Chronic);
        record.meal_speed = Some(MealSpeed::Fast);
        record.diet_notes = Some("Pizza, soda".to_string());
        record.water_intake = Some(1.5);
        record.exercise = Some(0);
        record
    }

    fn config(dir: &TempDir, backend: StorageBackend) -> AppConfig {
        AppConfig {
            data_file: dir.path().join(backend.default_file_name()),
            backend,
            insights: InsightConfig::default(),
        }
    }

    #[test]
    fn test_round_trip_both_backends() {
        for backend in [StorageBackend::Json, StorageBackend::Sqlite] {
            let dir = TempDir::new().expect("Failed to create temp dir");
            let config = config(&dir, backend);
            let record = sample_record();

            {
                let store = config.open_store().expect("Failed to open store");
                assert!(store.save_entry(record.clone()));
            }

            // Reopen from disk
            let store = config.open_store().expect("Failed to reopen store");
            let loaded = store.get_entry(june(1)).expect("entry persisted");
            assert_eq!(loaded, record, "{:?} backend", backend);
        }
    }

    #[test]
    fn test_saving_twice_equals_saving_once() {
        let dir = TempDir::new().unwrap();
        let store = config(&dir, StorageBackend::Json).open_store().unwrap();

        assert!(store.save_entry(sample_record()));
        let once = store.load();
        assert!(store.save_entry(sample_record()));
        assert_eq!(store.load(), once);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_delete_semantics() {
        let dir = TempDir::new().unwrap();
        let store = config(&dir, StorageBackend::Sqlite).open_store().unwrap();
        for d in 1..=3 {
            assert!(store.save_entry(HealthRecord::empty(june(d))));
        }
        let before = store.load();

        assert!(!store.delete_entry(june(9)));
        assert_eq!(store.load(), before);

        assert!(store.delete_entry(june(2)));
        let after = store.load();
        assert_eq!(after.len(), 2);
        assert!(!after.contains(&june(2)));
        assert_eq!(after.get(&june(1)), before.get(&june(1)));
        assert_eq!(after.get(&june(3)), before.get(&june(3)));
    }

    #[test]
    fn test_date_range_window() {
        let dir = TempDir::new().unwrap();
        let store = config(&dir, StorageBackend::Json).open_store().unwrap();
        for d in [1, 5, 8, 10] {
            assert!(store.save_entry(HealthRecord::empty(june(d))));
        }

        let window = store.get_date_range(7, june(10));
        let dates: Vec<NaiveDate> = window.dates().copied().collect();
        assert_eq!(dates, vec![june(5), june(8), june(10)]);
    }

    #[test]
    fn test_corrupted_json_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let store = JsonFileStore::new(path.clone()).expect("store opens after reset");
        assert!(store.load().is_empty());
        assert!(path.with_extension("bak").exists());
        assert_eq!(std::fs::read_to_string(path.with_extension("bak")).unwrap(), "{ not valid json");
    }

    #[tokio::test]
    async fn test_server_creation() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let server = JournalServer::new(&config(&dir, StorageBackend::Sqlite)).expect("Failed to create server");

        assert!(server.store().load().is_empty());
        assert!(!server.insights().is_enabled());
        assert_eq!(server.analytics().trigger_threshold(), 6);
    }

    #[tokio::test]
    async fn test_server_starts_on_non_object_file() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, StorageBackend::Json);
        std::fs::write(&config.data_file, "42").unwrap();

        let server = JournalServer::new(&config).expect("server starts after reset");
        assert!(server.store().read_all().unwrap().is_empty());
        assert!(config.data_file.with_extension("bak").exists());

        // Saving works again once the file has been reset
        assert!(server.store().save_entry(HealthRecord::empty(june(1))));
    }

    #[test]
    fn test_analytics_over_stored_journal() {
        let dir = TempDir::new().unwrap();
        let store = config(&dir, StorageBackend::Json).open_store().unwrap();
        let rows = [(1, 3, 2, 8.0), (2, 6, 6, 6.0), (3, 8, 8, 5.0), (4, 4, 3, 7.5)];
        for (d, severity, stress, sleep) in rows {
            let mut record = HealthRecord::empty(june(d));
            record.symptom_severity = Some(severity);
            record.stress_level = Some(stress);
            record.sleep_hours = Some(sleep);
            assert!(store.save_entry(record));
        }

        let report = AnalyticsEngine::new().report(&store.load(), 8, june(4));
        assert_eq!(report.total_entries, 4);
        assert_eq!(report.stats.avg_severity, 5.3);
        assert!(report.correlations.is_computed());
        assert!(report.lag_analysis.is_computed());
        assert_eq!(report.triggers.len(), 2);
    }
}
