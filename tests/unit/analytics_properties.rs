/// Properties of the time-series and statistics pipeline
use chrono::NaiveDate;
use wellness_journal_mcp::analytics::*;
use wellness_journal_mcp::{EntryCollection, HealthRecord};

#[cfg(test)]
mod analytics_property_tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Small deterministic generator so the property checks cover varied data
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u64) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 33) % bound
        }
    }

    fn random_collection(seed: u64, days: u32) -> EntryCollection {
        let mut rng = Lcg(seed);
        let start = date(2024, 1, 1);
        (0..days)
            .filter_map(|offset| {
                if rng.next(4) == 0 {
                    return None;
                }
                let mut record = HealthRecord::empty(start + chrono::Duration::days(offset as i64));
                if rng.next(5) != 0 {
                    record.symptom_severity = Some(rng.next(10) as u8 + 1);
                }
                if rng.next(5) != 0 {
                    record.stress_level = Some(rng.next(10) as u8 + 1);
                }
                if rng.next(3) != 0 {
                    record.sleep_hours = Some(rng.next(20) as f64 / 2.0 + 3.0);
                }
                record.exercise = Some(rng.next(60) as u32);
                Some(record)
            })
            .collect()
    }

    #[test]
    fn test_rows_ascending_regardless_of_insertion_order() {
        let dates = [date(2024, 5, 3), date(2023, 11, 30), date(2024, 5, 1), date(2024, 2, 29)];
        let mut forward = EntryCollection::new();
        let mut backward = EntryCollection::new();
        for d in dates {
            forward.insert(HealthRecord::empty(d));
        }
        for d in dates.iter().rev() {
            backward.insert(HealthRecord::empty(*d));
        }

        let a = TimeSeries::build(&forward).dates();
        let b = TimeSeries::build(&backward).dates();
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rolling_severity_within_window_range() {
        for seed in 1..=20 {
            let table = DerivedTable::derive(&TimeSeries::build(&random_collection(seed, 40)));
            let severity = table.column(Column::SymptomSeverity);
            let rolling = table.column(Column::Severity7dAvg);

            for (i, avg) in rolling.iter().enumerate() {
                let start = (i + 1).saturating_sub(ROLLING_WINDOW);
                let window: Vec<f64> = severity[start..=i].iter().flatten().copied().collect();
                match avg {
                    Some(avg) => {
                        let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
                        let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                        assert!(*avg >= min - 1e-9 && *avg <= max + 1e-9);
                    }
                    None => assert!(window.is_empty()),
                }
            }
        }
    }

    #[test]
    fn test_stress_lag_is_previous_row() {
        for seed in 1..=20 {
            let table = DerivedTable::derive(&TimeSeries::build(&random_collection(seed, 30)));
            let stress = table.column(Column::StressLevel);
            let lagged = table.column(Column::StressLag1);

            if let Some(first) = lagged.first() {
                assert_eq!(*first, None);
            }
            for i in 1..lagged.len() {
                assert_eq!(lagged[i], stress[i - 1]);
            }
        }
    }

    #[test]
    fn test_aggregate_stats_of_empty_collection() {
        let stats = aggregate_stats(&EntryCollection::new());
        assert_eq!(stats.avg_severity, 0.0);
        assert_eq!(stats.avg_sleep, 0.0);
        assert_eq!(stats.avg_stress, 0.0);
    }

    #[test]
    fn test_correlations_bounded() {
        for seed in 1..=20 {
            let table = DerivedTable::derive(&TimeSeries::build(&random_collection(seed, 30)));
            if let StatOutcome::Computed(matrix) = correlation_matrix(&table, &DEFAULT_MATRIX_COLUMNS) {
                for value in matrix.values.iter().flatten().flatten() {
                    assert!((-1.0..=1.0).contains(value));
                }
            }
            if let StatOutcome::Computed(results) = lagged_correlation(&table, Column::SymptomSeverity, &LAG_CANDIDATES) {
                for r in results.iter().filter_map(|r| r.correlation) {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn test_constant_column_does_not_crash() {
        let collection: EntryCollection = (1..=5)
            .map(|d| {
                let mut record = HealthRecord::empty(date(2024, 3, d));
                record.symptom_severity = Some(d as u8);
                record.sleep_hours = Some(7.0);
                record
            })
            .collect();
        let table = DerivedTable::derive(&TimeSeries::build(&collection));

        let matrix = correlation_matrix(&table, &[Column::SymptomSeverity, Column::SleepHours]);
        let StatOutcome::Computed(matrix) = matrix else {
            panic!("expected a computed matrix");
        };
        assert_eq!(matrix.get(Column::SymptomSeverity, Column::SleepHours), None);
        assert_eq!(matrix.get(Column::SleepHours, Column::SleepHours), None);
    }

    #[test]
    fn test_trigger_example() {
        let mut high = HealthRecord::empty(date(2024, 1, 1));
        high.symptom_severity = Some(8);
        high.diet_notes = Some("pizza".to_string());
        let mut low = HealthRecord::empty(date(2024, 1, 2));
        low.symptom_severity = Some(3);
        let collection: EntryCollection = vec![high, low].into_iter().collect();

        let triggers = detect_triggers(&collection, 6);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[&date(2024, 1, 1)], "pizza");
    }

    #[test]
    fn test_gating_boundary() {
        let record = |d: u32, severity: u8, stress: u8, sleep: f64| {
            let mut r = HealthRecord::empty(date(2024, 4, d));
            r.symptom_severity = Some(severity);
            r.stress_level = Some(stress);
            r.sleep_hours = Some(sleep);
            r
        };

        let two: EntryCollection = vec![record(1, 5, 3, 7.0), record(2, 7, 6, 6.0)].into_iter().collect();
        let table = DerivedTable::derive(&TimeSeries::build(&two));
        assert!(!correlation_matrix(&table, &DEFAULT_MATRIX_COLUMNS).is_computed());
        assert!(!lagged_correlation(&table, Column::SymptomSeverity, &LAG_CANDIDATES).is_computed());

        let three: EntryCollection = vec![record(1, 5, 3, 7.0), record(2, 7, 6, 6.0), record(3, 4, 2, 8.0)]
            .into_iter()
            .collect();
        let table = DerivedTable::derive(&TimeSeries::build(&three));
        assert!(correlation_matrix(&table, &DEFAULT_MATRIX_COLUMNS).is_computed());
        assert!(lagged_correlation(&table, Column::SymptomSeverity, &LAG_CANDIDATES).is_computed());
    }
}
