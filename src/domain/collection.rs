/// The date-keyed collection of all health records

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::HealthRecord;

/// Mapping from calendar day to that day's record
///
/// At most one record exists per date; inserting a record for a date that is
/// already present replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryCollection {
    entries: BTreeMap<NaiveDate, HealthRecord>,
}

impl EntryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for its date, returning the previous one
    ///
    /// The record's own `date` is the key.
    pub fn insert(&mut self, record: HealthRecord) -> Option<HealthRecord> {
        self.entries.insert(record.date, record)
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&HealthRecord> {
        self.entries.get(date)
    }

    pub fn remove(&mut self, date: &NaiveDate) -> Option<HealthRecord> {
        self.entries.remove(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.entries.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in ascending date order
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &HealthRecord> {
        self.entries.values()
    }

    pub fn dates(&self) -> impl DoubleEndedIterator<Item = &NaiveDate> {
        self.entries.keys()
    }

    /// The subset of this collection whose dates appear in `dates`
    pub fn subset<'a, I>(&self, dates: I) -> EntryCollection
    where
        I: IntoIterator<Item = &'a NaiveDate>,
    {
        dates
            .into_iter()
            .filter_map(|date| self.entries.get(date).cloned())
            .collect()
    }
}

impl FromIterator<HealthRecord> for EntryCollection {
    fn from_iter<T: IntoIterator<Item = HealthRecord>>(iter: T) -> Self {
        let mut collection = EntryCollection::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}

impl IntoIterator for EntryCollection {
    type Item = HealthRecord;
    type IntoIter = std::collections::btree_map::IntoValues<NaiveDate, HealthRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_insert_overwrites_same_date() {
        let mut collection = EntryCollection::new();
        let mut first = HealthRecord::empty(day(1));
        first.symptom_severity = Some(3);
        let mut second = HealthRecord::empty(day(1));
        second.symptom_severity = Some(8);

        assert!(collection.insert(first).is_none());
        assert!(collection.insert(second).is_some());
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&day(1)).unwrap().symptom_severity, Some(8));
    }

    #[test]
    fn test_subset_keeps_only_present_dates() {
        let collection: EntryCollection = [1, 3, 5]
            .into_iter()
            .map(|d| HealthRecord::empty(day(d)))
            .collect();

        let subset = collection.subset(&[day(1), day(2), day(3)]);
        assert_eq!(subset.len(), 2);
        assert!(subset.contains(&day(1)));
        assert!(!subset.contains(&day(5)));
    }
}
