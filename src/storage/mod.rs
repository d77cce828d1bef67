// In-memory time-series storage, one ordered sequence per sensor.
pub mod export_import;

pub use export_import::ExportFormat;

use crate::error::Result;
use crate::models::Reading;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Session-scoped store of sensor readings keyed by sensor id. Each series
/// keeps insertion order; callers that need time order must insert in time
/// order, which matches streaming ingestion.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    series: HashMap<String, Vec<Reading>>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a reading to its sensor's series, creating the
    /// series lazily. Amortized O(1).
    pub fn insert(&mut self, reading: Reading) -> Result<()> {
        reading.validate()?;
        self.series
            .entry(reading.sensor_id.clone())
            .or_default()
            .push(reading);
        Ok(())
    }

    /// All entries with `start <= timestamp <= end`, inclusive on both ends,
    /// in stored order. Unknown sensors yield an empty result, not an error.
    pub fn query_range(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Reading> {
        match self.series.get(sensor_id) {
            Some(entries) => entries
                .iter()
                .filter(|r| r.timestamp >= start && r.timestamp <= end)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// The last-inserted reading for a sensor, if any.
    pub fn query_latest(&self, sensor_id: &str) -> Option<&Reading> {
        self.series.get(sensor_id).and_then(|entries| entries.last())
    }

    /// Delete stored readings. Four modes:
    /// - sensor + cutoff: drop that sensor's entries strictly older than the
    ///   cutoff (entries exactly at the cutoff are kept)
    /// - sensor only: drop everything for that sensor; `false` when it had
    ///   no stored entries
    /// - cutoff only: apply the cutoff across every sensor
    /// - neither: clear the whole store
    ///
    /// Every mode except "sensor only with no entries" reports `true`,
    /// including a cutoff prune for a sensor the store has never seen.
    pub fn prune(&mut self, sensor_id: Option<&str>, older_than: Option<DateTime<Utc>>) -> bool {
        match (sensor_id, older_than) {
            (Some(id), Some(cutoff)) => {
                if let Some(entries) = self.series.get_mut(id) {
                    entries.retain(|r| r.timestamp >= cutoff);
                    if entries.is_empty() {
                        self.series.remove(id);
                    }
                }
                true
            }
            (Some(id), None) => match self.series.remove(id) {
                Some(entries) => !entries.is_empty(),
                None => false,
            },
            (None, Some(cutoff)) => {
                for entries in self.series.values_mut() {
                    entries.retain(|r| r.timestamp >= cutoff);
                }
                self.series.retain(|_, entries| !entries.is_empty());
                true
            }
            (None, None) => {
                self.series.clear();
                true
            }
        }
    }

    /// Sensor ids with at least one stored entry, sorted for stable output.
    pub fn list_sensors_with_data(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .series
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Full stored series for one sensor, in insertion order.
    pub fn series(&self, sensor_id: &str) -> &[Reading] {
        self.series.get(sensor_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, sensor_id: &str) -> usize {
        self.series.get(sensor_id).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, min, 0).unwrap()
    }

    fn reading(sensor: &str, min: u32, value: f64) -> Reading {
        Reading::new(sensor, ts(min), value, "°C")
    }

    #[test]
    fn test_insert_then_latest_returns_the_reading() {
        let mut store = TimeSeriesStore::new();
        let r = reading("s1", 0, 21.5);
        store.insert(r.clone()).unwrap();
        assert_eq!(store.query_latest("s1"), Some(&r));
    }

    #[test]
    fn test_latest_on_missing_sensor_is_none() {
        let store = TimeSeriesStore::new();
        assert!(store.query_latest("nope").is_none());
    }

    #[test]
    fn test_insert_rejects_invalid_reading() {
        let mut store = TimeSeriesStore::new();
        assert!(store.insert(reading("", 0, 1.0)).is_err());
        assert!(store.insert(reading("s1", 0, f64::NAN)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_query_range_is_inclusive_both_ends() {
        let mut store = TimeSeriesStore::new();
        for (min, value) in [(0, 1.0), (5, 2.0), (10, 3.0)] {
            store.insert(reading("s1", min, value)).unwrap();
        }
        let result = store.query_range("s1", ts(0), ts(10));
        assert_eq!(result.len(), 3);
        let result = store.query_range("s1", ts(1), ts(9));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value, 2.0);
    }

    #[test]
    fn test_query_range_unknown_sensor_is_empty() {
        let store = TimeSeriesStore::new();
        assert!(store.query_range("nope", ts(0), ts(10)).is_empty());
    }

    #[test]
    fn test_query_range_monotonic_widening() {
        let mut store = TimeSeriesStore::new();
        for min in [2, 4, 6, 8] {
            store.insert(reading("s1", min, min as f64)).unwrap();
        }
        let narrow = store.query_range("s1", ts(3), ts(7));
        let wide = store.query_range("s1", ts(2), ts(8));
        for r in &narrow {
            assert!(wide.contains(r));
        }
    }

    #[test]
    fn test_query_range_preserves_insertion_order() {
        let mut store = TimeSeriesStore::new();
        // Out-of-time-order inserts stay in insertion order on read.
        store.insert(reading("s1", 10, 1.0)).unwrap();
        store.insert(reading("s1", 2, 2.0)).unwrap();
        let result = store.query_range("s1", ts(0), ts(20));
        assert_eq!(result[0].value, 1.0);
        assert_eq!(result[1].value, 2.0);
    }

    #[test]
    fn test_prune_with_cutoff_keeps_boundary_entry() {
        let mut store = TimeSeriesStore::new();
        for min in [0, 5, 10] {
            store.insert(reading("s1", min, 1.0)).unwrap();
        }
        assert!(store.prune(Some("s1"), Some(ts(5))));
        let remaining = store.series("s1");
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].timestamp, ts(5));
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut store = TimeSeriesStore::new();
        for min in [0, 5, 10] {
            store.insert(reading("s1", min, 1.0)).unwrap();
        }
        store.prune(Some("s1"), Some(ts(5)));
        let once: Vec<_> = store.series("s1").to_vec();
        store.prune(Some("s1"), Some(ts(5)));
        assert_eq!(store.series("s1"), once.as_slice());
    }

    #[test]
    fn test_prune_sensor_only_clears_series() {
        let mut store = TimeSeriesStore::new();
        store.insert(reading("s1", 0, 1.0)).unwrap();
        assert!(store.prune(Some("s1"), None));
        assert_eq!(store.len("s1"), 0);
        // A second sensor-only prune finds nothing to delete.
        assert!(!store.prune(Some("s1"), None));
    }

    #[test]
    fn test_prune_unknown_sensor_without_cutoff_is_false() {
        let mut store = TimeSeriesStore::new();
        assert!(!store.prune(Some("ghost"), None));
        // With a cutoff the same sensor no-ops successfully.
        assert!(store.prune(Some("ghost"), Some(ts(0))));
    }

    #[test]
    fn test_prune_cutoff_only_spans_all_sensors() {
        let mut store = TimeSeriesStore::new();
        store.insert(reading("s1", 0, 1.0)).unwrap();
        store.insert(reading("s2", 10, 2.0)).unwrap();
        assert!(store.prune(None, Some(ts(5))));
        assert_eq!(store.len("s1"), 0);
        assert_eq!(store.len("s2"), 1);
    }

    #[test]
    fn test_prune_neither_clears_everything() {
        let mut store = TimeSeriesStore::new();
        store.insert(reading("s1", 0, 1.0)).unwrap();
        store.insert(reading("s2", 0, 2.0)).unwrap();
        assert!(store.prune(None, None));
        assert!(store.is_empty());
        // Clearing an already-empty store still reports success.
        assert!(store.prune(None, None));
    }

    #[test]
    fn test_list_sensors_with_data() {
        let mut store = TimeSeriesStore::new();
        store.insert(reading("s2", 0, 1.0)).unwrap();
        store.insert(reading("s1", 0, 1.0)).unwrap();
        assert_eq!(store.list_sensors_with_data(), vec!["s1", "s2"]);
        store.prune(Some("s1"), None);
        assert_eq!(store.list_sensors_with_data(), vec!["s2"]);
    }
}
