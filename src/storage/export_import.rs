use crate::error::{Error, Result};
use crate::models::Reading;
use crate::storage::TimeSeriesStore;
use crate::utils::time::{format_timestamp, parse_timestamp};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Row-oriented formats a sensor series can be exchanged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TimeSeriesStore {
    /// Write one sensor's full series to `path`. CSV rows carry
    /// `sensor_id,timestamp,value,unit` with second-precision timestamps;
    /// JSON is the serialized reading array. Returns the number of rows
    /// written (an empty series produces a header-only CSV / empty array).
    pub fn export(&self, sensor_id: &str, path: &Path, format: ExportFormat) -> Result<usize> {
        let entries = self.series(sensor_id);

        match format {
            ExportFormat::Csv => {
                let mut csv_content = String::new();
                csv_content.push_str("sensor_id,timestamp,value,unit\n");

                for reading in entries {
                    csv_content.push_str(&format!(
                        "\"{}\",\"{}\",{},\"{}\"\n",
                        reading.sensor_id,
                        format_timestamp(reading.timestamp),
                        reading.value,
                        reading.unit
                    ));
                }

                fs::write(path, csv_content)?;
            }
            ExportFormat::Json => {
                let json_content = serde_json::to_string_pretty(entries)?;
                fs::write(path, json_content)?;
            }
        }

        Ok(entries.len())
    }

    /// Read rows from `path` and insert them under `sensor_id`, overriding
    /// whatever sensor id the file carries. Each row goes through `insert`,
    /// so validation and insertion-order semantics are re-applied; the file
    /// is not assumed to be time-sorted. Returns the imported row count.
    pub fn import(&mut self, sensor_id: &str, path: &Path, format: ExportFormat) -> Result<usize> {
        let contents = fs::read_to_string(path)?;
        let mut imported = 0;

        match format {
            ExportFormat::Csv => {
                for line in contents.lines().skip(1) {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let mut reading = parse_csv_row(line)?;
                    reading.sensor_id = sensor_id.to_string();
                    self.insert(reading)?;
                    imported += 1;
                }
            }
            ExportFormat::Json => {
                let readings: Vec<Reading> = serde_json::from_str(&contents)?;
                for mut reading in readings {
                    reading.sensor_id = sensor_id.to_string();
                    self.insert(reading)?;
                    imported += 1;
                }
            }
        }

        Ok(imported)
    }
}

fn parse_csv_row(line: &str) -> Result<Reading> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim().trim_matches('"')).collect();
    if fields.len() < 4 {
        return Err(Error::Validation(format!(
            "malformed csv row (expected 4 columns): {line}"
        )));
    }

    let timestamp = parse_timestamp(fields[1])?;
    let value: f64 = fields[2]
        .parse()
        .map_err(|_| Error::Validation(format!("invalid value in csv row: {}", fields[2])))?;

    Ok(Reading::new(fields[0], timestamp, value, fields[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn ts(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, min, 0).unwrap()
    }

    fn seeded_store() -> TimeSeriesStore {
        let mut store = TimeSeriesStore::new();
        for (min, value) in [(0, 21.5), (5, 22.0), (10, 0.0)] {
            store
                .insert(Reading::new("s1", ts(min), value, "°C"))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "excel".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_round_trip_preserves_value_timestamp_multiset() {
        let store = seeded_store();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s1.csv");

        assert_eq!(store.export("s1", &path, ExportFormat::Csv).unwrap(), 3);

        let mut fresh = TimeSeriesStore::new();
        assert_eq!(fresh.import("s1", &path, ExportFormat::Csv).unwrap(), 3);

        let mut original: Vec<(i64, String)> = store
            .series("s1")
            .iter()
            .map(|r| (r.timestamp.timestamp(), r.value.to_string()))
            .collect();
        let mut imported: Vec<(i64, String)> = fresh
            .series("s1")
            .iter()
            .map(|r| (r.timestamp.timestamp(), r.value.to_string()))
            .collect();
        original.sort();
        imported.sort();
        assert_eq!(original, imported);
    }

    #[test]
    fn test_json_round_trip() {
        let store = seeded_store();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s1.json");

        store.export("s1", &path, ExportFormat::Json).unwrap();

        let mut fresh = TimeSeriesStore::new();
        assert_eq!(fresh.import("s1", &path, ExportFormat::Json).unwrap(), 3);
        assert_eq!(fresh.series("s1"), store.series("s1"));
    }

    #[test]
    fn test_import_overrides_sensor_id_from_file() {
        let store = seeded_store();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s1.csv");
        store.export("s1", &path, ExportFormat::Csv).unwrap();

        let mut fresh = TimeSeriesStore::new();
        fresh.import("renamed", &path, ExportFormat::Csv).unwrap();
        assert_eq!(fresh.len("renamed"), 3);
        assert_eq!(fresh.len("s1"), 0);
        assert!(fresh.series("renamed").iter().all(|r| r.sensor_id == "renamed"));
    }

    #[test]
    fn test_export_empty_series_writes_header_only() {
        let store = TimeSeriesStore::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        assert_eq!(store.export("ghost", &path, ExportFormat::Csv).unwrap(), 0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);

        let mut fresh = TimeSeriesStore::new();
        assert_eq!(fresh.import("ghost", &path, ExportFormat::Csv).unwrap(), 0);
    }

    #[test]
    fn test_import_rejects_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "sensor_id,timestamp,value,unit\nonly,two\n").unwrap();

        let mut store = TimeSeriesStore::new();
        assert!(store.import("s1", &path, ExportFormat::Csv).is_err());
    }
}
