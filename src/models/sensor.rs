use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named, typed data source identified by a stable id. Built by a platform
/// adapter at discovery time and never mutated afterwards; the store only
/// references `Sensor::id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SensorType,
    pub location: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Sensor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: SensorType,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            location: location.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Humidity,
    Pressure,
    Co2,
    Light,
    Motion,
    Occupancy,
    Other,
}

impl SensorType {
    /// Default measurement unit reported for this sensor type.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorType::Temperature => "°C",
            SensorType::Humidity => "%",
            SensorType::Pressure => "hPa",
            SensorType::Co2 => "ppm",
            SensorType::Light => "lux",
            SensorType::Motion => "binary",
            SensorType::Occupancy => "count",
            SensorType::Other => "value",
        }
    }

    /// Format a value the way this sensor type is usually read: one decimal
    /// for continuous measurements, whole numbers for counts, active/inactive
    /// for motion.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            SensorType::Temperature | SensorType::Humidity | SensorType::Pressure => {
                format!("{value:.1}")
            }
            SensorType::Co2 | SensorType::Light | SensorType::Occupancy => {
                format!("{}", value as i64)
            }
            SensorType::Motion => {
                if value != 0.0 { "Active" } else { "Inactive" }.to_string()
            }
            SensorType::Other => format!("{value}"),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorType::Temperature => "temperature",
            SensorType::Humidity => "humidity",
            SensorType::Pressure => "pressure",
            SensorType::Co2 => "co2",
            SensorType::Light => "light",
            SensorType::Motion => "motion",
            SensorType::Occupancy => "occupancy",
            SensorType::Other => "other",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_units() {
        assert_eq!(SensorType::Temperature.unit(), "°C");
        assert_eq!(SensorType::Motion.unit(), "binary");
        assert_eq!(SensorType::Occupancy.unit(), "count");
    }

    #[test]
    fn test_format_value_by_type() {
        assert_eq!(SensorType::Temperature.format_value(21.46), "21.5");
        assert_eq!(SensorType::Co2.format_value(612.0), "612");
        assert_eq!(SensorType::Motion.format_value(1.0), "Active");
        assert_eq!(SensorType::Motion.format_value(0.0), "Inactive");
    }

    #[test]
    fn test_sensor_builder() {
        let sensor = Sensor::new("aws-temp-001", "Temp 1", SensorType::Temperature, "Lab")
            .with_metadata("manufacturer", "AWS");
        assert_eq!(sensor.metadata.get("manufacturer").unwrap(), "AWS");
    }
}
