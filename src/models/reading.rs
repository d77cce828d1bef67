use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One timestamped scalar observation from a sensor. Immutable once created;
/// binary sensors (motion) report 0.0/1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Reading {
    pub fn new(
        sensor_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp,
            value,
            unit: unit.into(),
            attributes: HashMap::new(),
        }
    }

    /// Boundary validation applied on every store insert.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_id.trim().is_empty() {
            return Err(Error::missing_field("sensor_id"));
        }
        if !self.value.is_finite() {
            return Err(Error::Validation(format!(
                "value must be a finite number, got {}",
                self.value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_reading_passes() {
        let reading = Reading::new("aws-temp-001", ts(), 21.5, "°C");
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_empty_sensor_id_rejected() {
        let reading = Reading::new("", ts(), 21.5, "°C");
        let err = reading.validate().unwrap_err();
        assert!(err.to_string().contains("sensor_id"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let reading = Reading::new("aws-temp-001", ts(), f64::NAN, "°C");
        assert!(reading.validate().is_err());

        let reading = Reading::new("aws-temp-001", ts(), f64::INFINITY, "°C");
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_zero_is_a_valid_value() {
        let reading = Reading::new("aws-motion-001", ts(), 0.0, "binary");
        assert!(reading.validate().is_ok());
    }
}
