use super::{SourceAdapter, param, simulate};
use crate::error::{Error, Result};
use crate::models::{Reading, Sensor, SensorType};
use crate::utils::time::now_second;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// AWS IoT Core integration. Device-shadow and TimeStream calls would live
/// behind `get_latest`/`get_historical`; connectivity is credential-presence
/// based and data is synthesized.
pub struct AwsIotAdapter {
    endpoint: String,
    access_key: String,
    secret_key: String,
    region: String,
    connected: bool,
}

impl AwsIotAdapter {
    pub fn new(params: &HashMap<String, String>) -> Self {
        Self {
            endpoint: param(params, "endpoint"),
            access_key: param(params, "access_key"),
            secret_key: param(params, "secret_key"),
            region: if param(params, "region").is_empty() {
                "us-east-1".to_string()
            } else {
                param(params, "region")
            },
            connected: false,
        }
    }

    fn classify(&self, sensor_id: &str) -> Result<(SensorType, &'static str)> {
        if sensor_id.contains("temp") {
            Ok((SensorType::Temperature, "°C"))
        } else if sensor_id.contains("humid") {
            Ok((SensorType::Humidity, "%"))
        } else if sensor_id.contains("motion") {
            Ok((SensorType::Motion, "binary"))
        } else {
            Err(Error::UnknownSensor(sensor_id.to_string()))
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(Error::NotConnected(self.platform_name().to_string()))
        }
    }
}

#[async_trait]
impl SourceAdapter for AwsIotAdapter {
    fn platform_name(&self) -> &str {
        "AWS IoT Core"
    }

    async fn test_connection(&mut self) -> bool {
        self.connected = !self.endpoint.is_empty()
            && !self.access_key.is_empty()
            && !self.secret_key.is_empty();
        debug!(region = %self.region, connected = self.connected, "aws connection check");
        self.connected
    }

    fn discover_sensors(&self) -> Vec<Sensor> {
        if !self.connected {
            return Vec::new();
        }

        vec![
            Sensor::new(
                "aws-temp-001",
                "AWS Temperature Sensor 1",
                SensorType::Temperature,
                "Living Room",
            )
            .with_metadata("manufacturer", "AWS")
            .with_metadata("model", "TempSensor")
            .with_metadata("firmware", "1.2.3"),
            Sensor::new(
                "aws-humid-001",
                "AWS Humidity Sensor 1",
                SensorType::Humidity,
                "Living Room",
            )
            .with_metadata("manufacturer", "AWS")
            .with_metadata("model", "HumidSensor")
            .with_metadata("firmware", "1.1.0"),
            Sensor::new(
                "aws-motion-001",
                "AWS Motion Sensor 1",
                SensorType::Motion,
                "Entrance",
            )
            .with_metadata("manufacturer", "AWS")
            .with_metadata("model", "MotionSensor")
            .with_metadata("firmware", "2.0.1"),
        ]
    }

    async fn get_latest(&self, sensor_id: &str) -> Result<Reading> {
        self.ensure_connected()?;
        let (kind, unit) = self.classify(sensor_id)?;
        Ok(Reading::new(sensor_id, now_second(), simulate::spot_value(kind), unit))
    }

    async fn get_historical(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>> {
        self.ensure_connected()?;
        let (kind, unit) = self.classify(sensor_id)?;
        Ok(simulate::historical_series(sensor_id, kind, unit, start, end, 1, 5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_params() -> HashMap<String, String> {
        [
            ("endpoint", "iot.example.amazonaws.com"),
            ("access_key", "AKIA123"),
            ("secret_key", "shhh"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn test_connect_requires_credentials() {
        let mut adapter = AwsIotAdapter::new(&HashMap::new());
        assert!(!adapter.test_connection().await);

        let mut adapter = AwsIotAdapter::new(&full_params());
        assert!(adapter.test_connection().await);
    }

    #[tokio::test]
    async fn test_discovery_requires_connection() {
        let mut adapter = AwsIotAdapter::new(&full_params());
        assert!(adapter.discover_sensors().is_empty());

        adapter.test_connection().await;
        let sensors = adapter.discover_sensors();
        assert_eq!(sensors.len(), 3);
        assert!(sensors.iter().any(|s| s.id == "aws-motion-001"));
    }

    #[tokio::test]
    async fn test_latest_reading_matches_sensor_type() {
        let mut adapter = AwsIotAdapter::new(&full_params());
        adapter.test_connection().await;

        let reading = adapter.get_latest("aws-temp-001").await.unwrap();
        assert_eq!(reading.sensor_id, "aws-temp-001");
        assert_eq!(reading.unit, "°C");
        assert!(reading.validate().is_ok());

        let reading = adapter.get_latest("aws-motion-001").await.unwrap();
        assert!(reading.value == 0.0 || reading.value == 1.0);
    }

    #[tokio::test]
    async fn test_unknown_sensor_id_pattern() {
        let mut adapter = AwsIotAdapter::new(&full_params());
        adapter.test_connection().await;
        assert!(matches!(
            adapter.get_latest("aws-sonar-001").await,
            Err(Error::UnknownSensor(_))
        ));
    }

    #[tokio::test]
    async fn test_historical_respects_bounds() {
        use chrono::TimeZone;
        let mut adapter = AwsIotAdapter::new(&full_params());
        adapter.test_connection().await;

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let series = adapter.get_historical("aws-humid-001", start, end).await.unwrap();
        assert!(!series.is_empty());
        assert!(series.iter().all(|r| r.timestamp >= start && r.timestamp <= end));
    }
}
