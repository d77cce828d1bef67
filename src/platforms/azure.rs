use super::{SourceAdapter, param, simulate};
use crate::error::{Error, Result};
use crate::models::{Reading, Sensor, SensorType};
use crate::utils::time::now_second;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Azure IoT Hub integration.
pub struct AzureIotAdapter {
    connection_string: String,
    hub_name: String,
    connected: bool,
}

impl AzureIotAdapter {
    pub fn new(params: &HashMap<String, String>) -> Self {
        Self {
            connection_string: param(params, "connection_string"),
            hub_name: param(params, "hub_name"),
            connected: false,
        }
    }

    fn classify(&self, sensor_id: &str) -> Result<(SensorType, &'static str)> {
        if sensor_id.contains("temp") {
            Ok((SensorType::Temperature, "°C"))
        } else if sensor_id.contains("pressure") {
            Ok((SensorType::Pressure, "hPa"))
        } else if sensor_id.contains("light") {
            Ok((SensorType::Light, "lux"))
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
impl SourceAdapter for AzureIotAdapter {
    fn platform_name(&self) -> &str {
        "Azure IoT Hub"
    }

    async fn test_connection(&mut self) -> bool {
        self.connected = !self.connection_string.is_empty();
        debug!(hub = %self.hub_name, connected = self.connected, "azure connection check");
        self.connected
    }

    fn discover_sensors(&self) -> Vec<Sensor> {
        if !self.connected {
            return Vec::new();
        }

        vec![
            Sensor::new(
                "azure-temp-001",
                "Azure Temperature Sensor 1",
                SensorType::Temperature,
                "Kitchen",
            )
            .with_metadata("manufacturer", "Microsoft")
            .with_metadata("model", "AzureTempSensor")
            .with_metadata("firmware", "2.1.3"),
            Sensor::new(
                "azure-pressure-001",
                "Azure Pressure Sensor 1",
                SensorType::Pressure,
                "Outdoor",
            )
            .with_metadata("manufacturer", "Microsoft")
            .with_metadata("model", "AzurePressureSensor")
            .with_metadata("firmware", "1.0.5"),
            Sensor::new(
                "azure-light-001",
                "Azure Light Sensor 1",
                SensorType::Light,
                "Living Room",
            )
            .with_metadata("manufacturer", "Microsoft")
            .with_metadata("model", "AzureLightSensor")
            .with_metadata("firmware", "1.2.0"),
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

    fn params() -> HashMap<String, String> {
        [("connection_string", "HostName=hub;SharedAccessKey=k")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_connect_requires_connection_string() {
        let mut adapter = AzureIotAdapter::new(&HashMap::new());
        assert!(!adapter.test_connection().await);

        let mut adapter = AzureIotAdapter::new(&params());
        assert!(adapter.test_connection().await);
    }

    #[tokio::test]
    async fn test_discovery_catalog() {
        let mut adapter = AzureIotAdapter::new(&params());
        adapter.test_connection().await;
        let sensors = adapter.discover_sensors();
        assert_eq!(sensors.len(), 3);
        assert!(sensors.iter().any(|s| s.kind == SensorType::Pressure));
    }

    #[tokio::test]
    async fn test_pressure_reading_unit() {
        let mut adapter = AzureIotAdapter::new(&params());
        adapter.test_connection().await;
        let reading = adapter.get_latest("azure-pressure-001").await.unwrap();
        assert_eq!(reading.unit, "hPa");
        assert!((980.0..=1020.0).contains(&reading.value));
    }
}
