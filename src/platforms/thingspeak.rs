use super::{SourceAdapter, param, simulate};
use crate::error::{Error, Result};
use crate::models::{Reading, Sensor, SensorType};
use crate::utils::time::now_second;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// ThingSpeak channel integration. Channel feeds map fields to sensors;
/// ids embed the channel so several channels can coexist in one store.
pub struct ThingSpeakAdapter {
    api_key: String,
    channel_id: String,
    connected: bool,
}

impl ThingSpeakAdapter {
    pub fn new(params: &HashMap<String, String>) -> Self {
        Self {
            api_key: param(params, "api_key"),
            channel_id: param(params, "channel_id"),
            connected: false,
        }
    }

    fn classify(&self, sensor_id: &str) -> Result<(SensorType, &'static str)> {
        if sensor_id.contains("temp") {
            Ok((SensorType::Temperature, "°C"))
        } else if sensor_id.contains("humid") {
            Ok((SensorType::Humidity, "%"))
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
impl SourceAdapter for ThingSpeakAdapter {
    fn platform_name(&self) -> &str {
        "ThingSpeak"
    }

    async fn test_connection(&mut self) -> bool {
        self.connected = !self.api_key.is_empty() && !self.channel_id.is_empty();
        self.connected
    }

    fn discover_sensors(&self) -> Vec<Sensor> {
        if !self.connected {
            return Vec::new();
        }

        vec![
            Sensor::new(
                format!("ts-temp-{}", self.channel_id),
                "ThingSpeak Temperature Sensor",
                SensorType::Temperature,
                "Bedroom",
            )
            .with_metadata("channel_id", &self.channel_id)
            .with_metadata("field", "field1"),
            Sensor::new(
                format!("ts-humid-{}", self.channel_id),
                "ThingSpeak Humidity Sensor",
                SensorType::Humidity,
                "Bedroom",
            )
            .with_metadata("channel_id", &self.channel_id)
            .with_metadata("field", "field2"),
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
        // ThingSpeak feeds update slowly; wider sampling steps.
        Ok(simulate::historical_series(sensor_id, kind, unit, start, end, 5, 10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> HashMap<String, String> {
        [("api_key", "KEY"), ("channel_id", "12345")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_connect_requires_key_and_channel() {
        let mut adapter = ThingSpeakAdapter::new(&HashMap::new());
        assert!(!adapter.test_connection().await);

        let only_key: HashMap<_, _> = [("api_key".to_string(), "KEY".to_string())].into();
        let mut adapter = ThingSpeakAdapter::new(&only_key);
        assert!(!adapter.test_connection().await);

        let mut adapter = ThingSpeakAdapter::new(&params());
        assert!(adapter.test_connection().await);
    }

    #[tokio::test]
    async fn test_sensor_ids_embed_channel() {
        let mut adapter = ThingSpeakAdapter::new(&params());
        adapter.test_connection().await;
        let sensors = adapter.discover_sensors();
        assert!(sensors.iter().any(|s| s.id == "ts-temp-12345"));
        assert!(sensors.iter().any(|s| s.id == "ts-humid-12345"));
    }

    #[tokio::test]
    async fn test_not_connected_error_names_platform() {
        let adapter = ThingSpeakAdapter::new(&params());
        match adapter.get_latest("ts-temp-12345").await {
            Err(Error::NotConnected(platform)) => assert_eq!(platform, "ThingSpeak"),
            other => panic!("expected NotConnected, got {other:?}"),
        }
    }
}
