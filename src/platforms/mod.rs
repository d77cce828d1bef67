// Platform integrations. Each adapter normalizes its platform's data into
// `Reading` values; the core treats all of them through one contract.
pub mod aws;
pub mod azure;
pub mod custom_api;
pub mod mqtt;
pub mod simulate;
pub mod thingspeak;

pub use aws::AwsIotAdapter;
pub use azure::AzureIotAdapter;
pub use custom_api::CustomApiAdapter;
pub use mqtt::MqttAdapter;
pub use thingspeak::ThingSpeakAdapter;

use crate::error::{Error, Result};
use crate::models::{Reading, Sensor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Capability contract every platform integration implements. Adapters own
/// their connection state; operations other than `test_connection` fail with
/// `Error::NotConnected` until a connect has succeeded.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable platform name for logs and error messages.
    fn platform_name(&self) -> &str;

    /// Attempt to establish/verify connectivity. Returns whether the
    /// adapter is now connected.
    async fn test_connection(&mut self) -> bool;

    /// Sensors this platform exposes; empty when not connected.
    fn discover_sensors(&self) -> Vec<Sensor>;

    /// Most recent reading for a sensor.
    async fn get_latest(&self, sensor_id: &str) -> Result<Reading>;

    /// Readings between `start` and `end`, inclusive on both ends.
    async fn get_historical(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformKind {
    AwsIot,
    AzureIot,
    ThingSpeak,
    Mqtt,
    CustomApi,
}

impl PlatformKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformKind::AwsIot => "AWS IoT Core",
            PlatformKind::AzureIot => "Azure IoT Hub",
            PlatformKind::ThingSpeak => "ThingSpeak",
            PlatformKind::Mqtt => "MQTT Broker",
            PlatformKind::CustomApi => "Custom API",
        }
    }

    /// Short name used on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            PlatformKind::AwsIot => "aws-iot",
            PlatformKind::AzureIot => "azure-iot",
            PlatformKind::ThingSpeak => "thingspeak",
            PlatformKind::Mqtt => "mqtt",
            PlatformKind::CustomApi => "custom-api",
        }
    }
}

impl FromStr for PlatformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "aws-iot" | "aws" | "aws iot core" => Ok(PlatformKind::AwsIot),
            "azure-iot" | "azure" | "azure iot hub" => Ok(PlatformKind::AzureIot),
            "thingspeak" => Ok(PlatformKind::ThingSpeak),
            "mqtt" | "mqtt broker" => Ok(PlatformKind::Mqtt),
            "custom-api" | "custom" | "api" => Ok(PlatformKind::CustomApi),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Build an adapter from resolved connection parameters.
pub fn create_adapter(
    kind: PlatformKind,
    params: &HashMap<String, String>,
) -> Box<dyn SourceAdapter> {
    match kind {
        PlatformKind::AwsIot => Box::new(AwsIotAdapter::new(params)),
        PlatformKind::AzureIot => Box::new(AzureIotAdapter::new(params)),
        PlatformKind::ThingSpeak => Box::new(ThingSpeakAdapter::new(params)),
        PlatformKind::Mqtt => Box::new(MqttAdapter::new(params)),
        PlatformKind::CustomApi => Box::new(CustomApiAdapter::new(params)),
    }
}

pub(crate) fn param(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).cloned().unwrap_or_default()
}
