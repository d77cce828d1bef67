//! Connection-parameter registry for the supported platforms.
//!
//! This is the only layer that reads the environment. Adapters receive
//! already-resolved values; the store, statistics and alert code never see
//! configuration at all.

use crate::platforms::PlatformKind;
use std::collections::HashMap;

/// One named connection parameter a platform needs.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub env_var: &'static str,
    pub sensitive: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PlatformSpec {
    pub kind: PlatformKind,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

const AWS_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        key: "endpoint",
        label: "AWS IoT Endpoint",
        default: "",
        env_var: "AWS_IOT_ENDPOINT",
        sensitive: false,
    },
    ParamSpec {
        key: "region",
        label: "AWS Region",
        default: "us-east-1",
        env_var: "AWS_REGION",
        sensitive: false,
    },
    ParamSpec {
        key: "access_key",
        label: "AWS Access Key ID",
        default: "",
        env_var: "AWS_ACCESS_KEY_ID",
        sensitive: true,
    },
    ParamSpec {
        key: "secret_key",
        label: "AWS Secret Access Key",
        default: "",
        env_var: "AWS_SECRET_ACCESS_KEY",
        sensitive: true,
    },
];

const AZURE_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        key: "connection_string",
        label: "Connection String",
        default: "",
        env_var: "AZURE_IOT_CONNECTION_STRING",
        sensitive: true,
    },
    ParamSpec {
        key: "hub_name",
        label: "IoT Hub Name",
        default: "",
        env_var: "AZURE_IOT_HUB_NAME",
        sensitive: false,
    },
];

const THINGSPEAK_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        key: "api_key",
        label: "API Key",
        default: "",
        env_var: "THINGSPEAK_API_KEY",
        sensitive: true,
    },
    ParamSpec {
        key: "channel_id",
        label: "Channel ID",
        default: "",
        env_var: "THINGSPEAK_CHANNEL_ID",
        sensitive: false,
    },
];

const MQTT_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        key: "broker",
        label: "Broker Address",
        default: "mqtt.eclipse.org",
        env_var: "MQTT_BROKER",
        sensitive: false,
    },
    ParamSpec {
        key: "port",
        label: "Port",
        default: "1883",
        env_var: "MQTT_PORT",
        sensitive: false,
    },
    ParamSpec {
        key: "username",
        label: "Username (optional)",
        default: "",
        env_var: "MQTT_USERNAME",
        sensitive: false,
    },
    ParamSpec {
        key: "password",
        label: "Password (optional)",
        default: "",
        env_var: "MQTT_PASSWORD",
        sensitive: true,
    },
    ParamSpec {
        key: "topics",
        label: "Topics (comma-separated)",
        default: "sensors/#",
        env_var: "MQTT_TOPICS",
        sensitive: false,
    },
];

const CUSTOM_API_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        key: "base_url",
        label: "Base URL",
        default: "https://api.example.com",
        env_var: "API_BASE_URL",
        sensitive: false,
    },
    ParamSpec {
        key: "api_key",
        label: "API Key (optional)",
        default: "",
        env_var: "API_KEY",
        sensitive: true,
    },
    ParamSpec {
        key: "username",
        label: "Username (optional)",
        default: "",
        env_var: "API_USERNAME",
        sensitive: false,
    },
    ParamSpec {
        key: "password",
        label: "Password (optional)",
        default: "",
        env_var: "API_PASSWORD",
        sensitive: true,
    },
];

pub const PLATFORMS: &[PlatformSpec] = &[
    PlatformSpec {
        kind: PlatformKind::AwsIot,
        description: "Amazon Web Services IoT Core platform",
        params: AWS_PARAMS,
    },
    PlatformSpec {
        kind: PlatformKind::AzureIot,
        description: "Microsoft Azure IoT Hub",
        params: AZURE_PARAMS,
    },
    PlatformSpec {
        kind: PlatformKind::ThingSpeak,
        description: "ThingSpeak IoT platform",
        params: THINGSPEAK_PARAMS,
    },
    PlatformSpec {
        kind: PlatformKind::Mqtt,
        description: "Generic MQTT broker",
        params: MQTT_PARAMS,
    },
    PlatformSpec {
        kind: PlatformKind::CustomApi,
        description: "Custom REST API endpoint",
        params: CUSTOM_API_PARAMS,
    },
];

pub fn platform_registry() -> &'static [PlatformSpec] {
    PLATFORMS
}

pub fn spec_for(kind: PlatformKind) -> &'static PlatformSpec {
    PLATFORMS
        .iter()
        .find(|spec| spec.kind == kind)
        .expect("every platform kind has a registry entry")
}

/// Merge connection parameters for one platform: explicit overrides win,
/// then the parameter's environment variable, then its default.
pub fn resolve_params(
    kind: PlatformKind,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut resolved = HashMap::new();
    for param in spec_for(kind).params {
        let value = overrides
            .get(param.key)
            .cloned()
            .or_else(|| std::env::var(param.env_var).ok())
            .unwrap_or_else(|| param.default.to_string());
        resolved.insert(param.key.to_string(), value);
    }
    resolved
}
