use crate::alerts::rules::{AlertRule, AlertRuleType};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub alert_rules: Vec<AlertRuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between monitoring cycles.
    pub refresh_interval_secs: u64,
    /// Readings older than this many days are pruned after each cycle;
    /// 0 disables retention pruning.
    pub max_history_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub default_channel: String, // "email", "sms" or "webhook"
    pub webhook_url: String,
    pub email_from: String,
    pub email_to: Vec<String>,
    pub sms_number: String,
}

/// Persisted form of an alert rule; `rule_type` stays a plain string so a
/// hand-edited config fails at load with a pointed message instead of a
/// serde enum error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRuleEntry {
    pub sensor_id: String,
    pub rule_type: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AlertRuleEntry {
    pub fn to_rule(&self) -> Result<AlertRule> {
        let rule_type: AlertRuleType = self
            .rule_type
            .parse()
            .with_context(|| format!("alert rule for sensor {}", self.sensor_id))?;
        Ok(AlertRule {
            sensor_id: self.sensor_id.clone(),
            rule_type,
            threshold: self.threshold,
            label: self.label.clone(),
        })
    }

    pub fn from_rule(rule: &AlertRule) -> Self {
        Self {
            sensor_id: rule.sensor_id.clone(),
            rule_type: rule.rule_type.to_string().to_lowercase().replace(' ', "_"),
            threshold: rule.threshold,
            label: rule.label.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                refresh_interval_secs: 5,
                max_history_days: 30,
            },
            notifications: NotificationsConfig::default(),
            alert_rules: Vec::new(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_channel: "email".to_string(),
            webhook_url: String::new(),
            email_from: String::new(),
            email_to: Vec::new(),
            sms_number: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let mut contents = String::new();
        contents.push_str("# sensorhub configuration\n");
        contents.push_str("# Platform credentials are NOT stored here; pass them per-run with\n");
        contents.push_str("# --param or the platform's environment variables (see `sensorhub platforms`).\n\n");
        contents.push_str(&toml::to_string_pretty(self).context("Failed to serialize config")?);

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("sensorhub").join("config.toml"))
    }
}
