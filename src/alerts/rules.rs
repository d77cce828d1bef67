use crate::error::{Error, Result};
use crate::models::{Reading, Sensor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRuleType {
    ThresholdHigh,
    ThresholdLow,
    ChangeRate,
}

impl FromStr for AlertRuleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "threshold_high" | "high" => Ok(AlertRuleType::ThresholdHigh),
            "threshold_low" | "low" => Ok(AlertRuleType::ThresholdLow),
            "change_rate" | "rate" => Ok(AlertRuleType::ChangeRate),
            other => Err(Error::Validation(format!("unknown alert rule type: {other}"))),
        }
    }
}

impl fmt::Display for AlertRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertRuleType::ThresholdHigh => "Threshold High",
            AlertRuleType::ThresholdLow => "Threshold Low",
            AlertRuleType::ChangeRate => "Change Rate",
        };
        write!(f, "{name}")
    }
}

/// A declarative condition checked against each incoming reading. Immutable
/// after creation; replacing a rule means remove + add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub sensor_id: String,
    pub rule_type: AlertRuleType,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AlertRule {
    pub fn new(sensor_id: impl Into<String>, rule_type: AlertRuleType, threshold: f64) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            rule_type,
            threshold,
            label: None,
        }
    }
}

/// Ordered collection of alert rules. Evaluation is a pure function of
/// (sensor, reading, rules); the triggered-alert log lives with the caller.
#[derive(Debug, Default)]
pub struct AlertRuleSet {
    rules: Vec<AlertRule>,
}

impl AlertRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after validating its required fields. Duplicate rules
    /// are allowed; there is no uniqueness constraint.
    pub fn add_rule(&mut self, rule: AlertRule) -> Result<()> {
        if rule.sensor_id.trim().is_empty() {
            return Err(Error::missing_field("sensor_id"));
        }
        if !rule.threshold.is_finite() {
            return Err(Error::Validation(format!(
                "threshold must be a finite number, got {}",
                rule.threshold
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Remove by position; `false` when the index is out of range, since
    /// UI-driven removal probes indices defensively.
    pub fn remove_rule(&mut self, index: usize) -> bool {
        if index < self.rules.len() {
            self.rules.remove(index);
            true
        } else {
            false
        }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Check a single reading against every rule for its sensor, in rule
    /// insertion order. All matching rules fire independently, so one reading
    /// can produce several messages. Threshold comparisons are strict; a
    /// value exactly at the threshold does not trigger.
    pub fn evaluate(&self, sensor: &Sensor, reading: &Reading) -> Vec<String> {
        let mut triggered = Vec::new();

        for rule in self.rules.iter().filter(|r| r.sensor_id == sensor.id) {
            match rule.rule_type {
                AlertRuleType::ThresholdHigh => {
                    if reading.value > rule.threshold {
                        triggered.push(format!(
                            "{} value {} exceeds threshold {}",
                            sensor.name, reading.value, rule.threshold
                        ));
                    }
                }
                AlertRuleType::ThresholdLow => {
                    if reading.value < rule.threshold {
                        triggered.push(format!(
                            "{} value {} is below threshold {}",
                            sensor.name, reading.value, rule.threshold
                        ));
                    }
                }
                // TODO: wire a previous-reading lookup into the store so
                // change-rate rules can compare against the prior value;
                // until then they match nothing.
                AlertRuleType::ChangeRate => {}
            }
        }

        triggered
    }
}
