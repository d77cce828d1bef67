use crate::alerts::history::TriggeredAlert;
use crate::alerts::rules::AlertRule;
use crate::analysis::SeriesSummary;
use crate::config::platforms::PlatformSpec;
use crate::models::{Reading, Sensor};
use crate::utils::time::format_timestamp;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Items that can render either as a table or as JSON.
pub trait OutputFormat {
    fn to_table(&self) -> String;
    fn to_json(&self) -> Result<String, serde_json::Error>;
}

#[derive(Tabled, Serialize, Debug)]
pub struct ReadingRow {
    #[tabled(rename = "Sensor")]
    pub sensor: String,
    #[tabled(rename = "Timestamp")]
    pub timestamp: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
}

impl ReadingRow {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            sensor: reading.sensor_id.clone(),
            timestamp: format_timestamp(reading.timestamp),
            value: reading.value.to_string(),
            unit: reading.unit.clone(),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct SensorRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Location")]
    pub location: String,
}

impl SensorRow {
    pub fn from_sensor(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id.clone(),
            name: sensor.name.clone(),
            kind: sensor.kind.to_string(),
            location: sensor.location.clone(),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct StatsRow {
    #[tabled(rename = "Statistic")]
    pub statistic: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

impl StatsRow {
    pub fn from_summary(summary: &SeriesSummary) -> Vec<Self> {
        vec![
            StatsRow { statistic: "min".to_string(), value: stat(summary.min) },
            StatsRow { statistic: "max".to_string(), value: stat(summary.max) },
            StatsRow { statistic: "mean".to_string(), value: stat(summary.mean) },
            StatsRow { statistic: "median".to_string(), value: stat(summary.median) },
            StatsRow { statistic: "stddev".to_string(), value: stat(summary.stddev) },
        ]
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct RuleRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Sensor")]
    pub sensor: String,
    #[tabled(rename = "Type")]
    pub rule_type: String,
    #[tabled(rename = "Threshold")]
    pub threshold: String,
    #[tabled(rename = "Label")]
    pub label: String,
}

impl RuleRow {
    pub fn from_rule(index: usize, rule: &AlertRule) -> Self {
        Self {
            index,
            sensor: rule.sensor_id.clone(),
            rule_type: rule.rule_type.to_string(),
            threshold: rule.threshold.to_string(),
            label: rule.label.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct AlertRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Sensor")]
    pub sensor: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl AlertRow {
    pub fn from_alert(alert: &TriggeredAlert) -> Self {
        Self {
            time: format_timestamp(alert.triggered_at),
            sensor: alert.sensor_name.clone(),
            message: alert.message.clone(),
        }
    }
}

pub type AnomalyRow = ReadingRow;

#[derive(Tabled, Serialize, Debug)]
pub struct ParamRow {
    #[tabled(rename = "Parameter")]
    pub key: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Default")]
    pub default: String,
    #[tabled(rename = "Env Var")]
    pub env_var: String,
    #[tabled(rename = "Sensitive")]
    pub sensitive: String,
}

impl ParamRow {
    pub fn from_spec(spec: &PlatformSpec) -> Vec<Self> {
        spec.params
            .iter()
            .map(|p| ParamRow {
                key: p.key.to_string(),
                label: p.label.to_string(),
                default: if p.sensitive && !p.default.is_empty() {
                    "***".to_string()
                } else {
                    p.default.to_string()
                },
                env_var: p.env_var.to_string(),
                sensitive: if p.sensitive { "yes" } else { "no" }.to_string(),
            })
            .collect()
    }
}

impl OutputFormat for Vec<Reading> {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No readings found.".to_string();
        }
        let rows: Vec<ReadingRow> = self.iter().map(ReadingRow::from_reading).collect();
        Table::new(rows).to_string()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for Vec<Sensor> {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No sensors detected.".to_string();
        }
        let rows: Vec<SensorRow> = self.iter().map(SensorRow::from_sensor).collect();
        Table::new(rows).to_string()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for SeriesSummary {
    fn to_table(&self) -> String {
        Table::new(StatsRow::from_summary(self)).to_string()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl OutputFormat for Vec<TriggeredAlert> {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No alerts triggered yet.".to_string();
        }
        let rows: Vec<AlertRow> = self.iter().map(AlertRow::from_alert).collect();
        Table::new(rows).to_string()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
