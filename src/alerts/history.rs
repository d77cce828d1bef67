use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One entry in the session's alert history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    pub sensor_name: String,
    pub message: String,
    pub triggered_at: DateTime<Utc>,
}

/// Append-only alert log with exact-message deduplication. A repeated
/// trigger message is logged once; whether its notification re-fires is the
/// dispatcher's business, not the log's.
#[derive(Debug, Default)]
pub struct AlertLog {
    entries: Vec<TriggeredAlert>,
    seen: HashSet<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless this exact message has been logged before. Returns
    /// whether a new entry was written.
    pub fn record(
        &mut self,
        sensor_name: &str,
        message: &str,
        triggered_at: DateTime<Utc>,
    ) -> bool {
        if self.seen.contains(message) {
            return false;
        }
        self.seen.insert(message.to_string());
        self.entries.push(TriggeredAlert {
            sensor_name: sensor_name.to_string(),
            message: message.to_string(),
            triggered_at,
        });
        true
    }

    pub fn entries(&self) -> &[TriggeredAlert] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
