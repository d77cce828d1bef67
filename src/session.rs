use crate::alerts::{AlertLog, AlertRuleSet, NotificationDispatcher, TriggeredAlert};
use crate::models::{Reading, Sensor};
use crate::platforms::SourceAdapter;
use crate::storage::TimeSeriesStore;
use chrono::Duration;
use tracing::{debug, warn};

/// Everything one monitoring session owns: the connected adapter, discovered
/// sensors, the store, the rule set and the alert log. Passed explicitly
/// through orchestration instead of living in globals.
pub struct SessionContext {
    pub adapter: Option<Box<dyn SourceAdapter>>,
    pub sensors: Vec<Sensor>,
    pub selected: Vec<String>,
    pub store: TimeSeriesStore,
    pub rules: AlertRuleSet,
    pub alert_log: AlertLog,
}

/// What one ingestion cycle did, for reporting back to the user.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub readings: Vec<Reading>,
    pub triggered: Vec<String>,
    pub newly_logged: usize,
    pub notified: usize,
    pub delivery_failures: usize,
    pub warnings: Vec<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            adapter: None,
            sensors: Vec::new(),
            selected: Vec::new(),
            store: TimeSeriesStore::new(),
            rules: AlertRuleSet::new(),
            alert_log: AlertLog::new(),
        }
    }

    /// Attach a connected adapter and run discovery. When `selected` is
    /// empty every discovered sensor is monitored.
    pub fn attach(&mut self, adapter: Box<dyn SourceAdapter>, selected: Vec<String>) {
        self.sensors = adapter.discover_sensors();
        self.adapter = Some(adapter);
        self.selected = selected;
    }

    pub fn monitored_sensors(&self) -> Vec<&Sensor> {
        self.sensors
            .iter()
            .filter(|s| self.selected.is_empty() || self.selected.contains(&s.id))
            .collect()
    }

    /// One ingestion cycle: for each monitored sensor fetch the latest
    /// reading, insert it, then evaluate rules against it. Trigger messages
    /// are appended to the log (exact-message dedup) and every trigger is
    /// dispatched, logged-before or not. A sensor that fails to fetch is
    /// reported and skipped; the cycle always finishes.
    pub async fn ingest_cycle(
        &mut self,
        dispatcher: Option<(&NotificationDispatcher, &str)>,
    ) -> CycleReport {
        let mut report = CycleReport::default();

        let Some(adapter) = self.adapter.as_ref() else {
            report.warnings.push("no platform attached".to_string());
            return report;
        };

        let sensors: Vec<Sensor> = self.monitored_sensors().into_iter().cloned().collect();

        for sensor in &sensors {
            let reading = match adapter.get_latest(&sensor.id).await {
                Ok(reading) => reading,
                Err(e) => {
                    warn!(sensor = %sensor.id, error = %e, "failed to fetch latest reading");
                    report.warnings.push(format!("{}: {e}", sensor.id));
                    continue;
                }
            };

            if let Err(e) = self.store.insert(reading.clone()) {
                warn!(sensor = %sensor.id, error = %e, "reading rejected by store");
                report.warnings.push(format!("{}: {e}", sensor.id));
                continue;
            }

            let messages = self.rules.evaluate(sensor, &reading);
            for message in messages {
                if self.alert_log.record(&sensor.name, &message, reading.timestamp) {
                    report.newly_logged += 1;
                } else {
                    debug!(sensor = %sensor.id, "duplicate alert message, not re-logged");
                }

                // Delivery re-fires for every trigger, deduplicated or not.
                if let Some((dispatcher, channel)) = dispatcher {
                    let alert = TriggeredAlert {
                        sensor_name: sensor.name.clone(),
                        message: message.clone(),
                        triggered_at: reading.timestamp,
                    };
                    match dispatcher.send(&alert, channel).await {
                        Ok(true) => report.notified += 1,
                        Ok(false) => report.delivery_failures += 1,
                        Err(e) => {
                            // Unknown channel is a config problem, not a
                            // delivery hiccup; report once per trigger.
                            report.warnings.push(e.to_string());
                        }
                    }
                }

                report.triggered.push(message);
            }

            report.readings.push(reading);
        }

        report
    }

    /// Drop readings older than the retention window across all sensors.
    /// No-op when `max_history_days` is zero or negative.
    pub fn apply_retention(&mut self, max_history_days: i64) {
        if max_history_days > 0 {
            let cutoff = crate::utils::time::now_second() - Duration::days(max_history_days);
            self.store.prune(None, Some(cutoff));
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::rules::{AlertRule, AlertRuleType};
    use crate::alerts::{ChannelKind, NotificationChannel};
    use crate::error::Result as CoreResult;
    use crate::models::SensorType;
    use crate::utils::time::now_second;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Adapter that always reports the same value for one sensor.
    struct FixedAdapter {
        value: f64,
    }

    #[async_trait]
    impl SourceAdapter for FixedAdapter {
        fn platform_name(&self) -> &str {
            "Fixed"
        }

        async fn test_connection(&mut self) -> bool {
            true
        }

        fn discover_sensors(&self) -> Vec<Sensor> {
            vec![Sensor::new("s1", "Lab Temp", SensorType::Temperature, "Lab")]
        }

        async fn get_latest(&self, sensor_id: &str) -> CoreResult<Reading> {
            Ok(Reading::new(sensor_id, now_second(), self.value, "°C"))
        }

        async fn get_historical(
            &self,
            _sensor_id: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> CoreResult<Vec<Reading>> {
            Ok(Vec::new())
        }
    }

    struct CountingChannel {
        delivered: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NotificationChannel for CountingChannel {
        async fn deliver(&self, _alert: &TriggeredAlert) -> anyhow::Result<()> {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn session_with_rule(value: f64) -> SessionContext {
        let mut session = SessionContext::new();
        session.attach(Box::new(FixedAdapter { value }), Vec::new());
        session
            .rules
            .add_rule(AlertRule::new("s1", AlertRuleType::ThresholdHigh, 25.0))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_cycle_inserts_and_triggers() {
        let mut session = session_with_rule(30.0);
        let report = session.ingest_cycle(None).await;

        assert_eq!(report.readings.len(), 1);
        assert_eq!(report.triggered.len(), 1);
        assert!(report.triggered[0].contains("exceeds threshold 25"));
        assert_eq!(session.store.len("s1"), 1);
        assert_eq!(session.alert_log.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_trigger_logged_once_notified_twice() {
        let mut session = session_with_rule(30.0);

        let delivered = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(
            ChannelKind::Email,
            Box::new(CountingChannel {
                delivered: delivered.clone(),
            }),
        );

        let first = session.ingest_cycle(Some((&dispatcher, "email"))).await;
        let second = session.ingest_cycle(Some((&dispatcher, "email"))).await;

        // Same value twice: identical message, logged once, delivered twice.
        assert_eq!(first.newly_logged, 1);
        assert_eq!(second.newly_logged, 0);
        assert_eq!(session.alert_log.entries().len(), 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
        assert_eq!(first.notified + second.notified, 2);
        assert_eq!(session.store.len("s1"), 2);
    }

    #[tokio::test]
    async fn test_quiet_reading_triggers_nothing() {
        let mut session = session_with_rule(20.0);
        let report = session.ingest_cycle(None).await;
        assert!(report.triggered.is_empty());
        assert_eq!(session.store.len("s1"), 1);
    }

    #[tokio::test]
    async fn test_selection_filters_sensors() {
        let mut session = SessionContext::new();
        session.attach(
            Box::new(FixedAdapter { value: 1.0 }),
            vec!["not-there".to_string()],
        );
        let report = session.ingest_cycle(None).await;
        assert!(report.readings.is_empty());
    }

    #[tokio::test]
    async fn test_retention_prunes_old_readings() {
        let mut session = session_with_rule(20.0);
        session
            .store
            .insert(Reading::new(
                "s1",
                now_second() - Duration::days(40),
                19.0,
                "°C",
            ))
            .unwrap();
        session.ingest_cycle(None).await;
        assert_eq!(session.store.len("s1"), 2);

        session.apply_retention(30);
        assert_eq!(session.store.len("s1"), 1);

        // Zero disables retention.
        session.apply_retention(0);
        assert_eq!(session.store.len("s1"), 1);
    }
}
