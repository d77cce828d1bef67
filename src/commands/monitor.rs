use super::connect_platform;
use crate::alerts::NotificationDispatcher;
use crate::config::Config;
use crate::output::OutputFormat;
use crate::session::SessionContext;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub async fn handle_monitor_command(
    platform: &str,
    params: &[String],
    cycles: u32,
    selected_sensors: Vec<String>,
    channel: Option<String>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let adapter = connect_platform(platform, params).await?;

    let mut session = SessionContext::new();
    session.attach(adapter, selected_sensors);

    if session.monitored_sensors().is_empty() {
        println!("No sensors detected. Please check your connection or device configuration.");
        return Ok(());
    }

    // Persisted rules apply to every monitoring run.
    for entry in &config.alert_rules {
        session.rules.add_rule(entry.to_rule()?)?;
    }

    // An explicit --channel opts in for this run even when notifications are
    // disabled in config.
    let dispatcher = NotificationDispatcher::from_config(&config.notifications);
    let notify = channel.is_some() || config.notifications.enabled;
    let channel_name = channel.unwrap_or_else(|| config.notifications.default_channel.clone());

    for cycle in 1..=cycles {
        let dispatch = if notify {
            Some((&dispatcher, channel_name.as_str()))
        } else {
            None
        };

        let report = session.ingest_cycle(dispatch).await;
        session.apply_retention(config.app.max_history_days);

        info!(
            cycle,
            readings = report.readings.len(),
            triggered = report.triggered.len(),
            "monitor cycle complete"
        );

        if json {
            println!("{}", report.readings.to_json()?);
        } else {
            println!("Cycle {cycle}/{cycles}");
            println!("{}", report.readings.to_table());
        }

        for warning in &report.warnings {
            eprintln!("Warning: {warning}");
        }
        for message in &report.triggered {
            println!("ALERT: {message}");
        }

        if cycle < cycles {
            tokio::time::sleep(Duration::from_secs(config.app.refresh_interval_secs)).await;
        }
    }

    if !session.alert_log.is_empty() {
        println!("\nAlert history");
        println!("{}", session.alert_log.entries().to_vec().to_table());
    }

    let stored = session.store.list_sensors_with_data();
    info!(sensors = stored.len(), "session store populated");

    Ok(())
}
