use super::connect_platform;
use crate::analysis::{detect_anomalies, summary};
use crate::output::OutputFormat;
use crate::storage::{ExportFormat, TimeSeriesStore};
use crate::utils::time::now_second;
use anyhow::{Context, Result};
use chrono::Duration;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub async fn handle_history_command(
    platform: &str,
    params: &[String],
    sensor_id: &str,
    minutes: i64,
    z_threshold: f64,
    export: Option<String>,
    format: &str,
    json: bool,
) -> Result<()> {
    let adapter = connect_platform(platform, params).await?;

    let end = now_second();
    let start = end - Duration::minutes(minutes);

    let readings = adapter
        .get_historical(sensor_id, start, end)
        .await
        .with_context(|| format!("failed to fetch history for {sensor_id}"))?;

    if readings.is_empty() {
        println!("No historical data available for {sensor_id} in the selected time range.");
        return Ok(());
    }

    // Run the fetched series through the store so query semantics (insertion
    // order, inclusive range) match live monitoring.
    let mut store = TimeSeriesStore::new();
    for reading in readings {
        store.insert(reading)?;
    }
    let entries = store.query_range(sensor_id, start, end);

    let stats = summary(&entries);
    let anomalies = detect_anomalies(&entries, z_threshold);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "sensor_id": sensor_id,
                "entries": entries,
                "summary": stats,
                "anomalies": anomalies,
            }))?
        );
    } else {
        println!("{sensor_id}: {} readings", entries.len());
        println!("{}", stats.to_table());
        if anomalies.is_empty() {
            println!("No anomalies flagged (z > {z_threshold}).");
        } else {
            println!("Anomalies (z > {z_threshold})");
            println!("{}", anomalies.to_table());
        }
    }

    if let Some(path) = export {
        let export_format: ExportFormat = format.parse()?;
        let rows = store.export(sensor_id, Path::new(&path), export_format)?;
        println!("Exported {rows} rows to {path}");
    }

    Ok(())
}
