use crate::analysis::summary;
use crate::output::OutputFormat;
use crate::storage::{ExportFormat, TimeSeriesStore};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_import_command(sensor_id: &str, input: &str, format: &str, json: bool) -> Result<()> {
    let import_format: ExportFormat = format.parse()?;

    let mut store = TimeSeriesStore::new();
    let imported = store
        .import(sensor_id, Path::new(input), import_format)
        .with_context(|| format!("failed to import {input}"))?;

    let entries = store.series(sensor_id).to_vec();
    let stats = summary(&entries);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "sensor_id": sensor_id,
                "imported": imported,
                "summary": stats,
            }))?
        );
    } else {
        println!("Imported {imported} rows under sensor {sensor_id}");
        println!("{}", stats.to_table());
    }

    Ok(())
}
