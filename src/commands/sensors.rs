use super::connect_platform;
use crate::output::OutputFormat;
use anyhow::Result;

pub async fn handle_sensors_command(platform: &str, params: &[String], json: bool) -> Result<()> {
    let adapter = connect_platform(platform, params).await?;
    let sensors = adapter.discover_sensors();

    if json {
        println!("{}", sensors.to_json()?);
    } else {
        println!("{}", sensors.to_table());
    }

    Ok(())
}
