// sensorhub: IoT Sensor Monitoring Tool
use clap::Parser;
use sensorhub::cli::{Cli, Commands};
use sensorhub::commands::{
    handle_history_command, handle_import_command, handle_monitor_command,
    handle_platforms_command, handle_rules_command, handle_sensors_command,
};
use sensorhub::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(config_path.clone()).unwrap_or_else(|e| {
        eprintln!("Error: Failed to load configuration: {e}");
        std::process::exit(1);
    });

    match cli.command {
        Commands::Platforms => handle_platforms_command(cli.json)?,

        Commands::Sensors { platform, params } => {
            handle_sensors_command(&platform, &params, cli.json).await?
        }

        Commands::Monitor {
            platform,
            params,
            cycles,
            sensors,
            channel,
        } => {
            handle_monitor_command(
                &platform, &params, cycles, sensors, channel, &config, cli.json,
            )
            .await?
        }

        Commands::History {
            platform,
            params,
            sensor,
            minutes,
            z_threshold,
            export,
            format,
        } => {
            handle_history_command(
                &platform,
                &params,
                &sensor,
                minutes,
                z_threshold,
                export,
                &format,
                cli.json,
            )
            .await?
        }

        Commands::Import {
            sensor,
            input,
            format,
        } => handle_import_command(&sensor, &input, &format, cli.json)?,

        Commands::Rules { action } => {
            handle_rules_command(action, &mut config, &config_path, cli.json).await?
        }
    }

    Ok(())
}
