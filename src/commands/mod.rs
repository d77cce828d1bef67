// Command handlers module
pub mod history;
pub mod import;
pub mod monitor;
pub mod platforms;
pub mod rules;
pub mod sensors;

pub use history::handle_history_command;
pub use import::handle_import_command;
pub use monitor::handle_monitor_command;
pub use platforms::handle_platforms_command;
pub use rules::handle_rules_command;
pub use sensors::handle_sensors_command;

use crate::error::Error;
use crate::platforms::{PlatformKind, SourceAdapter, create_adapter};
use crate::utils::parse_key_val;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;

/// Shared connect flow: resolve parameters (override > env > default),
/// build the adapter, and verify connectivity.
pub(crate) async fn connect_platform(
    platform: &str,
    raw_params: &[String],
) -> Result<Box<dyn SourceAdapter>> {
    let kind: PlatformKind = platform
        .parse()
        .map_err(|e: Error| anyhow::anyhow!(e))
        .context("unrecognized platform name")?;

    let mut overrides = HashMap::new();
    for raw in raw_params {
        let (key, value) = parse_key_val(raw)?;
        overrides.insert(key, value);
    }

    let resolved = crate::config::resolve_params(kind, &overrides);
    let mut adapter = create_adapter(kind, &resolved);

    if !adapter.test_connection().await {
        bail!(
            "failed to connect to {}; check credentials (see `sensorhub platforms` for required parameters)",
            kind.display_name()
        );
    }

    // Keep stdout clean for table/JSON payloads.
    eprintln!("Connected to {}", kind.display_name());
    Ok(adapter)
}
