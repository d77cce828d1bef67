// Utility functions module
pub mod time;

pub use time::{format_timestamp, parse_timestamp};

use anyhow::{Result, anyhow};

/// Parse a `key=value` pair from the command line (`--param endpoint=...`).
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
