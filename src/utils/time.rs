use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Wire format for timestamps in CSV rows and user-facing output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| Error::Validation(format!("invalid timestamp `{s}`: {e}")))?;
    Ok(naive.and_utc())
}

/// Current time truncated to whole seconds, the precision readings carry.
pub fn now_second() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
