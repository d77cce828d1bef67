use thiserror::Error;

/// Core error taxonomy. Query misses are not errors: store lookups for
/// unknown sensors return empty results or `None` instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not connected to {0}")]
    NotConnected(String),

    #[error("unknown sensor id: {0}")]
    UnknownSensor(String),

    #[error("unsupported notification channel: {0}")]
    UnsupportedChannel(String),

    #[error("unsupported data format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn missing_field(field: &str) -> Self {
        Error::Validation(format!("missing required field: {field}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
