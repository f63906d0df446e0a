use crate::api::ApiError;
use crate::config::ConfigError;
use crate::location::LocationError;

/// Weather clock error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Positioning failed: {0}")]
    Location(#[from] LocationError),

    #[error("Fetching weather failed: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
