use thiserror::Error;

/// Result alias used by the storage and pipeline layers.
pub type Result<T> = std::result::Result<T, RadarError>;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
