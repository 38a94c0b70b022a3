//! Crate-wide error types.

use thiserror::Error;

use std::path::PathBuf;

pub type DiffResult<T> = Result<T, DiffError>;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("\"diff\" requires at least 2 profiles (got {got})")]
    NotEnoughProfiles { got: usize },

    #[error("no table columns specified for diff output")]
    NoColumns,

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to load profile {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
