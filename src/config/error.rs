//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file `{0}` not found")]
    NotFound(PathBuf),

    #[error("Config file parsing error in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}
