//! Error types for almanac-core

use thiserror::Error;

/// Result type alias for almanac-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in almanac-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is missing or invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
