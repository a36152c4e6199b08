//! Error types for almanac-web

use thiserror::Error;

/// Result type alias for almanac-web operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or starting the site
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from almanac-core
    #[error("Core error: {0}")]
    Core(#[from] almanac_core::Error),

    /// Error from almanac-client
    #[error("Client error: {0}")]
    Client(#[from] almanac_client::Error),

    /// I/O error (config files, listener)
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path or address involved
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Core(almanac_core::Error::config(message))
    }

    /// Wraps an I/O error with the path or address it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl std::fmt::Display) -> Self {
        Error::Io {
            path: path.to_string(),
            source,
        }
    }
}
