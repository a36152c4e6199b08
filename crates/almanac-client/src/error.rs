//! Error types for almanac-client

use thiserror::Error;

/// Result type alias for almanac-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Feishu Open API
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from almanac-core
    #[error("Core error: {0}")]
    Core(#[from] almanac_core::Error),

    /// HTTP transport or body decoding error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success HTTP status
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Which call failed
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// Endpoint answered with a non-zero business code
    #[error("{endpoint} returned code {code}: {msg}")]
    Api {
        /// Which call failed
        endpoint: &'static str,
        /// Business status code from the response body
        code: i64,
        /// Message from the response body
        msg: String,
    },

    /// Credential response reported success but carried no token
    #[error("credential response carried no tenant_access_token")]
    MissingToken,
}

impl Error {
    /// Creates a new API error.
    pub fn api<S: Into<String>>(endpoint: &'static str, code: i64, msg: S) -> Self {
        Error::Api {
            endpoint,
            code,
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let e = Error::Status {
            endpoint: "records",
            status: 503,
        };
        assert_eq!(e.to_string(), "records returned HTTP 503");
    }

    #[test]
    fn test_api_display() {
        let e = Error::api("tenant_access_token", 10014, "app secret invalid");
        assert_eq!(
            e.to_string(),
            "tenant_access_token returned code 10014: app secret invalid"
        );
    }

    #[test]
    fn test_core_error_from() {
        let e: Error = almanac_core::Error::config("missing").into();
        assert!(matches!(e, Error::Core(_)));
    }
}
