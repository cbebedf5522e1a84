//! Error types for sample-sweep
//!
//! The taxonomy mirrors how failures are recovered:
//! - transport failures (`Network`, `UnexpectedStatus`, `Rpc`) are retried or
//!   logged and worked around, never fatal to a whole run
//! - shape failures (`UnexpectedShape`, `MissingField`) make a single record
//!   or item unusable and are contained at the item boundary
//! - a malformed top-level queue payload (`MalformedQueue`) aborts the run
//! - filesystem failures (`Io`) are logged and non-fatal

use thiserror::Error;

/// Result type alias for sample-sweep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sample-sweep
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "sonarr.base_url")
        key: Option<String>,
    },

    /// Transport-level failure calling an external service
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An external service answered with a status code the operation cannot accept
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// The HTTP status code that was returned
        status: u16,
        /// The endpoint that returned it
        endpoint: String,
    },

    /// The download client accepted the HTTP call but rejected the RPC itself
    #[error("download client rejected {method}: {message}")]
    Rpc {
        /// The JSON-RPC method that was rejected
        method: String,
        /// The rejection detail reported by the client
        message: String,
    },

    /// The top-level queue payload is not a sequence of records; fatal to the run
    #[error("malformed queue payload: {0}")]
    MalformedQueue(String),

    /// A record or response field has an unusable shape; contained at the item boundary
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A field a remediation step cannot proceed without is absent
    #[error("missing field {field} in {record}")]
    MissingField {
        /// The kind of record the field was expected on
        record: &'static str,
        /// The absent field, in the external service's naming
        field: &'static str,
    },

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Config`] with a known key
    pub fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
