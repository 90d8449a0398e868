//! Error types for the harvester.
//!
//! Protocol errors reported by the repository inside a response are not
//! represented here: they are data (see [`crate::types::ProtocolError`]) and
//! never abort a harvest. Everything in [`HarvesterError`] is fatal.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// HTTP client could not be constructed or a request failed outright.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Fetching a specific page failed.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body exceeded the configured maximum size.
    #[error("Response from {url} exceeds maximum size of {limit} bytes")]
    ResponseTooLarge { url: String, limit: u64 },

    /// Response body is not well-formed XML.
    #[error("Error parsing XML document at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
