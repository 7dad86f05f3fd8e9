//! Error types for the core library.

use crate::network::Endpoint;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Endpoint string could not be parsed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Endpoint already registered under another failure domain
    #[error("Endpoint {endpoint} already belongs to domain {existing}, cannot add it to {requested}")]
    DuplicateEndpoint {
        endpoint: Endpoint,
        existing: String,
        requested: String,
    },
    /// Topology error
    #[error("Topology error: {0}")]
    Topology(String),
}
