//! Certificate store error types.

use crate::config::ConfigError;

/// Errors from certificate store calls.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("certificate store unreachable: {0}")]
    Connection(String),
    /// The store rejected or failed to execute a query.
    #[error("query on {collection} failed: {message}")]
    Query {
        collection: String,
        message: String,
    },
    /// A returned document could not be decoded.
    #[error("failed to decode document from {collection}: {message}")]
    Decode {
        collection: String,
        message: String,
    },
    /// Store configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Query { .. } => "query",
            Self::Decode { .. } => "decode",
            Self::Config(_) => "config",
        }
    }
}
