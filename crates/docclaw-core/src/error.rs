//! Docclaw error taxonomy.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DocclawError>;

/// All error conditions surfaced by the docclaw pipeline.
#[derive(Error, Debug)]
pub enum DocclawError {
    /// Invalid configuration — chunk geometry, malformed config file.
    /// Fails fast, non-recoverable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input document does not resolve to a readable file.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Query vector length differs from the stored embedding dimensionality.
    /// Indicates an inconsistency between embedding backend calls.
    #[error("Embedding dimension mismatch: query has {query}, store has {store}")]
    DimensionMismatch { query: usize, store: usize },

    /// Embedding or generation backend is unreachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Operation not valid in the engine's current state (asking before
    /// initialization, or without generation capability).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Backend responded, but with an API-level error or malformed body.
    #[error("Provider error: {0}")]
    Provider(String),

    /// HTTP transport error below the API level.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = DocclawError::DimensionMismatch { query: 3, store: 768 };
        let msg = err.to_string();
        assert!(msg.contains("3"));
        assert!(msg.contains("768"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DocclawError = io.into();
        assert!(matches!(err, DocclawError::Io(_)));
    }
}
