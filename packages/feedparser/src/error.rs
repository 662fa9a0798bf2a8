//! Error types for the feed parser.
//!
//! Recovery from malformed markup is the normal mode of operation, so very
//! little is an error here: only I/O on the source stream and configuration
//! problems are fatal for a file. Schema violations are data, not errors;
//! see [`crate::schema::Violation`].

use thiserror::Error;

/// Main error type for the feed parser library.
#[derive(Debug, Error)]
pub enum FeedError {
    /// IO error on the source stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding label not recognized by the decoder.
    #[error("Unsupported encoding label: '{0}'. Expected a WHATWG label (e.g., iso-8859-2)")]
    UnsupportedEncoding(String),

    /// JSON serialization failed while writing the archival form.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for feed parser operations.
pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_encoding_display() {
        let err = FeedError::UnsupportedEncoding("latin-99".to_string());
        assert!(err.to_string().contains("latin-99"));
        assert!(err.to_string().contains("iso-8859-2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: FeedError = io.into();
        assert!(err.to_string().contains("no such file"));
    }
}
