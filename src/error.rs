//! Error types for the notemark library.

use thiserror::Error;

/// Result type alias for notemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during block conversion and page access.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural validation failure in Markdown input.
    ///
    /// Reserved: the parser currently accepts every input, malformed
    /// tables included, and never raises this.
    #[error("Markdown parse error: {0}")]
    Parse(String),

    /// The payload builder was given a block it cannot express on the wire.
    #[error("Unsupported block shape: {0}")]
    Conversion(String),

    /// A page extraction aborted. Wraps the underlying fault; no partial
    /// text is returned for the invocation.
    #[error("Page extraction failed: {0}")]
    Extraction(#[source] Box<Error>),

    /// A remote block record could not be interpreted.
    #[error("Malformed block record: {0}")]
    MalformedRecord(String),

    /// The remote call returned a non-success status or an unexpected body.
    #[error("API request failed: {0}")]
    Api(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error.
    #[cfg(feature = "client")]
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::Conversion("heading level 9 is outside 1..=6".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported block shape: heading level 9 is outside 1..=6"
        );

        let err = Error::MalformedRecord("missing `type` field".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed block record: missing `type` field"
        );
    }

    #[test]
    fn test_extraction_wraps_cause() {
        let err = Error::Extraction(Box::new(Error::Api("boom".to_string())));
        assert!(err.to_string().contains("boom"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
