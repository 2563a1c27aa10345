//! Error types for paperdesk.

use thiserror::Error;

/// Result type alias using paperdesk's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for paperdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The assistant provider rejected or failed a call
    #[error("Remote error: {0}")]
    Remote(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resources required for the operation have not been provisioned
    #[error("Not ready: {0}")]
    NotReady(String),

    /// A remote job did not reach a terminal state in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_remote() {
        let err = Error::Remote("vector store quota exceeded".to_string());
        assert_eq!(err.to_string(), "Remote error: vector store quota exceeded");
    }

    #[test]
    fn test_error_display_not_ready() {
        let err = Error::NotReady("no uploaded file".to_string());
        assert_eq!(err.to_string(), "Not ready: no uploaded file");
    }

    #[test]
    fn test_error_display_timeout() {
        let err = Error::Timeout("run still in_progress".to_string());
        assert_eq!(err.to_string(), "Timed out: run still in_progress");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#);
        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
