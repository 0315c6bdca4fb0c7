//! Error types for banshee-core
//!
//! Provides a unified error type for all operations in the library.

use std::path::PathBuf;

/// Result type alias for banshee operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for banshee operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (connect, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Proxy URL could not be used
    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    /// Keys file contained no usable key
    #[error("no API keys in {}", .0.display())]
    NoKeys(PathBuf),

    /// Every key in the pool has hit its quota
    #[error("no available API keys left, all keys have exceeded their quota")]
    KeyPoolExhausted,

    /// The provider rejected a key because its quota is used up
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other error object returned by the provider
    #[error("search API error: {0}")]
    SearchApi(String),

    /// Cancellation was requested by the user
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns true for errors that only affect the key that was used
    pub fn is_quota(&self) -> bool {
        matches!(self, Error::QuotaExceeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test".to_string());
        assert_eq!(err.to_string(), "Invalid input: test");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.to_string().contains("JSON parsing failed"));
    }

    #[test]
    fn test_no_keys_error() {
        let err = Error::NoKeys(PathBuf::from("/tmp/keys.txt"));
        assert_eq!(err.to_string(), "no API keys in /tmp/keys.txt");
    }

    #[test]
    fn test_quota_classification() {
        assert!(Error::QuotaExceeded("Quota exceeded for quota metric".into()).is_quota());
        assert!(!Error::SearchApi("Invalid Value".into()).is_quota());
        assert!(!Error::KeyPoolExhausted.is_quota());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
