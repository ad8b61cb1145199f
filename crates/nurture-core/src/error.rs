use thiserror::Error;

/// Top-level error type for the nurture system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for NurtureError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NurtureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NurtureError {
    fn from(err: toml::de::Error) -> Self {
        NurtureError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NurtureError {
    fn from(err: toml::ser::Error) -> Self {
        NurtureError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NurtureError {
    fn from(err: serde_json::Error) -> Self {
        NurtureError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for nurture operations.
pub type Result<T> = std::result::Result<T, NurtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NurtureError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NurtureError = io_err.into();
        assert!(matches!(err, NurtureError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: NurtureError = json_err.into();
        assert!(matches!(err, NurtureError::Serialization(_)));
    }

    #[test]
    fn test_not_found_display() {
        let err = NurtureError::NotFound("campaign 42".to_string());
        assert_eq!(err.to_string(), "Not found: campaign 42");
    }
}
