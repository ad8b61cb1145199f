use thiserror::Error;

use nurture_core::error::NurtureError;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<StorageError> for NurtureError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => NurtureError::NotFound(what),
            other => NurtureError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let e = StorageError::NotFound("lead 7".to_string());
        assert_eq!(e.to_string(), "not found: lead 7");
    }

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let e: NurtureError = StorageError::NotFound("campaign 1".to_string()).into();
        assert!(matches!(e, NurtureError::NotFound(_)));
    }

    #[test]
    fn test_database_maps_to_core_storage() {
        let e: NurtureError = StorageError::Database("locked".to_string()).into();
        assert!(matches!(e, NurtureError::Storage(_)));
        assert!(e.to_string().contains("locked"));
    }
}
