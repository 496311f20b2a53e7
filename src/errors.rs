use std::result::Result as StdResult;

use rusqlite::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// True when the failure means the backend cannot be reached at all, as
    /// opposed to an operation it rejected.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LedgerError::StorageUnavailable(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        let unavailable = match &err {
            rusqlite::Error::SqliteFailure(failure, message) => {
                matches!(
                    failure.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                        | ErrorCode::DatabaseCorrupt
                        | ErrorCode::PermissionDenied
                        | ErrorCode::SystemIoFailure
                ) || message
                    .as_deref()
                    .is_some_and(|text| text.contains("no such table"))
            }
            _ => false,
        };
        if unavailable {
            LedgerError::StorageUnavailable(err.to_string())
        } else {
            LedgerError::Storage(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_is_classified_as_unavailable() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn
            .prepare("SELECT id FROM expenses LIMIT 1")
            .expect_err("table does not exist");
        let mapped = LedgerError::from(err);
        assert!(mapped.is_unavailable(), "unexpected mapping: {mapped:?}");
    }

    #[test]
    fn io_errors_map_to_storage() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        match LedgerError::from(err) {
            LedgerError::Storage(message) => assert!(message.contains("disk full")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
