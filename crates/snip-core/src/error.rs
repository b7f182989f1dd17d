use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid link id: {0}")]
    InvalidLinkId(String),
}

/// Errors raised by key-value engines.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("too many concurrent writers on key: {0}")]
    Contended(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
