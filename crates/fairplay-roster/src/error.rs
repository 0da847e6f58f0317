//! Error types for the roster store.

use thiserror::Error;

/// Result type alias for roster store operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Errors that can occur during roster store operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("player not found: {0}")]
    NotFound(String),

    #[error("player already exists: {0}")]
    AlreadyExists(String),
}
