use std::fmt::{Display, Formatter};

use redb::{CommitError, DatabaseError, Error as RedbError, StorageError, TableError, TransactionError};
use serde_json::Error as SerdeError;

/// Central error type for every fallible operation in the crate.
///
/// Each variant carries a human-readable message suitable for surfacing
/// directly in an admin UI alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Conflict(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<RedbError> for AppError {
    fn from(err: RedbError) -> Self {
        match err {
            RedbError::TableDoesNotExist(name) => {
                AppError::NotFound(format!("Table '{}' not found", name))
            }
            RedbError::Corrupted(msg) => {
                AppError::DatabaseError(format!("Database is corrupted: {}", msg))
            }
            RedbError::Io(io_err) => AppError::DatabaseError(format!("IO error: {}", io_err)),
            _ => AppError::DatabaseError(format!("Database error: {:?}", err)),
        }
    }
}

impl From<SerdeError> for AppError {
    fn from(err: SerdeError) -> Self {
        AppError::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::DatabaseError(format!("Failed to open database: {}", err))
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        AppError::DatabaseError(format!("Transaction error: {:?}", err))
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        AppError::DatabaseError(format!("Table operation error: {:?}", err))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::DatabaseError(format!("Storage error: {:?}", err))
    }
}

impl From<CommitError> for AppError {
    fn from(err: CommitError) -> Self {
        AppError::DatabaseError(format!("Commit error: {:?}", err))
    }
}
