//! Error types for database drivers.

use std::io;
use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur inside a database driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The connection is already open.
    #[error("connection is already open")]
    AlreadyOpen,

    /// The operation requires an open connection.
    #[error("connection is not open")]
    NotOpen,

    /// The transaction has already been committed or rolled back.
    #[error("transaction has already completed")]
    TransactionCompleted,

    /// Provider-level failure.
    #[error("driver failure: {message}")]
    Provider {
        /// Description of the failure.
        message: String,
    },

    /// I/O error from the underlying provider.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DriverError {
    /// Creates a provider failure error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
