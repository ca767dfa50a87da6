//! Error types for the unit-of-work engine.

use thiserror::Error;
use uow_driver::DriverError;

/// Result type for unit-of-work operations.
pub type UowResult<T> = Result<T, UowError>;

/// Errors that can occur in the unit-of-work engine.
///
/// Invalid-operation errors mark out-of-sequence API use by the caller;
/// they are never retried internally. Driver errors from commit, rollback
/// or open propagate unwrapped.
#[derive(Debug, Error)]
pub enum UowError {
    /// Driver-level error.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// The connection factory holds no current connection.
    #[error("no current connection")]
    NoCurrentConnection,
}

impl UowError {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
