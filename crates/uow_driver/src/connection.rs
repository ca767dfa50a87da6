//! Driver connection and transaction traits.

use crate::error::DriverResult;
use async_trait::async_trait;

/// State of a physical database connection.
///
/// The engine only ever distinguishes closed from open: both the
/// connection factory's "already active" check and the root-vs-dependent
/// decision test for [`ConnectionState::Closed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected. The initial state, and the state after `close`.
    Closed,
    /// Connected and usable.
    Open,
}

/// A transaction handed out by a driver connection.
///
/// # Invariants
///
/// - A transaction starts attached to the connection that created it
/// - `commit` and `rollback` detach it; a detached transaction fails any
///   further completion attempt with `TransactionCompleted`
/// - Dropping an attached transaction is the driver's rollback of last
///   resort (the engine above normally rolls back explicitly first)
pub trait DriverTransaction: Send {
    /// Commits the transaction and detaches it from its connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction already completed or the
    /// provider rejects the commit.
    fn commit(&mut self) -> DriverResult<()>;

    /// Rolls the transaction back and detaches it from its connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction already completed or the
    /// provider rejects the rollback.
    fn rollback(&mut self) -> DriverResult<()>;

    /// Whether the transaction is still attached to a live connection.
    ///
    /// This is false once the transaction has been committed or rolled
    /// back, and false after the owning connection closed.
    fn is_attached(&self) -> bool;
}

/// A single physical database connection.
///
/// Implementors wrap one provider connection (a socket, a file handle, an
/// in-memory store). The engine never constructs these itself - a
/// zero-argument create function injected into the connection factory
/// produces them.
///
/// # Implementors
///
/// - [`super::MemoryConnection`] - For testing
#[async_trait]
pub trait DriverConnection: Send {
    /// Opens the connection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::AlreadyOpen`] if the connection is
    /// already open, or a provider error if the open fails.
    fn open(&mut self) -> DriverResult<()>;

    /// Opens the connection, yielding to the runtime while the provider
    /// performs I/O.
    ///
    /// # Errors
    ///
    /// Same contract as [`DriverConnection::open`].
    async fn open_async(&mut self) -> DriverResult<()>;

    /// Closes the connection.
    ///
    /// Closing an already closed connection is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to close cleanly.
    fn close(&mut self) -> DriverResult<()>;

    /// Returns the current connection state.
    fn state(&self) -> ConnectionState;

    /// Begins a new transaction on this connection.
    ///
    /// Drivers do not check for an existing transaction; the engine's
    /// decorated connection enforces the one-transaction rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::NotOpen`] if the connection is
    /// closed.
    fn begin(&mut self) -> DriverResult<Box<dyn DriverTransaction>>;

    /// Executes a statement on this connection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::NotOpen`] if the connection is
    /// closed, or a provider error if execution fails.
    fn execute(&mut self, statement: &str) -> DriverResult<()>;

    /// Returns the string used to open this connection.
    fn connection_string(&self) -> &str;
}
