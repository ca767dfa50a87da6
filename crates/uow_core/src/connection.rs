//! Decorated database connection.

use crate::error::{UowError, UowResult};
use parking_lot::Mutex;
use std::sync::Arc;
use uow_driver::{ConnectionState, DriverConnection, DriverTransaction};

/// A transaction handle shared between the connection that created it and
/// every scope that piggybacks on it.
///
/// Identity of the handle (`Arc::ptr_eq`) identifies the transaction: two
/// scopes sharing one physical transaction observe the same handle.
pub type SharedTransaction = Arc<Mutex<Box<dyn DriverTransaction>>>;

/// A decorated connection shared between a connection factory and the
/// scopes it serves.
pub type SharedConnection = Arc<Mutex<DecoratedConnection>>;

/// Decorator over a driver connection, tracking its currently active
/// transaction.
///
/// The decorator exclusively owns the wrapped connection. It keeps at most
/// one transaction handle; the handle stays in place after commit or
/// rollback (the transaction merely detaches), so
/// [`has_transaction`](Self::has_transaction) can remain true while
/// [`is_transaction_active`](Self::is_transaction_active) is false.
pub struct DecoratedConnection {
    inner: Box<dyn DriverConnection>,
    transaction: Option<SharedTransaction>,
}

impl DecoratedConnection {
    /// Wraps a driver connection.
    #[must_use]
    pub fn new(inner: Box<dyn DriverConnection>) -> Self {
        Self {
            inner,
            transaction: None,
        }
    }

    /// Opens the underlying connection.
    ///
    /// Opening always starts transaction-free: any tracked transaction
    /// reference is discarded.
    ///
    /// # Errors
    ///
    /// Propagates the driver error if the open fails.
    pub fn open(&mut self) -> UowResult<()> {
        self.inner.open()?;
        self.transaction = None;
        Ok(())
    }

    /// Opens the underlying connection asynchronously.
    ///
    /// # Errors
    ///
    /// Propagates the driver error if the open fails.
    pub async fn open_async(&mut self) -> UowResult<()> {
        self.inner.open_async().await?;
        self.transaction = None;
        Ok(())
    }

    /// Closes the underlying connection.
    ///
    /// The tracked transaction reference is discarded first; a transaction
    /// cannot outlive a close.
    ///
    /// # Errors
    ///
    /// Propagates the driver error if the close fails.
    pub fn close(&mut self) -> UowResult<()> {
        self.transaction = None;
        self.inner.close()?;
        Ok(())
    }

    /// Begins a new transaction on the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an invalid-operation error if a transaction is already
    /// active on this connection.
    pub fn begin_transaction(&mut self) -> UowResult<SharedTransaction> {
        if self.is_transaction_active() {
            return Err(UowError::invalid_operation(
                "parallel transactions are not supported",
            ));
        }
        let txn: SharedTransaction = Arc::new(Mutex::new(self.inner.begin()?));
        self.transaction = Some(Arc::clone(&txn));
        Ok(txn)
    }

    /// Whether a transaction handle exists, active or not.
    #[must_use]
    pub fn has_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Whether a transaction exists and is still attached to a live
    /// connection.
    #[must_use]
    pub fn is_transaction_active(&self) -> bool {
        self.transaction
            .as_ref()
            .is_some_and(|txn| txn.lock().is_attached())
    }

    /// Returns the tracked transaction handle, if any.
    #[must_use]
    pub fn transaction(&self) -> Option<SharedTransaction> {
        self.transaction.clone()
    }

    /// Returns the state of the underlying connection.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    /// Executes a statement on the underlying connection.
    ///
    /// # Errors
    ///
    /// Propagates the driver error.
    pub fn execute(&mut self, statement: &str) -> UowResult<()> {
        self.inner.execute(statement)?;
        Ok(())
    }

    /// Returns the string used to open the underlying connection.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        self.inner.connection_string()
    }
}

impl std::fmt::Debug for DecoratedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratedConnection")
            .field("state", &self.state())
            .field("has_transaction", &self.has_transaction())
            .field("is_transaction_active", &self.is_transaction_active())
            .finish_non_exhaustive()
    }
}
