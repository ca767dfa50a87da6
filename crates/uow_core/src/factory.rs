//! Connection factory.

use crate::connection::{DecoratedConnection, SharedConnection};
use crate::error::{UowError, UowResult};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;
use uow_driver::{ConnectionState, DriverConnection};

/// Creates, opens and tracks exactly one current connection per logical
/// unit of work.
///
/// The factory consumes an injected zero-argument create function that
/// produces a fresh driver connection; it never selects providers or
/// builds connection strings itself. The single current-connection slot is
/// the source of truth the [`crate::UnitOfWork`] dispatcher consults to
/// decide between root and dependent scopes.
///
/// One factory serves one logical unit of work at a time. The internal
/// mutex makes sharing between the factory and its scopes sound; it does
/// not make concurrent `start()` calls from several threads a supported
/// pattern.
///
/// # Example
///
/// ```rust
/// use uow_core::ConnectionFactory;
/// use uow_driver::MemoryConnection;
///
/// let factory = ConnectionFactory::new(|| Box::new(MemoryConnection::new()));
/// let connection = factory.open().unwrap();
/// assert!(factory.current_connection().is_some());
/// drop(connection);
/// ```
pub struct ConnectionFactory {
    create: Box<dyn Fn() -> Box<dyn DriverConnection> + Send + Sync>,
    current: Mutex<Option<SharedConnection>>,
}

impl ConnectionFactory {
    /// Creates a connection factory over the given create function.
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> Box<dyn DriverConnection> + Send + Sync + 'static,
    {
        Self {
            create: Box::new(create),
            current: Mutex::new(None),
        }
    }

    fn create_connection(&self) -> SharedConnection {
        Arc::new(Mutex::new(DecoratedConnection::new((self.create)())))
    }

    fn check_slot_free(&self) -> UowResult<()> {
        let current = self.current.lock();
        if let Some(connection) = current.as_ref() {
            if connection.lock().state() != ConnectionState::Closed {
                return Err(UowError::invalid_operation(
                    "current connection is active and not closed",
                ));
            }
        }
        Ok(())
    }

    /// Creates and opens a new connection, storing it as current.
    ///
    /// # Errors
    ///
    /// Returns an invalid-operation error if a current connection exists
    /// and is not closed; otherwise propagates driver open failures.
    pub fn open(&self) -> UowResult<SharedConnection> {
        self.check_slot_free()?;
        let connection = self.create_connection();
        connection.lock().open()?;
        *self.current.lock() = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Asynchronous variant of [`open`](Self::open); same contract.
    ///
    /// # Errors
    ///
    /// Returns an invalid-operation error if a current connection exists
    /// and is not closed; otherwise propagates driver open failures.
    pub async fn open_async(&self) -> UowResult<SharedConnection> {
        self.check_slot_free()?;
        // Open before wrapping: a mutex guard must not live across the
        // await, or the future stops being Send.
        let mut decorated = DecoratedConnection::new((self.create)());
        decorated.open_async().await?;
        let connection = Arc::new(Mutex::new(decorated));
        *self.current.lock() = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Returns the current connection, if any. Pure read, no side effect.
    #[must_use]
    pub fn current_connection(&self) -> Option<SharedConnection> {
        self.current.lock().clone()
    }

    /// Detaches and returns the current connection without closing it.
    ///
    /// After this call [`current_connection`](Self::current_connection)
    /// returns `None`.
    pub fn unbind_current_connection(&self) -> Option<SharedConnection> {
        self.current.lock().take()
    }
}

impl Drop for ConnectionFactory {
    fn drop(&mut self) {
        if let Some(connection) = self.current.lock().take() {
            if let Err(error) = connection.lock().close() {
                warn!(%error, "failed to close current connection on factory drop");
            }
        }
    }
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("has_current", &self.current.lock().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uow_driver::MemoryConnection;

    fn factory() -> ConnectionFactory {
        ConnectionFactory::new(|| Box::new(MemoryConnection::new()))
    }

    #[test]
    fn open_stores_current_connection() {
        let factory = factory();
        let connection = factory.open().unwrap();
        assert_eq!(connection.lock().state(), ConnectionState::Open);
        let current = factory.current_connection().unwrap();
        assert!(Arc::ptr_eq(&connection, &current));
    }

    #[test]
    fn open_twice_without_close_fails() {
        let factory = factory();
        factory.open().unwrap();
        let result = factory.open();
        assert!(matches!(result, Err(UowError::InvalidOperation { .. })));
    }

    #[test]
    fn open_after_close_succeeds() {
        let factory = factory();
        let connection = factory.open().unwrap();
        connection.lock().close().unwrap();
        let second = factory.open().unwrap();
        assert!(!Arc::ptr_eq(&connection, &second));
    }

    #[test]
    fn current_connection_is_none_initially() {
        let factory = factory();
        assert!(factory.current_connection().is_none());
    }

    #[test]
    fn unbind_clears_slot_without_closing() {
        let factory = factory();
        factory.open().unwrap();
        let unbound = factory.unbind_current_connection().unwrap();
        assert!(factory.current_connection().is_none());
        assert_eq!(unbound.lock().state(), ConnectionState::Open);
    }

    #[test]
    fn unbind_on_empty_slot_returns_none() {
        let factory = factory();
        assert!(factory.unbind_current_connection().is_none());
    }

    #[test]
    fn open_allowed_again_after_unbind() {
        let factory = factory();
        factory.open().unwrap();
        factory.unbind_current_connection();
        factory.open().unwrap();
    }

    #[test]
    fn drop_closes_current_connection() {
        let factory = factory();
        let connection = factory.open().unwrap();
        drop(factory);
        assert_eq!(connection.lock().state(), ConnectionState::Closed);
    }

    fn require_send<T: Send>(value: T) -> T {
        value
    }

    #[tokio::test]
    async fn open_async_future_is_send() {
        let factory = factory();
        let connection = require_send(factory.open_async()).await.unwrap();
        assert_eq!(connection.lock().state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn open_async_stores_current_connection() {
        let factory = factory();
        let connection = factory.open_async().await.unwrap();
        assert_eq!(connection.lock().state(), ConnectionState::Open);
        assert!(factory.current_connection().is_some());
    }

    #[tokio::test]
    async fn open_async_twice_fails() {
        let factory = factory();
        factory.open_async().await.unwrap();
        assert!(matches!(
            factory.open_async().await,
            Err(UowError::InvalidOperation { .. })
        ));
    }
}
