//! Unit-of-work dispatcher.

use crate::config::UnitOfWorkConfig;
use crate::error::UowResult;
use crate::factory::ConnectionFactory;
use crate::scope::{DependentScope, RootScope, UnitOfWorkScope};
use std::sync::Arc;
use uow_driver::ConnectionState;

/// Factory deciding whether a `start()` call produces a root or a
/// dependent scope.
///
/// The decision is based purely on the connection factory's current
/// connection: no connection, or a closed one, yields a root scope; an
/// open connection yields a dependent scope. There is no ambient
/// "unit of work in progress" flag anywhere - the first `start()` in a
/// connection's life is always root, and every later `start()` before the
/// connection closes is dependent, whether or not the prior scope
/// committed.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use uow_core::{ConnectionFactory, ScopeKind, UnitOfWork};
/// use uow_driver::MemoryConnection;
///
/// let factory = Arc::new(ConnectionFactory::new(|| {
///     Box::new(MemoryConnection::new())
/// }));
/// let unit_of_work = UnitOfWork::new(factory);
///
/// let mut scope = unit_of_work.start().unwrap();
/// assert_eq!(scope.kind(), ScopeKind::Root);
/// scope.commit().unwrap();
/// ```
pub struct UnitOfWork {
    factory: Arc<ConnectionFactory>,
    config: UnitOfWorkConfig,
}

impl UnitOfWork {
    /// Creates a unit of work with the default configuration (implicit
    /// transactions disabled).
    #[must_use]
    pub fn new(factory: Arc<ConnectionFactory>) -> Self {
        Self::with_config(factory, UnitOfWorkConfig::default())
    }

    /// Creates a unit of work with the given configuration.
    #[must_use]
    pub fn with_config(factory: Arc<ConnectionFactory>, config: UnitOfWorkConfig) -> Self {
        Self { factory, config }
    }

    /// Whether implicit transactions are enabled; threaded through to
    /// every scope this unit of work creates.
    #[must_use]
    pub fn is_implicit_transactions_enabled(&self) -> bool {
        self.config.implicit_transactions
    }

    fn needs_root_scope(&self) -> bool {
        match self.factory.current_connection() {
            None => true,
            Some(connection) => connection.lock().state() == ConnectionState::Closed,
        }
    }

    fn make_scope(&self) -> Box<dyn UnitOfWorkScope> {
        let implicit = self.config.implicit_transactions;
        if self.needs_root_scope() {
            Box::new(RootScope::new(Arc::clone(&self.factory), implicit))
        } else {
            Box::new(DependentScope::new(Arc::clone(&self.factory), implicit))
        }
    }

    /// Starts a unit-of-work scope with its transaction already begun.
    ///
    /// # Errors
    ///
    /// Propagates connection open and transaction begin failures.
    pub fn start(&self) -> UowResult<Box<dyn UnitOfWorkScope>> {
        let mut scope = self.make_scope();
        scope.begin_transaction()?;
        Ok(scope)
    }

    /// Asynchronous variant of [`start`](Self::start).
    ///
    /// The transaction is always begun before the scope is returned,
    /// matching the synchronous path.
    ///
    /// # Errors
    ///
    /// Propagates connection open and transaction begin failures.
    pub async fn start_async(&self) -> UowResult<Box<dyn UnitOfWorkScope>> {
        let mut scope = self.make_scope();
        scope.begin_transaction_async().await?;
        Ok(scope)
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("factory", &self.factory)
            .field("config", &self.config)
            .finish()
    }
}
