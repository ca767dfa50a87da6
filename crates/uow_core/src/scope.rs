//! Unit-of-work scopes.
//!
//! One scope instance exists per [`crate::UnitOfWork::start`] call. The
//! root scope owns the physical connection and the real transaction;
//! dependent scopes piggyback on whatever transaction is already active
//! and defer the real commit or rollback to its creator. This avoids
//! nested/savepoint transactions while still letting application code
//! open logically nested units of work.

use crate::connection::SharedTransaction;
use crate::error::{UowError, UowResult};
use crate::factory::ConnectionFactory;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uow_driver::ConnectionState;

/// The runtime kind of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Outermost scope; owns the physical connection and the real
    /// transaction.
    Root,
    /// Nested scope sharing the root's connection and transaction.
    Dependent,
}

/// The transaction boundary contract scopes expose to application code.
///
/// Scopes transition `created` → `transaction begun` → `completed` (via
/// [`commit`](Self::commit) or [`rollback`](Self::rollback)) and are
/// finished by dropping. Dropping a scope that was begun but never
/// completed forces a rollback, so abandoned scopes never leave a
/// transaction hanging open.
#[async_trait]
pub trait UnitOfWorkScope: Send {
    /// Begins a transaction on the current connection.
    ///
    /// A deliberate no-op when a transaction is already active: dependent
    /// scopes are expected to call this while sharing one physical
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if no current connection exists or the driver
    /// fails to begin.
    fn begin_transaction(&mut self) -> UowResult<()>;

    /// Asynchronous variant of [`begin_transaction`](Self::begin_transaction).
    ///
    /// Only the root scope's connection open is truly asynchronous; the
    /// transaction begin itself delegates to the synchronous path.
    ///
    /// # Errors
    ///
    /// Same contract as [`begin_transaction`](Self::begin_transaction).
    async fn begin_transaction_async(&mut self) -> UowResult<()>;

    /// Completes the scope, committing the transaction if this scope
    /// created it.
    ///
    /// With implicit transactions enabled, a creating scope immediately
    /// begins a fresh transaction afterwards and is transaction-ready
    /// again. A dependent scope that did not create the transaction only
    /// marks itself completed.
    ///
    /// # Errors
    ///
    /// Propagates driver commit failures unwrapped.
    fn commit(&mut self) -> UowResult<()>;

    /// Asynchronous mirror of [`commit`](Self::commit); no suspension
    /// point exists at this layer.
    ///
    /// # Errors
    ///
    /// Same contract as [`commit`](Self::commit).
    async fn commit_async(&mut self) -> UowResult<()> {
        self.commit()
    }

    /// Completes the scope, rolling the transaction back if this scope
    /// created it. Symmetric to [`commit`](Self::commit), including the
    /// implicit-transaction restart.
    ///
    /// # Errors
    ///
    /// Propagates driver rollback failures unwrapped.
    fn rollback(&mut self) -> UowResult<()>;

    /// Asynchronous mirror of [`rollback`](Self::rollback).
    ///
    /// # Errors
    ///
    /// Same contract as [`rollback`](Self::rollback).
    async fn rollback_async(&mut self) -> UowResult<()> {
        self.rollback()
    }

    /// Whether a transaction is active on the current connection.
    ///
    /// This reflects the connection's live state, not scope-local
    /// bookkeeping, so dependent scopes observe the same activity as the
    /// root.
    fn is_transaction_active(&self) -> bool;

    /// Whether implicit transactions are enabled for this scope.
    fn is_implicit_transactions_enabled(&self) -> bool;

    /// Returns the runtime kind of this scope.
    fn kind(&self) -> ScopeKind;

    /// Returns the transaction handle this scope observes, if any.
    ///
    /// Scopes sharing one physical transaction return `Arc::ptr_eq`
    /// handles.
    fn transaction(&self) -> Option<SharedTransaction>;
}

/// Shared state machine both scope kinds delegate to.
pub(crate) struct ScopeState {
    factory: Arc<ConnectionFactory>,
    kind: ScopeKind,
    transaction: Option<SharedTransaction>,
    transaction_created: bool,
    scope_completed: bool,
    implicit_transactions: bool,
}

impl ScopeState {
    pub(crate) fn new(
        factory: Arc<ConnectionFactory>,
        kind: ScopeKind,
        implicit_transactions: bool,
    ) -> Self {
        Self {
            factory,
            kind,
            transaction: None,
            transaction_created: false,
            scope_completed: false,
            implicit_transactions,
        }
    }

    pub(crate) fn factory(&self) -> &Arc<ConnectionFactory> {
        &self.factory
    }

    pub(crate) fn begin_transaction(&mut self) -> UowResult<()> {
        let connection = self
            .factory
            .current_connection()
            .ok_or(UowError::NoCurrentConnection)?;
        let mut connection = connection.lock();
        if connection.is_transaction_active() {
            // Piggyback on the transaction another scope created.
            self.transaction = connection.transaction();
            return Ok(());
        }
        self.transaction_created = true;
        self.transaction = Some(connection.begin_transaction()?);
        debug!(kind = ?self.kind, "transaction begun");
        Ok(())
    }

    pub(crate) fn commit(&mut self) -> UowResult<()> {
        self.scope_completed = true;
        if self.transaction_created {
            let txn = self
                .transaction
                .as_ref()
                .ok_or_else(|| UowError::invalid_operation("commit before begin_transaction"))?;
            txn.lock().commit()?;
            debug!(kind = ?self.kind, "transaction committed");
            if self.implicit_transactions {
                self.scope_completed = false;
                self.begin_transaction()?;
            }
        }
        Ok(())
    }

    pub(crate) fn rollback(&mut self) -> UowResult<()> {
        self.scope_completed = true;
        if self.transaction_created {
            let txn = self
                .transaction
                .as_ref()
                .ok_or_else(|| UowError::invalid_operation("rollback before begin_transaction"))?;
            txn.lock().rollback()?;
            debug!(kind = ?self.kind, "transaction rolled back");
            if self.implicit_transactions {
                self.scope_completed = false;
                self.begin_transaction()?;
            }
        }
        Ok(())
    }

    pub(crate) fn is_transaction_active(&self) -> bool {
        self.factory
            .current_connection()
            .is_some_and(|connection| connection.lock().is_transaction_active())
    }

    pub(crate) fn implicit_transactions(&self) -> bool {
        self.implicit_transactions
    }

    pub(crate) fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub(crate) fn transaction(&self) -> Option<SharedTransaction> {
        self.transaction.clone()
    }

    /// Drop-time safety net: an uncompleted scope with a live transaction
    /// rolls back, then releases its transaction handle. Idempotent.
    pub(crate) fn finish(&mut self) {
        if !self.scope_completed && self.is_transaction_active() {
            if let Err(error) = self.rollback() {
                warn!(%error, kind = ?self.kind, "safety-net rollback failed");
            }
        }
        self.transaction = None;
    }
}

/// The outermost scope: opens the physical connection before beginning
/// the transaction and closes it again when dropped.
pub(crate) struct RootScope {
    state: ScopeState,
}

impl RootScope {
    pub(crate) fn new(factory: Arc<ConnectionFactory>, implicit_transactions: bool) -> Self {
        Self {
            state: ScopeState::new(factory, ScopeKind::Root, implicit_transactions),
        }
    }

    fn connection_needs_open(&self) -> bool {
        match self.state.factory().current_connection() {
            None => true,
            Some(connection) => connection.lock().state() == ConnectionState::Closed,
        }
    }
}

#[async_trait]
impl UnitOfWorkScope for RootScope {
    fn begin_transaction(&mut self) -> UowResult<()> {
        if self.connection_needs_open() {
            self.state.factory().open()?;
        }
        self.state.begin_transaction()
    }

    async fn begin_transaction_async(&mut self) -> UowResult<()> {
        if self.connection_needs_open() {
            self.state.factory().open_async().await?;
        }
        self.state.begin_transaction()
    }

    fn commit(&mut self) -> UowResult<()> {
        self.state.commit()
    }

    fn rollback(&mut self) -> UowResult<()> {
        self.state.rollback()
    }

    fn is_transaction_active(&self) -> bool {
        self.state.is_transaction_active()
    }

    fn is_implicit_transactions_enabled(&self) -> bool {
        self.state.implicit_transactions()
    }

    fn kind(&self) -> ScopeKind {
        self.state.kind()
    }

    fn transaction(&self) -> Option<SharedTransaction> {
        self.state.transaction()
    }
}

impl Drop for RootScope {
    fn drop(&mut self) {
        self.state.finish();
        // Sole owner of the physical connection's lifetime.
        if let Some(connection) = self.state.factory().unbind_current_connection() {
            if let Err(error) = connection.lock().close() {
                warn!(%error, "failed to close connection on root scope drop");
            }
        }
    }
}

/// A nested scope riding on the root's connection and transaction.
pub(crate) struct DependentScope {
    state: ScopeState,
}

impl DependentScope {
    pub(crate) fn new(factory: Arc<ConnectionFactory>, implicit_transactions: bool) -> Self {
        Self {
            state: ScopeState::new(factory, ScopeKind::Dependent, implicit_transactions),
        }
    }
}

#[async_trait]
impl UnitOfWorkScope for DependentScope {
    fn begin_transaction(&mut self) -> UowResult<()> {
        self.state.begin_transaction()
    }

    async fn begin_transaction_async(&mut self) -> UowResult<()> {
        self.state.begin_transaction()
    }

    fn commit(&mut self) -> UowResult<()> {
        self.state.commit()
    }

    fn rollback(&mut self) -> UowResult<()> {
        self.state.rollback()
    }

    fn is_transaction_active(&self) -> bool {
        self.state.is_transaction_active()
    }

    fn is_implicit_transactions_enabled(&self) -> bool {
        self.state.implicit_transactions()
    }

    fn kind(&self) -> ScopeKind {
        self.state.kind()
    }

    fn transaction(&self) -> Option<SharedTransaction> {
        self.state.transaction()
    }
}

impl Drop for DependentScope {
    fn drop(&mut self) {
        self.state.finish();
    }
}
