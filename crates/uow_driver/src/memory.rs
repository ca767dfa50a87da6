//! In-memory driver for testing.

use crate::connection::{ConnectionState, DriverConnection, DriverTransaction};
use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An observable event recorded by the in-memory driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// A connection was opened.
    Opened,
    /// A connection was closed.
    Closed,
    /// A transaction with the given id was begun.
    TransactionBegun(u64),
    /// The transaction with the given id was committed.
    Committed(u64),
    /// The transaction with the given id was rolled back.
    RolledBack(u64),
    /// A statement was executed.
    Statement(String),
}

/// An in-memory database connection.
///
/// This driver stores no data; it tracks connection and transaction
/// lifecycles and records every operation into a journal that can be
/// shared across connections. It is suitable for:
/// - Unit tests of the unit-of-work engine
/// - Integration tests that assert commit/rollback ordering
///
/// # Example
///
/// ```rust
/// use uow_driver::{DriverConnection, DriverEvent, MemoryConnection};
///
/// let mut conn = MemoryConnection::new();
/// conn.open().unwrap();
/// let mut txn = conn.begin().unwrap();
/// txn.commit().unwrap();
///
/// assert_eq!(
///     conn.journal(),
///     vec![
///         DriverEvent::Opened,
///         DriverEvent::TransactionBegun(1),
///         DriverEvent::Committed(1),
///     ],
/// );
/// ```
#[derive(Debug)]
pub struct MemoryConnection {
    state: ConnectionState,
    /// Flips to false on close so outstanding transactions detach.
    live: Arc<AtomicBool>,
    next_txn_id: u64,
    journal: Arc<Mutex<Vec<DriverEvent>>>,
    connection_string: String,
}

impl MemoryConnection {
    /// Creates a new closed connection with its own journal.
    #[must_use]
    pub fn new() -> Self {
        Self::with_journal(Arc::new(Mutex::new(Vec::new())))
    }

    /// Creates a new closed connection recording into a shared journal.
    ///
    /// Tests hand the same journal to every connection a factory creates,
    /// so events remain observable after connections are replaced.
    #[must_use]
    pub fn with_journal(journal: Arc<Mutex<Vec<DriverEvent>>>) -> Self {
        Self {
            state: ConnectionState::Closed,
            live: Arc::new(AtomicBool::new(false)),
            next_txn_id: 0,
            journal,
            connection_string: "memory://".to_owned(),
        }
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn journal(&self) -> Vec<DriverEvent> {
        self.journal.lock().clone()
    }

    /// Returns the shared journal handle.
    #[must_use]
    pub fn journal_handle(&self) -> Arc<Mutex<Vec<DriverEvent>>> {
        Arc::clone(&self.journal)
    }

    fn record(&self, event: DriverEvent) {
        self.journal.lock().push(event);
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriverConnection for MemoryConnection {
    fn open(&mut self) -> DriverResult<()> {
        if self.state == ConnectionState::Open {
            return Err(DriverError::AlreadyOpen);
        }
        self.state = ConnectionState::Open;
        self.live = Arc::new(AtomicBool::new(true));
        self.record(DriverEvent::Opened);
        Ok(())
    }

    async fn open_async(&mut self) -> DriverResult<()> {
        self.open()
    }

    fn close(&mut self) -> DriverResult<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        self.live.store(false, Ordering::SeqCst);
        self.record(DriverEvent::Closed);
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn begin(&mut self) -> DriverResult<Box<dyn DriverTransaction>> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::NotOpen);
        }
        self.next_txn_id += 1;
        let id = self.next_txn_id;
        self.record(DriverEvent::TransactionBegun(id));
        Ok(Box::new(MemoryTransaction {
            id,
            completed: false,
            live: Arc::clone(&self.live),
            journal: Arc::clone(&self.journal),
        }))
    }

    fn execute(&mut self, statement: &str) -> DriverResult<()> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::NotOpen);
        }
        self.record(DriverEvent::Statement(statement.to_owned()));
        Ok(())
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

/// A transaction on a [`MemoryConnection`].
#[derive(Debug)]
pub struct MemoryTransaction {
    id: u64,
    completed: bool,
    live: Arc<AtomicBool>,
    journal: Arc<Mutex<Vec<DriverEvent>>>,
}

impl MemoryTransaction {
    fn ensure_attached(&self) -> DriverResult<()> {
        if self.completed {
            return Err(DriverError::TransactionCompleted);
        }
        if !self.live.load(Ordering::SeqCst) {
            return Err(DriverError::NotOpen);
        }
        Ok(())
    }
}

impl DriverTransaction for MemoryTransaction {
    fn commit(&mut self) -> DriverResult<()> {
        self.ensure_attached()?;
        self.completed = true;
        self.journal.lock().push(DriverEvent::Committed(self.id));
        Ok(())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        self.ensure_attached()?;
        self.completed = true;
        self.journal.lock().push(DriverEvent::RolledBack(self.id));
        Ok(())
    }

    fn is_attached(&self) -> bool {
        !self.completed && self.live.load(Ordering::SeqCst)
    }
}

impl Drop for MemoryTransaction {
    /// Rollback of last resort: a transaction dropped while still attached
    /// rolls back. A detached transaction drops silently.
    fn drop(&mut self) {
        if self.is_attached() {
            self.completed = true;
            self.journal.lock().push(DriverEvent::RolledBack(self.id));
        }
    }
}
