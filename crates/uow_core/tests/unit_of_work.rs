//! End-to-end unit-of-work scenarios over the in-memory driver.

use parking_lot::Mutex;
use std::sync::Arc;
use uow_core::{ConnectionFactory, ScopeKind, UnitOfWork, UnitOfWorkConfig, UowError};
use uow_driver::{ConnectionState, DriverEvent, MemoryConnection};

struct Fixture {
    factory: Arc<ConnectionFactory>,
    journal: Arc<Mutex<Vec<DriverEvent>>>,
}

impl Fixture {
    fn new() -> Self {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let journal_for_factory = Arc::clone(&journal);
        let factory = Arc::new(ConnectionFactory::new(move || {
            Box::new(MemoryConnection::with_journal(Arc::clone(
                &journal_for_factory,
            )))
        }));
        Self { factory, journal }
    }

    fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(Arc::clone(&self.factory))
    }

    fn unit_of_work_with_implicit_transactions(&self) -> UnitOfWork {
        UnitOfWork::with_config(
            Arc::clone(&self.factory),
            UnitOfWorkConfig::new().implicit_transactions(true),
        )
    }

    fn events(&self) -> Vec<DriverEvent> {
        self.journal.lock().clone()
    }

    fn connection_state(&self) -> Option<ConnectionState> {
        self.factory
            .current_connection()
            .map(|connection| connection.lock().state())
    }
}

#[test]
fn factory_open_twice_without_close_fails() {
    let fixture = Fixture::new();
    fixture.factory.open().unwrap();
    assert!(matches!(
        fixture.factory.open(),
        Err(UowError::InvalidOperation { .. })
    ));
}

#[test]
fn first_start_creates_root_scope_and_opens_connection() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let scope = uow.start().unwrap();

    assert_eq!(scope.kind(), ScopeKind::Root);
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
}

#[test]
fn second_start_creates_dependent_scope_sharing_the_transaction() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let root = uow.start().unwrap();
    let dependent = uow.start().unwrap();

    assert_eq!(root.kind(), ScopeKind::Root);
    assert_eq!(dependent.kind(), ScopeKind::Dependent);
    let root_txn = root.transaction().unwrap();
    let dependent_txn = dependent.transaction().unwrap();
    assert!(Arc::ptr_eq(&root_txn, &dependent_txn));
}

#[test]
fn begin_transaction_again_has_no_observable_effect() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut scope = uow.start().unwrap();
    let before = scope.transaction().unwrap();
    scope.begin_transaction().unwrap();
    let after = scope.transaction().unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(
        fixture.events(),
        vec![DriverEvent::Opened, DriverEvent::TransactionBegun(1)],
    );
}

#[test]
fn dependent_commit_leaves_the_root_transaction_active() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let root = uow.start().unwrap();
    let mut dependent = uow.start().unwrap();
    dependent.commit().unwrap();

    // Dependent commit is bookkeeping only; the connection-level
    // transaction both scopes observe is still the root's.
    assert!(dependent.is_transaction_active());
    assert!(root.is_transaction_active());
    assert!(!fixture
        .events()
        .iter()
        .any(|event| matches!(event, DriverEvent::Committed(_))));
}

#[test]
fn root_commit_really_commits() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut scope = uow.start().unwrap();
    scope.commit().unwrap();

    assert!(!scope.is_transaction_active());
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
    assert_eq!(
        fixture.events(),
        vec![
            DriverEvent::Opened,
            DriverEvent::TransactionBegun(1),
            DriverEvent::Committed(1),
        ],
    );
}

#[test]
fn root_commit_with_implicit_transactions_restarts() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work_with_implicit_transactions();

    let mut scope = uow.start().unwrap();
    let first = scope.transaction().unwrap();
    scope.commit().unwrap();

    assert!(scope.is_transaction_active());
    let second = scope.transaction().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
}

#[test]
fn start_after_commit_yields_dependent_scope_with_fresh_transaction() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut first = uow.start().unwrap();
    let first_txn = first.transaction().unwrap();
    first.commit().unwrap();

    // The connection stays open, so the second scope is dependent; its
    // begin creates a fresh transaction because none is active anymore.
    let second = uow.start().unwrap();
    let second_txn = second.transaction().unwrap();

    assert_eq!(first.kind(), ScopeKind::Root);
    assert_eq!(second.kind(), ScopeKind::Dependent);
    assert!(!Arc::ptr_eq(&first_txn, &second_txn));
    assert!(second.is_transaction_active());
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
}

#[test]
fn commit_then_begin_again_on_same_scope_starts_new_transaction() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut scope = uow.start().unwrap();
    let first = scope.transaction().unwrap();
    scope.commit().unwrap();

    scope.begin_transaction().unwrap();
    let second = scope.transaction().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(scope.is_transaction_active());
}

#[test]
fn dropping_uncompleted_scope_rolls_back() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    {
        let _scope = uow.start().unwrap();
    }

    assert!(fixture.events().contains(&DriverEvent::RolledBack(1)));
    // Root scope drop unbinds and closes the connection.
    assert!(fixture.factory.current_connection().is_none());
    assert_eq!(
        fixture.events().last(),
        Some(&DriverEvent::Closed),
    );
}

#[test]
fn dropping_committed_scope_does_not_roll_back() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    {
        let mut scope = uow.start().unwrap();
        scope.commit().unwrap();
    }

    assert!(!fixture
        .events()
        .iter()
        .any(|event| matches!(event, DriverEvent::RolledBack(_))));
    assert!(fixture.factory.current_connection().is_none());
}

#[test]
fn rollback_on_root_really_rolls_back() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut scope = uow.start().unwrap();
    scope.rollback().unwrap();

    assert!(!scope.is_transaction_active());
    assert!(fixture.events().contains(&DriverEvent::RolledBack(1)));
}

#[test]
fn two_scopes_commit_in_order() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut a = uow.start().unwrap();
    let mut b = uow.start().unwrap();

    b.commit().unwrap();
    assert!(a.is_transaction_active());

    a.commit().unwrap();
    assert!(!a.is_transaction_active());
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
    assert_eq!(
        fixture.events(),
        vec![
            DriverEvent::Opened,
            DriverEvent::TransactionBegun(1),
            DriverEvent::Committed(1),
        ],
    );
}

#[test]
fn statements_execute_inside_the_scope_transaction() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let mut scope = uow.start().unwrap();
    fixture
        .factory
        .current_connection()
        .unwrap()
        .lock()
        .execute("insert into tag values ('rust')")
        .unwrap();
    scope.commit().unwrap();

    assert_eq!(
        fixture.events(),
        vec![
            DriverEvent::Opened,
            DriverEvent::TransactionBegun(1),
            DriverEvent::Statement("insert into tag values ('rust')".to_owned()),
            DriverEvent::Committed(1),
        ],
    );
}

#[test]
fn new_root_scope_after_connection_closed() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    {
        let mut scope = uow.start().unwrap();
        scope.commit().unwrap();
    }

    let scope = uow.start().unwrap();
    assert_eq!(scope.kind(), ScopeKind::Root);
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
}

#[tokio::test]
async fn start_async_creates_root_scope_with_begun_transaction() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work();

    let scope = uow.start_async().await.unwrap();

    assert_eq!(scope.kind(), ScopeKind::Root);
    assert!(scope.is_transaction_active());
    assert_eq!(fixture.connection_state(), Some(ConnectionState::Open));
}

#[tokio::test]
async fn async_commit_and_restart_scenario() {
    let fixture = Fixture::new();
    let uow = fixture.unit_of_work_with_implicit_transactions();

    let mut scope = uow.start_async().await.unwrap();
    scope.commit_async().await.unwrap();
    assert!(scope.is_transaction_active());
    scope.rollback_async().await.unwrap();
    assert!(scope.is_transaction_active());

    let committed: Vec<_> = fixture
        .events()
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                DriverEvent::Committed(_) | DriverEvent::RolledBack(_)
            )
        })
        .collect();
    assert_eq!(
        committed,
        vec![DriverEvent::Committed(1), DriverEvent::RolledBack(2)],
    );
}
