//! # UOW Driver
//!
//! Database driver abstraction for the UOW engine.
//!
//! This crate defines the seam between the unit-of-work engine and a
//! concrete database provider. Drivers are **plain connections** - they
//! open, close, execute statements and hand out transactions. The engine
//! above them owns all scoping policy: drivers do not know about root or
//! dependent scopes, implicit transactions, or connection factories.
//!
//! ## Design Principles
//!
//! - A driver connection is a single physical connection, not a pool
//! - Transactions detach from their connection on commit/rollback; a
//!   detached transaction cannot be completed twice
//! - Drivers do not police nesting - one level up, the engine's decorated
//!   connection rejects parallel transactions
//!
//! ## Available Drivers
//!
//! - [`MemoryConnection`] - For testing and ephemeral use; records an
//!   observable event journal
//!
//! ## Example
//!
//! ```rust
//! use uow_driver::{ConnectionState, DriverConnection, MemoryConnection};
//!
//! let mut conn = MemoryConnection::new();
//! conn.open().unwrap();
//! assert_eq!(conn.state(), ConnectionState::Open);
//!
//! let mut txn = conn.begin().unwrap();
//! txn.commit().unwrap();
//! assert!(!txn.is_attached());
//! ```

mod connection;
mod error;
mod memory;

pub use connection::{ConnectionState, DriverConnection, DriverTransaction};
pub use error::{DriverError, DriverResult};
pub use memory::{DriverEvent, MemoryConnection, MemoryTransaction};
