//! # UOW Core
//!
//! Unit-of-work and transaction scoping engine over pluggable database
//! drivers.
//!
//! This crate provides:
//! - A [`ConnectionFactory`] tracking one current connection per logical
//!   unit of work
//! - A [`DecoratedConnection`] wrapping a driver connection and its one
//!   active transaction
//! - The scope state machine: a root scope owning the physical connection
//!   and real transaction, and dependent scopes that piggyback on it
//! - The [`UnitOfWork`] dispatcher deciding root vs. dependent per
//!   `start()` call
//! - Domain-driven-design equality contracts ([`domain`]) and text
//!   helpers ([`text`])
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use uow_core::{ConnectionFactory, UnitOfWork};
//! use uow_driver::MemoryConnection;
//!
//! let factory = Arc::new(ConnectionFactory::new(|| {
//!     Box::new(MemoryConnection::new())
//! }));
//! let unit_of_work = UnitOfWork::new(Arc::clone(&factory));
//!
//! let mut scope = unit_of_work.start()?;
//! factory
//!     .current_connection()
//!     .expect("scope opened a connection")
//!     .lock()
//!     .execute("insert into tag values ('rust')")?;
//! scope.commit()?;
//! # Ok::<(), uow_core::UowError>(())
//! ```
//!
//! Dropping a scope that was neither committed nor rolled back rolls its
//! transaction back, so an early `?` return inside a unit of work cannot
//! leave a transaction hanging open.

mod config;
mod connection;
pub mod domain;
mod error;
mod factory;
mod scope;
pub mod text;
mod unit_of_work;

pub use config::UnitOfWorkConfig;
pub use connection::{DecoratedConnection, SharedConnection, SharedTransaction};
pub use error::{UowError, UowResult};
pub use factory::ConnectionFactory;
pub use scope::{ScopeKind, UnitOfWorkScope};
pub use unit_of_work::UnitOfWork;
