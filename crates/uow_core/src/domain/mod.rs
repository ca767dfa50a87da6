//! Domain-driven-design base contracts.
//!
//! Equality is capability-based: types state their comparison fields by
//! implementing [`BusinessKey`] or [`ValueObject`] directly. There is no
//! attribute scanning, no reflection and no per-type cache - the compiler
//! monomorphizes the comparison.

mod entity;
mod repository;
mod value_object;

pub use entity::{BusinessKey, Entity};
pub use repository::{CrudRepository, ReadOnlyRepository};
pub use value_object::ValueObject;
