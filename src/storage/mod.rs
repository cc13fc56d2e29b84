//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - owner(ownerId, name)
//! - dog(dogId, name)
//! - OwnerDogCrossRef(ownerId, dogId)

pub mod schema;
pub mod sqlite;

pub use sqlite::{RelationalStore, StoreOptions, DbStats};
