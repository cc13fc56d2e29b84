//! # Kennel - Many-to-many relational store
//!
//! Owners and dogs linked through an explicit join table, kept in a
//! single local SQLite file.
//!
//! Kennel provides:
//! - Entity types (`Owner`, `Dog`, `OwnershipLink`) and the composite views
//!   `OwnerWithDogs` / `DogWithOwners`
//! - `RelationalStore`: replace-on-conflict inserts and transactional join reads
//! - Seed data loading and the text-id lookup boundary used by the CLI

pub mod model;
pub mod storage;
pub mod seed;
pub mod lookup;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use model::{Dog, DogWithOwners, Owner, OwnerWithDogs, OwnershipLink};
pub use storage::{RelationalStore, StoreOptions};
pub use seed::SeedSet;
pub use lookup::{Lookup, parse_id};

/// Result type alias for Kennel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Kennel operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage unavailable at {path}: {reason}")]
    StorageUnavailable { path: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported schema version {found} (this build supports {supported})")]
    UnsupportedSchemaVersion { found: i64, supported: i64 },

    #[error("Store lock poisoned")]
    LockPoisoned,
}
