//! Entity types - owners, dogs and the ownership join record
//!
//! Field names serialize in camelCase (`ownerId`, `dogId`) so seed files,
//! JSON output and the SQL column names all agree.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Id that the lookup boundary substitutes for unparseable input.
/// No stored entity may use it.
pub const SENTINEL_ID: i64 = 0;

fn validate_id(entity: &str, field: &str, id: i64) -> Result<()> {
    if id == SENTINEL_ID {
        return Err(Error::Validation(format!(
            "{entity}.{field} must not be {SENTINEL_ID} (reserved for unknown ids)"
        )));
    }
    Ok(())
}

/// A dog owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Caller-supplied identity
    pub owner_id: i64,
    pub name: String,
}

impl Owner {
    pub fn new(owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
        }
    }

    /// Check the payload before it is written
    pub fn validate(&self) -> Result<()> {
        validate_id("owner", "ownerId", self.owner_id)
    }
}

/// A dog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    /// Caller-supplied identity
    pub dog_id: i64,
    pub name: String,
}

impl Dog {
    pub fn new(dog_id: i64, name: impl Into<String>) -> Self {
        Self {
            dog_id,
            name: name.into(),
        }
    }

    /// Check the payload before it is written
    pub fn validate(&self) -> Result<()> {
        validate_id("dog", "dogId", self.dog_id)
    }
}

/// Join record: "owner owns dog".
///
/// Identity is the `(owner_id, dog_id)` pair. Neither side is checked
/// against the entity tables, so a link may point at a missing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipLink {
    pub owner_id: i64,
    pub dog_id: i64,
}

impl OwnershipLink {
    pub fn new(owner_id: i64, dog_id: i64) -> Self {
        Self { owner_id, dog_id }
    }

    /// Check the payload before it is written
    pub fn validate(&self) -> Result<()> {
        validate_id("link", "ownerId", self.owner_id)?;
        validate_id("link", "dogId", self.dog_id)
    }
}

/// An owner together with every dog linked to it, in link insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerWithDogs {
    pub owner: Owner,
    pub dogs: Vec<Dog>,
}

/// A dog together with every owner linked to it, in link insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogWithOwners {
    pub dog: Dog,
    pub owners: Vec<Owner>,
}

impl OwnerWithDogs {
    /// Names of the resolved dogs, in order
    pub fn dog_names(&self) -> Vec<&str> {
        self.dogs.iter().map(|d| d.name.as_str()).collect()
    }
}

impl DogWithOwners {
    /// Names of the resolved owners, in order
    pub fn owner_names(&self) -> Vec<&str> {
        self.owners.iter().map(|o| o.name.as_str()).collect()
    }
}
