//! Seed data - the demo set and seed files
//!
//! A seed file lists `owners`, `dogs` and `links` in TOML or JSON:
//!
//! ```toml
//! [[owners]]
//! ownerId = 1
//! name = "Alice"
//!
//! [[dogs]]
//! dogId = 1
//! name = "Rex"
//!
//! [[links]]
//! ownerId = 1
//! dogId = 1
//! ```
//!
//! Applying a seed goes through the regular inserts, so re-applying it is
//! harmless.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Dog, Owner, OwnershipLink};
use crate::storage::RelationalStore;
use crate::{Error, Result};

/// A batch of rows to load into a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub dogs: Vec<Dog>,
    #[serde(default)]
    pub links: Vec<OwnershipLink>,
}

/// Number of rows written by [`SeedSet::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub owners: usize,
    pub dogs: usize,
    pub links: usize,
}

impl SeedSet {
    /// Two owners, two dogs, three links: Alice owns Rex and Buddy, Bob owns Rex.
    pub fn demo() -> Self {
        Self {
            owners: vec![Owner::new(1, "Alice"), Owner::new(2, "Bob")],
            dogs: vec![Dog::new(1, "Rex"), Dog::new(2, "Buddy")],
            links: vec![
                OwnershipLink::new(1, 1),
                OwnershipLink::new(1, 2),
                OwnershipLink::new(2, 1),
            ],
        }
    }

    /// Parse a TOML seed document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let seed: SeedSet =
            toml::from_str(contents).map_err(|e| Error::Validation(format!("seed: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Parse a JSON seed document
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let seed: SeedSet = serde_json::from_str(contents)
            .map_err(|e| Error::Validation(format!("seed: {}", e)))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Load a seed file, picking the format from the extension (`.json` or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Check every record before anything is written
    pub fn validate(&self) -> Result<()> {
        self.owners.iter().try_for_each(Owner::validate)?;
        self.dogs.iter().try_for_each(Dog::validate)?;
        self.links.iter().try_for_each(OwnershipLink::validate)
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.dogs.is_empty() && self.links.is_empty()
    }

    /// Write the set through the store's inserts: dogs, then owners, then links
    pub fn apply(&self, store: &RelationalStore) -> Result<SeedReport> {
        self.validate()?;

        for dog in &self.dogs {
            store.insert_dog(dog)?;
        }
        for owner in &self.owners {
            store.insert_owner(owner)?;
        }
        for link in &self.links {
            store.insert_ownership_link(link)?;
        }

        let report = SeedReport {
            owners: self.owners.len(),
            dogs: self.dogs.len(),
            links: self.links.len(),
        };
        tracing::info!(
            owners = report.owners,
            dogs = report.dogs,
            links = report.links,
            "Applied seed to {}",
            store.location()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_is_idempotent() {
        let store = RelationalStore::open_in_memory().unwrap();
        let seed = SeedSet::demo();

        seed.apply(&store).unwrap();
        seed.apply(&store).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!((stats.owners, stats.dogs, stats.links), (2, 2, 3));
    }

    #[test]
    fn test_parse_toml_seed() {
        let seed = SeedSet::from_toml_str(
            r#"
            [[owners]]
            ownerId = 3
            name = "Carol"

            [[dogs]]
            dogId = 4
            name = "Fido"

            [[links]]
            ownerId = 3
            dogId = 4
            "#,
        )
        .unwrap();

        assert_eq!(seed.owners, vec![Owner::new(3, "Carol")]);
        assert_eq!(seed.dogs, vec![Dog::new(4, "Fido")]);
        assert_eq!(seed.links, vec![OwnershipLink::new(3, 4)]);
    }

    #[test]
    fn test_parse_json_seed_with_missing_sections() {
        let seed = SeedSet::from_json_str(r#"{ "dogs": [{ "dogId": 9, "name": "Lassie" }] }"#)
            .unwrap();
        assert!(seed.owners.is_empty());
        assert_eq!(seed.dogs.len(), 1);
    }

    #[test]
    fn test_empty_seed_file() {
        let seed = SeedSet::from_toml_str("").unwrap();
        assert!(seed.is_empty());
        assert!(!SeedSet::demo().is_empty());

        let store = RelationalStore::open_in_memory().unwrap();
        assert_eq!(seed.apply(&store).unwrap(), SeedReport::default());
    }

    #[test]
    fn test_missing_identity_is_validation_error() {
        let err = SeedSet::from_json_str(r#"{ "owners": [{ "name": "Anon" }] }"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("ownerId"));
    }

    #[test]
    fn test_invalid_record_writes_nothing() {
        let store = RelationalStore::open_in_memory().unwrap();
        let mut seed = SeedSet::demo();
        seed.links.push(OwnershipLink::new(0, 1));

        assert!(seed.apply(&store).is_err());
        assert_eq!(store.count_dogs().unwrap(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, serde_json::to_string(&SeedSet::demo()).unwrap()).unwrap();

        let loaded = SeedSet::load(&path).unwrap();
        assert_eq!(loaded, SeedSet::demo());
    }
}
