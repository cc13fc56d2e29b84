//! Text-id lookup boundary
//!
//! User-entered ids arrive as raw text. Anything that is not exactly a run
//! of ASCII digits fitting in an `i64` (surrounding whitespace counts as
//! bad input) becomes [`SENTINEL_ID`]. No stored row can carry that id, so
//! bad input resolves to "no such owner/dog" instead of an error.

use crate::model::{DogWithOwners, OwnerWithDogs, SENTINEL_ID};
use crate::storage::RelationalStore;
use crate::Result;

/// Coerce raw text to an id, falling back to the sentinel
pub fn parse_id(raw: &str) -> i64 {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return SENTINEL_ID;
    }
    raw.parse().unwrap_or(SENTINEL_ID)
}

/// Relation lookups keyed by raw text ids
pub struct Lookup<'a> {
    store: &'a RelationalStore,
}

impl<'a> Lookup<'a> {
    pub fn new(store: &'a RelationalStore) -> Self {
        Self { store }
    }

    /// Resolve the owner named by `raw_id` and its dogs
    pub fn owner_with_dogs(&self, raw_id: &str) -> Result<Vec<OwnerWithDogs>> {
        let id = parse_id(raw_id);
        tracing::debug!(raw = raw_id, id, "Owner lookup");
        self.store.get_owner_with_dogs(id)
    }

    /// Resolve the dog named by `raw_id` and its owners
    pub fn dog_with_owners(&self, raw_id: &str) -> Result<Vec<DogWithOwners>> {
        let id = parse_id(raw_id);
        tracing::debug!(raw = raw_id, id, "Dog lookup");
        self.store.get_dog_with_owners(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedSet;

    #[test]
    fn test_parse_valid_ids() {
        assert_eq!(parse_id("1"), 1);
        assert_eq!(parse_id("042"), 42);
    }

    #[test]
    fn test_parse_invalid_ids_fall_back() {
        for raw in ["", "   ", " 7", "abc", "1a", "-1", "+3", "1.5", "99999999999999999999"] {
            assert_eq!(parse_id(raw), SENTINEL_ID, "input {:?}", raw);
        }
    }

    #[test]
    fn test_lookup_through_text() {
        let store = RelationalStore::open_in_memory().unwrap();
        SeedSet::demo().apply(&store).unwrap();
        let lookup = Lookup::new(&store);

        let alice = lookup.owner_with_dogs("1").unwrap();
        assert_eq!(alice[0].dog_names(), vec!["Rex", "Buddy"]);

        let rex = lookup.dog_with_owners("1").unwrap();
        assert_eq!(rex[0].owner_names(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_bad_text_is_empty_result() {
        let store = RelationalStore::open_in_memory().unwrap();
        SeedSet::demo().apply(&store).unwrap();
        let lookup = Lookup::new(&store);

        assert!(lookup.owner_with_dogs("").unwrap().is_empty());
        assert!(lookup.dog_with_owners("rex").unwrap().is_empty());
        assert!(lookup.owner_with_dogs("999").unwrap().is_empty());
    }
}
