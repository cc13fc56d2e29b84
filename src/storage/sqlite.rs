//! SQLite storage implementation

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;

use super::schema;
use crate::model::{Dog, DogWithOwners, Owner, OwnerWithDogs, OwnershipLink};
use crate::{Error, Result};

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const SELECT_OWNER: &str = "SELECT ownerId, name FROM owner WHERE ownerId = ?1";
const SELECT_DOG: &str = "SELECT dogId, name FROM dog WHERE dogId = ?1";
const DOGS_OF_OWNER: &str =
    "SELECT dogId FROM OwnerDogCrossRef WHERE ownerId = ?1 ORDER BY rowid";
const OWNERS_OF_DOG: &str =
    "SELECT ownerId FROM OwnerDogCrossRef WHERE dogId = ?1 ORDER BY rowid";

/// Connection settings for file-backed stores
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a call waits on another connection's lock before failing
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl StoreOptions {
    pub fn with_busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout = Duration::from_millis(millis);
        self
    }
}

/// SQLite-backed store for owners, dogs and the links between them.
///
/// One handle is shared by every caller in the process (by reference or
/// `Arc`). The connection sits behind a mutex, so each call is atomic with
/// respect to the others, and the join reads additionally run inside a
/// SQLite transaction so other handles on the same file cannot be observed
/// half-way through a write.
pub struct RelationalStore {
    conn: Mutex<Connection>,
    location: String,
}

fn unavailable(location: &str, err: impl fmt::Display) -> Error {
    Error::StorageUnavailable {
        path: location.to_string(),
        reason: err.to_string(),
    }
}

impl RelationalStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        let location = path.display().to_string();
        let conn = Connection::open(path).map_err(|e| unavailable(&location, e))?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(|e| unavailable(&location, e))?;
        let journal: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| unavailable(&location, e))?;
        tracing::debug!(journal = %journal, "configured connection for {}", location);

        let store = Self::from_connection(conn, location)?;
        tracing::info!("Opened store at {}", store.location);
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let location = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|e| unavailable(&location, e))?;
        Self::from_connection(conn, location)
    }

    fn from_connection(mut conn: Connection, location: String) -> Result<Self> {
        Self::initialize_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// Initialize the database schema, refusing files from a newer build
    fn initialize_schema(conn: &mut Connection) -> Result<()> {
        let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if found > schema::SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found,
                supported: schema::SCHEMA_VERSION,
            });
        }

        let tx = conn.transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        if found < schema::SCHEMA_VERSION {
            tx.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Where the store lives (`:memory:` for in-memory stores)
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Schema version recorded in the database file
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.lock()?;
        let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    // ========== Insert Operations ==========

    /// Insert or replace an owner. The whole row is overwritten.
    pub fn insert_owner(&self, owner: &Owner) -> Result<()> {
        owner.validate()?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO owner (ownerId, name) VALUES (?1, ?2)",
            params![owner.owner_id, owner.name],
        )?;
        tracing::debug!(owner_id = owner.owner_id, "Stored owner {}", owner.name);
        Ok(())
    }

    /// Insert or replace a dog. The whole row is overwritten.
    pub fn insert_dog(&self, dog: &Dog) -> Result<()> {
        dog.validate()?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO dog (dogId, name) VALUES (?1, ?2)",
            params![dog.dog_id, dog.name],
        )?;
        tracing::debug!(dog_id = dog.dog_id, "Stored dog {}", dog.name);
        Ok(())
    }

    /// Insert an ownership link.
    ///
    /// A link is nothing but its key, so replacing an existing one leaves
    /// the row as it was and it keeps its position in link order. Neither
    /// id is checked against the entity tables.
    pub fn insert_ownership_link(&self, link: &OwnershipLink) -> Result<()> {
        link.validate()?;
        let conn = self.lock()?;
        let inserted = conn.execute(
            r#"
            INSERT INTO OwnerDogCrossRef (ownerId, dogId) VALUES (?1, ?2)
            ON CONFLICT (ownerId, dogId) DO NOTHING
            "#,
            params![link.owner_id, link.dog_id],
        )?;
        tracing::debug!(
            owner_id = link.owner_id,
            dog_id = link.dog_id,
            new = inserted > 0,
            "Stored ownership link"
        );
        Ok(())
    }

    // ========== Relation Queries ==========

    /// Resolve an owner and its dogs.
    ///
    /// Returns zero views when no owner has `owner_id`, otherwise exactly one.
    pub fn get_owner_with_dogs(&self, owner_id: i64) -> Result<Vec<OwnerWithDogs>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let resolved = resolve_join(&tx, owner_id, fetch_owner, DOGS_OF_OWNER, fetch_dog)?;
        tx.commit()?;

        let views: Vec<OwnerWithDogs> = resolved
            .map(|(owner, dogs)| OwnerWithDogs { owner, dogs })
            .into_iter()
            .collect();
        tracing::debug!(owner_id, found = !views.is_empty(), "Resolved owner with dogs");
        Ok(views)
    }

    /// Resolve a dog and its owners.
    ///
    /// Returns zero views when no dog has `dog_id`, otherwise exactly one.
    pub fn get_dog_with_owners(&self, dog_id: i64) -> Result<Vec<DogWithOwners>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let resolved = resolve_join(&tx, dog_id, fetch_dog, OWNERS_OF_DOG, fetch_owner)?;
        tx.commit()?;

        let views: Vec<DogWithOwners> = resolved
            .map(|(dog, owners)| DogWithOwners { dog, owners })
            .into_iter()
            .collect();
        tracing::debug!(dog_id, found = !views.is_empty(), "Resolved dog with owners");
        Ok(views)
    }

    // ========== Plain Lookups ==========

    /// Get an owner by id
    pub fn get_owner(&self, owner_id: i64) -> Result<Option<Owner>> {
        let conn = self.lock()?;
        Ok(fetch_owner(&conn, owner_id)?)
    }

    /// Get a dog by id
    pub fn get_dog(&self, dog_id: i64) -> Result<Option<Dog>> {
        let conn = self.lock()?;
        Ok(fetch_dog(&conn, dog_id)?)
    }

    /// All owners, ordered by id
    pub fn list_owners(&self) -> Result<Vec<Owner>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT ownerId, name FROM owner ORDER BY ownerId")?;
        let owners = stmt
            .query_map([], row_to_owner)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(owners)
    }

    /// All dogs, ordered by id
    pub fn list_dogs(&self) -> Result<Vec<Dog>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT dogId, name FROM dog ORDER BY dogId")?;
        let dogs = stmt
            .query_map([], row_to_dog)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(dogs)
    }

    /// All links, in insertion order
    pub fn list_links(&self) -> Result<Vec<OwnershipLink>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT ownerId, dogId FROM OwnerDogCrossRef ORDER BY rowid")?;
        let links = stmt
            .query_map([], |row| Ok(OwnershipLink::new(row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }

    // ========== Counts ==========

    /// Count all owners
    pub fn count_owners(&self) -> Result<usize> {
        let conn = self.lock()?;
        count(&conn, "SELECT COUNT(*) FROM owner")
    }

    /// Count all dogs
    pub fn count_dogs(&self) -> Result<usize> {
        let conn = self.lock()?;
        count(&conn, "SELECT COUNT(*) FROM dog")
    }

    /// Count all links
    pub fn count_links(&self) -> Result<usize> {
        let conn = self.lock()?;
        count(&conn, "SELECT COUNT(*) FROM OwnerDogCrossRef")
    }

    /// Count links whose owner or dog row is missing
    pub fn count_orphan_links(&self) -> Result<usize> {
        let conn = self.lock()?;
        count(&conn, COUNT_ORPHAN_LINKS)
    }

    /// Get database statistics from a single snapshot
    pub fn stats(&self) -> Result<DbStats> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let stats = DbStats {
            owners: count(&tx, "SELECT COUNT(*) FROM owner")?,
            dogs: count(&tx, "SELECT COUNT(*) FROM dog")?,
            links: count(&tx, "SELECT COUNT(*) FROM OwnerDogCrossRef")?,
            orphan_links: count(&tx, COUNT_ORPHAN_LINKS)?,
        };
        tx.commit()?;
        Ok(stats)
    }
}

const COUNT_ORPHAN_LINKS: &str = r#"
SELECT COUNT(*) FROM OwnerDogCrossRef l
WHERE NOT EXISTS (SELECT 1 FROM owner o WHERE o.ownerId = l.ownerId)
   OR NOT EXISTS (SELECT 1 FROM dog d WHERE d.dogId = l.dogId)
"#;

/// Anchor lookup, link scan, then one fetch per linked key.
///
/// Links whose opposite row is missing are skipped. Callers run this inside
/// a transaction so all three steps read the same snapshot.
fn resolve_join<A, B>(
    conn: &Connection,
    anchor_id: i64,
    fetch_anchor: fn(&Connection, i64) -> rusqlite::Result<Option<A>>,
    link_scan: &str,
    fetch_other: fn(&Connection, i64) -> rusqlite::Result<Option<B>>,
) -> Result<Option<(A, Vec<B>)>> {
    let Some(anchor) = fetch_anchor(conn, anchor_id)? else {
        return Ok(None);
    };

    let linked: Vec<i64> = {
        let mut stmt = conn.prepare_cached(link_scan)?;
        stmt.query_map([anchor_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut related = Vec::with_capacity(linked.len());
    for id in linked {
        match fetch_other(conn, id)? {
            Some(other) => related.push(other),
            None => tracing::debug!(anchor_id, missing = id, "Skipping orphaned link"),
        }
    }

    Ok(Some((anchor, related)))
}

fn fetch_owner(conn: &Connection, owner_id: i64) -> rusqlite::Result<Option<Owner>> {
    conn.prepare_cached(SELECT_OWNER)?
        .query_row([owner_id], row_to_owner)
        .optional()
}

fn fetch_dog(conn: &Connection, dog_id: i64) -> rusqlite::Result<Option<Dog>> {
    conn.prepare_cached(SELECT_DOG)?
        .query_row([dog_id], row_to_dog)
        .optional()
}

fn row_to_owner(row: &rusqlite::Row) -> rusqlite::Result<Owner> {
    Ok(Owner {
        owner_id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_dog(row: &rusqlite::Row) -> rusqlite::Result<Dog> {
    Ok(Dog {
        dog_id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn count(conn: &Connection, sql: &str) -> Result<usize> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub owners: usize,
    pub dogs: usize,
    pub links: usize,
    pub orphan_links: usize,
}

impl fmt::Display for DbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Owners: {}", self.owners)?;
        writeln!(f, "  Dogs: {}", self.dogs)?;
        writeln!(f, "  Links: {}", self.links)?;
        writeln!(f, "  Orphan links: {}", self.orphan_links)
    }
}
