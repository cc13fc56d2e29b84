//! Database schema definitions

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// SQL to create the owner table
pub const CREATE_OWNER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS owner (
    ownerId INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
)
"#;

/// SQL to create the dog table
pub const CREATE_DOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS dog (
    dogId INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
)
"#;

/// SQL to create the join table.
/// No foreign keys: links may reference rows that do not exist.
pub const CREATE_CROSS_REF_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS OwnerDogCrossRef (
    ownerId INTEGER NOT NULL,
    dogId INTEGER NOT NULL,
    PRIMARY KEY (ownerId, dogId)
)
"#;

/// SQL to create indexes. The primary key already covers `ownerId` scans.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_cross_ref_dog ON OwnerDogCrossRef(dogId)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_OWNER_TABLE,
        CREATE_DOG_TABLE,
        CREATE_CROSS_REF_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
