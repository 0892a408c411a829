//! `SQLite` schema definitions for the origin store.
//!
//! The store is a plain key/value table: each slot holds one serialized
//! payload and the time it was last written.

/// SQL statement to create the slots table.
pub const CREATE_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Overwrite a slot, creating it if needed.
pub const UPSERT_SLOT: &str = r"
INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SLOTS_TABLE, CREATE_METADATA_TABLE];
