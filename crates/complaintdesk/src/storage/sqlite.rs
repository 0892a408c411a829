//! `SQLite`-backed slot store.
//!
//! The database file plays the part of an origin: every desk opened on the same
//! file sees the same slots, with no coordination between them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, trace};

use super::{check_quota, migrations, schema, SlotStore};
use crate::error::{Error, Result};

/// Path reported for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

/// Slot store in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteSlots {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Per-slot byte limit, if any.
    quota: Option<usize>,
}

/// What is known about a stored slot without decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    /// The slot key.
    pub key: String,
    /// Payload size in bytes.
    pub bytes: usize,
    /// When the slot was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SqliteSlots {
    /// Open or create a slot database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening origin store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL lets a second desk read while another is writing
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Origin store opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            quota: None,
        })
    }

    /// Create an in-memory slot database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
            quota: None,
        })
    }

    /// Limit each slot to `quota` bytes of key plus value.
    #[must_use]
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Describe the slot under `key`, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn slot_info(&self, key: &str) -> Result<Option<SlotInfo>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT length(CAST(value AS BLOB)), updated_at FROM slots WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(bytes, updated_at)| SlotInfo {
            key: key.to_string(),
            bytes: usize::try_from(bytes).unwrap_or(0),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }))
    }

    /// Keys of every stored slot, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM slots ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl SlotStore for SqliteSlots {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        trace!(key, found = value.is_some(), "Read slot");
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        check_quota(key, value, self.quota)?;
        self.conn
            .execute(schema::UPSERT_SLOT, params![key, value, Utc::now().to_rfc3339()])?;
        trace!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}
