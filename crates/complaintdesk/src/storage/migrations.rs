//! Schema versioning for the origin store.
//!
//! The version lives in the `metadata` table. Version 1 is the slots table
//! itself; later versions get a `migrate_vN` step here.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Create the tables if needed and bring the schema to [`CURRENT_VERSION`].
///
/// Safe to call on every open.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = get_schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if version < CURRENT_VERSION {
        debug!(from = version, to = CURRENT_VERSION, "Migrating origin store schema");
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Read the recorded schema version, 0 for a database that has none.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(stored) = stored else {
        return Ok(0);
    };
    stored.parse().map_err(|_| Error::DatabaseMigration {
        message: format!("invalid schema version: {stored}"),
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Apply every step after `from_version`, recording each as it lands.
fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    for step in (from_version + 1)..=CURRENT_VERSION {
        run_migration(conn, step)?;
        set_schema_version(conn, step)?;
    }
    Ok(())
}

fn run_migration(_conn: &Connection, version: i32) -> Result<()> {
    match version {
        // The slots table comes from SCHEMA_STATEMENTS
        1 => Ok(()),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}
