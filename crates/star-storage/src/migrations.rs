//! Database migrations
//!
//! Applies the schema registry. Every statement is `IF NOT EXISTS`, so
//! re-running a migration against an up-to-date file changes nothing.

use rusqlite::{Connection, OptionalExtension};

use crate::collection::Collection;
use crate::error::StorageError;
use crate::Result;

pub const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let current_version = get_schema_version(&tx)?;

    if current_version > SCHEMA_VERSION {
        return Err(StorageError::StoreUnavailable(format!(
            "schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    ensure_schema(&tx, current_version, SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Bring the schema from `current_version` up to `target_version`.
pub fn ensure_schema(conn: &Connection, current_version: i32, target_version: i32) -> Result<()> {
    if current_version < 1 && target_version >= 1 {
        migrate_v1(conn)?;
    }

    if current_version != target_version {
        set_schema_version(conn, target_version)?;
        tracing::info!(
            from = current_version,
            to = target_version,
            "Schema upgraded"
        );
    }
    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1: Initial collections");

    for collection in Collection::ALL {
        create_collection(conn, collection)?;
    }

    Ok(())
}

/// AUTOINCREMENT keeps keys monotonic: ids of deleted or cleared records
/// are never handed out again.
fn create_collection(conn: &Connection, collection: Collection) -> Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL
        );",
        collection.as_str()
    ))?;

    for index in collection.indexes() {
        conn.execute_batch(&format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {}({});",
            if index.unique { "UNIQUE " } else { "" },
            index.name(collection),
            collection.as_str(),
            index.expression(),
        ))?;
    }

    tracing::debug!(
        collection = %collection,
        indexes = collection.indexes().len(),
        "Ensured collection"
    );

    Ok(())
}
