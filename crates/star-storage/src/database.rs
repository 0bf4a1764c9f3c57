//! Database connection and operations

use parking_lot::Mutex;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::collection::Collection;
use crate::document::{self, Document};
use crate::error::StorageError;
use crate::migrations::{get_schema_version, run_migrations};
use crate::transaction::StoreTransaction;
use crate::Result;

/// Synchronous handle to the store file. Clones share one connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the store file and bring its schema up to date.
    /// Any failure on the way is reported as `StoreUnavailable`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(StorageError::unavailable)?;

        // WAL mode for better concurrent performance
        let _: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(StorageError::unavailable)?;

        let db = Self::initialize(conn)?;
        tracing::info!(path = %path.display(), "Opened store");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::unavailable)?;
        Self::initialize(conn)
    }

    fn initialize(mut conn: Connection) -> Result<Self> {
        run_migrations(&mut conn).map_err(|e| match e {
            StorageError::StoreUnavailable(_) => e,
            other => StorageError::unavailable(other),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Run `f` in one transaction through the typed record API. Any error
    /// rolls the whole transaction back; `f` may fail with its own error type.
    pub fn record_transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&StoreTransaction<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StorageError::from)?;
        let result = f(&StoreTransaction::new(&tx))?;
        tx.commit().map_err(StorageError::from)?;
        Ok(result)
    }

    /// True when both handles share the same underlying connection.
    pub fn same_store(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    pub fn schema_version(&self) -> Result<i32> {
        self.with_connection(get_schema_version)
    }

    /// Collections materialized in the file, sorted by name.
    pub fn collection_names(&self) -> Result<Vec<String>> {
        self.schema_objects("table").map(|names| {
            names
                .into_iter()
                .filter(|name| name.parse::<Collection>().is_ok())
                .collect()
        })
    }

    /// Secondary indexes materialized in the file, sorted by name.
    pub fn index_names(&self) -> Result<Vec<String>> {
        self.schema_objects("index").map(|names| {
            names
                .into_iter()
                .filter(|name| name.starts_with("idx_"))
                .collect()
        })
    }

    fn schema_objects(&self, kind: &str) -> Result<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")?;
            let names = stmt
                .query_map([kind], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    // === Collection operations ===

    /// Store a new record and return its freshly assigned key. Any `id`
    /// the document carries is discarded.
    pub fn create(&self, collection: Collection, record: &Document) -> Result<i64> {
        let id = self.with_connection(|conn| document::insert(conn, collection, record))?;
        tracing::debug!(collection = %collection, id, "Created record");
        Ok(id)
    }

    pub fn read_all(&self, collection: Collection) -> Result<Vec<Document>> {
        self.with_connection(|conn| document::all(conn, collection))
    }

    pub fn read_by_id(&self, collection: Collection, id: i64) -> Result<Option<Document>> {
        self.with_connection(|conn| document::get(conn, collection, id))
    }

    /// Records whose indexed `field` equals `value`.
    pub fn find_by_index(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        let index = collection
            .index(field)
            .ok_or_else(|| StorageError::UnknownIndex {
                collection,
                field: field.to_string(),
            })?;
        self.with_connection(|conn| document::find(conn, collection, index, value))
    }

    /// Replace an existing record wholesale.
    pub fn update(&self, collection: Collection, record: &Document) -> Result<()> {
        self.with_connection(|conn| document::replace(conn, collection, record))?;
        tracing::debug!(collection = %collection, id = ?document::key_of(record), "Updated record");
        Ok(())
    }

    /// Deleting a missing key is not an error.
    pub fn delete(&self, collection: Collection, id: i64) -> Result<()> {
        let removed = self.with_connection(|conn| document::delete(conn, collection, id))?;
        tracing::debug!(collection = %collection, id, removed, "Deleted record");
        Ok(())
    }

    pub fn clear(&self, collection: Collection) -> Result<()> {
        let removed = self.with_connection(|conn| document::clear(conn, collection))?;
        tracing::debug!(collection = %collection, removed, "Cleared collection");
        Ok(())
    }

    pub fn count(&self, collection: Collection) -> Result<usize> {
        self.with_connection(|conn| document::count(conn, collection))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
