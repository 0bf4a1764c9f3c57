//! Typed record access inside one SQLite transaction
//!
//! Handed to the closure given to `Store::transaction`. Everything done
//! through it commits together, or not at all when the closure fails.

use rusqlite::Connection;

use crate::document;
use crate::error::StorageError;
use crate::record::{self, Record};
use crate::Result;

pub struct StoreTransaction<'a> {
    conn: &'a Connection,
}

impl<'a> StoreTransaction<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn read_by_id<R: Record>(&self, id: i64) -> Result<Option<R>> {
        document::get(self.conn, R::COLLECTION, id)?
            .map(record::from_document)
            .transpose()
    }

    /// Store a new record and hand it back carrying its key.
    pub fn insert<R: Record>(&self, mut record: R) -> Result<R> {
        let document = record::to_document(&record)?;
        let id = document::insert(self.conn, R::COLLECTION, &document)?;
        record.set_id(id);
        Ok(record)
    }

    pub fn update<R: Record>(&self, record: &R) -> Result<()> {
        if record.id().is_none() {
            return Err(StorageError::MissingKey(R::COLLECTION));
        }
        let document = record::to_document(record)?;
        document::replace(self.conn, R::COLLECTION, &document)
    }

    /// Returns whether a record was removed.
    pub fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        document::delete(self.conn, R::COLLECTION, id)
    }
}
