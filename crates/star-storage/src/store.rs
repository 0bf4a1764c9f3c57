//! Async store handle
//!
//! `Store` is cheap to clone and is handed to every service that needs
//! persistence. The underlying `Database` is opened lazily by the first
//! caller; concurrent callers wait on that same open instead of racing it.
//! Operations are admitted in FIFO order and executed off the async
//! executor, so they reach SQLite in the order they were issued.

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::backup::{self, ImportSummary};
use crate::collection::Collection;
use crate::database::Database;
use crate::document::Document;
use crate::error::StorageError;
use crate::record::{self, Record};
use crate::transaction::StoreTransaction;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    location: StoreLocation,
    db: OnceCell<Database>,
    /// Admission queue; tokio's mutex grants the lock in request order.
    queue: Mutex<()>,
}

impl Store {
    /// Create an unopened store. Nothing touches the disk until `open`.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                location,
                db: OnceCell::new(),
                queue: Mutex::new(()),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::InMemory)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.inner.location
    }

    pub fn is_open(&self) -> bool {
        self.inner.db.initialized()
    }

    /// Open the store, applying the schema on first use. Every call
    /// resolves to the same handle; a failed open is retried by the next
    /// caller.
    pub async fn open(&self) -> Result<Database> {
        let db = self
            .inner
            .db
            .get_or_try_init(|| async {
                let location = self.inner.location.clone();
                tokio::task::spawn_blocking(move || match location {
                    StoreLocation::File(path) => Database::open(path),
                    StoreLocation::InMemory => Database::open_in_memory(),
                })
                .await
                .map_err(StorageError::unavailable)?
            })
            .await?;

        Ok(db.clone())
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.open().await?;
        let _turn = self.inner.queue.lock().await;
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(task_failed)?
    }

    // === Typed operations ===

    /// Store a new record and return its key. The record's own `id`, if
    /// any, is ignored.
    pub async fn create<R: Record>(&self, record: &R) -> Result<i64> {
        let document = record::to_document(record)?;
        self.create_document(R::COLLECTION, document).await
    }

    /// Like `create`, but hands back the record carrying its new key.
    pub async fn insert<R: Record>(&self, mut record: R) -> Result<R> {
        let id = self.create(&record).await?;
        record.set_id(id);
        Ok(record)
    }

    pub async fn read_all<R: Record>(&self) -> Result<Vec<R>> {
        self.read_all_documents(R::COLLECTION)
            .await?
            .into_iter()
            .map(record::from_document)
            .collect()
    }

    pub async fn read_by_id<R: Record>(&self, id: i64) -> Result<Option<R>> {
        self.read_document(R::COLLECTION, id)
            .await?
            .map(record::from_document)
            .transpose()
    }

    pub async fn update<R: Record>(&self, record: &R) -> Result<()> {
        if record.id().is_none() {
            return Err(StorageError::MissingKey(R::COLLECTION));
        }
        let document = record::to_document(record)?;
        self.update_document(R::COLLECTION, document).await
    }

    pub async fn delete<R: Record>(&self, id: i64) -> Result<()> {
        self.delete_document(R::COLLECTION, id).await
    }

    pub async fn find_by_index<R: Record>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<R>> {
        self.find_documents(R::COLLECTION, field, value.into())
            .await?
            .into_iter()
            .map(record::from_document)
            .collect()
    }

    // === Document operations ===

    pub async fn create_document(&self, collection: Collection, document: Document) -> Result<i64> {
        self.run(move |db| db.create(collection, &document)).await
    }

    pub async fn read_all_documents(&self, collection: Collection) -> Result<Vec<Document>> {
        self.run(move |db| db.read_all(collection)).await
    }

    pub async fn read_document(&self, collection: Collection, id: i64) -> Result<Option<Document>> {
        self.run(move |db| db.read_by_id(collection, id)).await
    }

    pub async fn update_document(&self, collection: Collection, document: Document) -> Result<()> {
        self.run(move |db| db.update(collection, &document)).await
    }

    pub async fn delete_document(&self, collection: Collection, id: i64) -> Result<()> {
        self.run(move |db| db.delete(collection, id)).await
    }

    pub async fn find_documents(
        &self,
        collection: Collection,
        field: &str,
        value: Value,
    ) -> Result<Vec<Document>> {
        let field = field.to_string();
        self.run(move |db| db.find_by_index(collection, &field, &value))
            .await
    }

    pub async fn clear(&self, collection: Collection) -> Result<()> {
        self.run(move |db| db.clear(collection)).await
    }

    pub async fn count(&self, collection: Collection) -> Result<usize> {
        self.run(move |db| db.count(collection)).await
    }

    // === Backup ===

    /// Serialize every collection to one pretty-printed JSON document.
    pub async fn export(&self) -> Result<String> {
        self.run(backup::export).await
    }

    /// Replace the contents of every collection named in `blob`. The blob
    /// is validated in full before anything is cleared.
    pub async fn import(&self, blob: &str) -> Result<ImportSummary> {
        let blob = blob.to_string();
        let backup = tokio::task::spawn_blocking(move || backup::parse(&blob))
            .await
            .map_err(task_failed)??;
        self.run(move |db| backup::restore(db, &backup)).await
    }

    // === Transactions ===

    /// Run `op` as one queued operation inside a single SQLite
    /// transaction. Reads inside `op` see every earlier write, and no other
    /// store operation runs until it finishes. If `op` fails nothing it
    /// wrote is kept.
    pub async fn transaction<T, E, F>(&self, op: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&StoreTransaction<'_>) -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StorageError> + Send + 'static,
    {
        let db = self.open().await?;
        let _turn = self.inner.queue.lock().await;
        tokio::task::spawn_blocking(move || db.record_transaction(op))
            .await
            .map_err(task_failed)?
    }
}

fn task_failed(err: tokio::task::JoinError) -> StorageError {
    StorageError::StoreUnavailable(format!("storage task failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        codigo: String,
        stock: u32,
    }

    impl Record for Item {
        const COLLECTION: Collection = Collection::Products;

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    fn item(code: &str, stock: u32) -> Item {
        Item {
            id: None,
            codigo: code.to_string(),
            stock,
        }
    }

    #[tokio::test]
    async fn test_store_opens_lazily() {
        let store = Store::in_memory();
        assert!(!store.is_open());
        assert_eq!(store.count(Collection::Users).await.unwrap(), 0);
        assert!(store.is_open());
    }

    #[tokio::test]
    async fn test_concurrent_open_shares_one_handle() {
        let store = Store::in_memory();
        let store2 = store.clone();
        let (a, b) = tokio::join!(store.open(), store2.open());
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(a.same_store(&b));
        assert_eq!(a.collection_names().unwrap().len(), 6);
        assert_eq!(b.index_names().unwrap().len(), 14);

        let again = store.open().await.unwrap();
        assert!(again.same_store(&a));
        assert_eq!(again.index_names().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = Store::in_memory();
        let created = store.insert(item("P001", 48)).await.unwrap();
        let id = created.id.unwrap();

        let loaded: Item = store.read_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded, created);

        let mut changed = loaded.clone();
        changed.stock = 46;
        store.update(&changed).await.unwrap();
        let loaded: Item = store.read_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.stock, 46);

        store.delete::<Item>(id).await.unwrap();
        assert!(store.read_by_id::<Item>(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_without_key() {
        let store = Store::in_memory();
        let err = store.update(&item("P001", 1)).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingKey(Collection::Products)));
    }

    #[tokio::test]
    async fn test_update_unknown_key_creates_nothing() {
        let store = Store::in_memory();
        let mut ghost = item("P009", 1);
        ghost.id = Some(12);

        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 12, .. }));
        assert!(store.read_all::<Item>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_unique_index() {
        let store = Store::in_memory();
        store.create(&item("P001", 1)).await.unwrap();
        store.create(&item("P002", 2)).await.unwrap();

        let found: Vec<Item> = store.find_by_index("codigo", "P002").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stock, 2);
    }

    #[tokio::test]
    async fn test_transaction_commits_together() {
        let store = Store::in_memory();
        let id = store.create(&item("P001", 3)).await.unwrap();

        let moved = store
            .transaction(move |tx| -> Result<Item> {
                let mut stocked: Item = tx.read_by_id(id)?.ok_or(StorageError::NotFound {
                    collection: Collection::Products,
                    id,
                })?;
                stocked.stock -= 1;
                tx.update(&stocked)?;
                let copy = tx.insert(item("P002", 1))?;
                Ok(copy)
            })
            .await
            .unwrap();

        assert_eq!(moved.id, Some(id + 1));
        let stocked: Item = store.read_by_id(id).await.unwrap().unwrap();
        assert_eq!(stocked.stock, 2);
    }

    #[tokio::test]
    async fn test_failed_transaction_rolls_back() {
        let store = Store::in_memory();
        let id = store.create(&item("P001", 3)).await.unwrap();

        let err = store
            .transaction(move |tx| -> Result<()> {
                tx.insert(item("P002", 1))?;
                tx.delete::<Item>(id)?;
                Err(StorageError::Format("stop".to_string()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Format(_)));
        let items: Vec<Item> = store.read_all().await.unwrap();
        assert_eq!(items, vec![Item { id: Some(id), ..item("P001", 3) }]);
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_blob() {
        let store = Store::in_memory();
        store.create(&item("P001", 3)).await.unwrap();

        let err = store.import("[1, 2]").await.unwrap_err();
        assert!(matches!(err, StorageError::Format(_)));
        assert_eq!(store.count(Collection::Products).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_issue_order_is_preserved() {
        let store = Store::in_memory();
        store.open().await.unwrap();

        let first = item("P001", 1);
        let second = item("P002", 2);
        let (a, b, all, removed) = tokio::join!(
            store.create(&first),
            store.create(&second),
            store.read_all::<Item>(),
            store.delete::<Item>(1),
        );

        assert_eq!((a.unwrap(), b.unwrap()), (1, 2));
        assert_eq!(all.unwrap().len(), 2);
        removed.unwrap();
        assert_eq!(store.count(Collection::Products).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_open_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("not-yet");
        let store = Store::new(StoreLocation::File(missing_dir.join("star.db")));

        let err = store.open().await.err().unwrap();
        assert!(matches!(err, StorageError::StoreUnavailable(_)));
        assert!(!store.is_open());

        std::fs::create_dir_all(&missing_dir).unwrap();
        store.open().await.unwrap();
        assert!(store.is_open());
    }
}
