//! Typed records
//!
//! Every persisted domain type names its collection and exposes its
//! engine-assigned key. The engine underneath stays document-based.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::document::Document;
use crate::error::StorageError;
use crate::Result;

pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection this record type lives in.
    const COLLECTION: Collection;

    /// Primary key, `None` until the record has been stored.
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);
}

pub(crate) fn to_document<R: Record>(record: &R) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        _ => Err(StorageError::Format(format!(
            "{} records must serialize to a JSON object",
            R::COLLECTION
        ))),
    }
}

pub(crate) fn from_document<R: Record>(document: Document) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
