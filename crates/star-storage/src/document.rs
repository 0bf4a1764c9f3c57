//! Document-level operations on a single connection
//!
//! Rows hold the document body without its key; the `id` field is
//! spliced back in from the row's primary key on every read.

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::collection::{Collection, IndexSpec};
use crate::error::StorageError;
use crate::Result;

/// A stored record: a JSON object including its `id`.
pub type Document = serde_json::Map<String, Value>;

pub(crate) const KEY_FIELD: &str = "id";

pub(crate) fn key_of(document: &Document) -> Option<i64> {
    document.get(KEY_FIELD).and_then(Value::as_i64)
}

fn encode_body(document: &Document) -> Result<String> {
    let mut body = document.clone();
    body.remove(KEY_FIELD);
    Ok(serde_json::to_string(&body)?)
}

fn decode_row(collection: Collection, id: i64, body: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        StorageError::Format(format!("{} #{} holds invalid JSON: {}", collection, id, e))
    })?;

    match value {
        Value::Object(mut document) => {
            document.insert(KEY_FIELD.to_string(), Value::from(id));
            Ok(document)
        }
        _ => Err(StorageError::Format(format!(
            "{} #{} is not a JSON object",
            collection, id
        ))),
    }
}

/// JSON scalars map onto the SQL values `json_extract` yields for them.
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

pub(crate) fn insert(conn: &Connection, collection: Collection, document: &Document) -> Result<i64> {
    let body = encode_body(document)?;
    conn.execute(
        &format!("INSERT INTO {} (data) VALUES (?1)", collection.as_str()),
        [body],
    )
    .map_err(|e| StorageError::from_write(collection, e))?;

    Ok(conn.last_insert_rowid())
}

pub(crate) fn get(conn: &Connection, collection: Collection, id: i64) -> Result<Option<Document>> {
    let body: Option<String> = conn
        .query_row(
            &format!("SELECT data FROM {} WHERE id = ?1", collection.as_str()),
            [id],
            |row| row.get(0),
        )
        .optional()?;

    body.map(|body| decode_row(collection, id, &body))
        .transpose()
}

pub(crate) fn all(conn: &Connection, collection: Collection) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, data FROM {} ORDER BY id",
        collection.as_str()
    ))?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut documents = Vec::new();
    for row in rows {
        let (id, body) = row?;
        documents.push(decode_row(collection, id, &body)?);
    }
    Ok(documents)
}

pub(crate) fn find(
    conn: &Connection,
    collection: Collection,
    index: &IndexSpec,
    value: &Value,
) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, data FROM {} WHERE {} = ?1 ORDER BY id",
        collection.as_str(),
        index.expression()
    ))?;

    let rows = stmt.query_map([to_sql(value)], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut documents = Vec::new();
    for row in rows {
        let (id, body) = row?;
        documents.push(decode_row(collection, id, &body)?);
    }
    Ok(documents)
}

/// Full replace of an existing record; never inserts.
pub(crate) fn replace(conn: &Connection, collection: Collection, document: &Document) -> Result<()> {
    let id = key_of(document).ok_or(StorageError::MissingKey(collection))?;
    let body = encode_body(document)?;

    let changed = conn
        .execute(
            &format!("UPDATE {} SET data = ?1 WHERE id = ?2", collection.as_str()),
            rusqlite::params![body, id],
        )
        .map_err(|e| StorageError::from_write(collection, e))?;

    if changed == 0 {
        return Err(StorageError::NotFound { collection, id });
    }
    Ok(())
}

pub(crate) fn delete(conn: &Connection, collection: Collection, id: i64) -> Result<bool> {
    let removed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", collection.as_str()),
        [id],
    )?;
    Ok(removed > 0)
}

pub(crate) fn clear(conn: &Connection, collection: Collection) -> Result<usize> {
    Ok(conn.execute(&format!("DELETE FROM {}", collection.as_str()), [])?)
}

pub(crate) fn count(conn: &Connection, collection: Collection) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", collection.as_str()),
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
