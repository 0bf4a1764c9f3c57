//! Storage error types

use thiserror::Error;

use crate::collection::Collection;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Constraint violation: {collection}.{field} must be unique")]
    ConstraintViolation { collection: Collection, field: String },

    #[error("Record not found: {collection} #{id}")]
    NotFound { collection: Collection, id: i64 },

    #[error("Record in {0} carries no primary key")]
    MissingKey(Collection),

    #[error("No index declared on {collection}.{field}")]
    UnknownIndex { collection: Collection, field: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        StorageError::StoreUnavailable(err.to_string())
    }

    /// Translate a failed write into a constraint violation when SQLite
    /// rejected it through one of the collection's unique indexes.
    pub(crate) fn from_write(collection: Collection, err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                let unique = collection.indexes().iter().filter(|index| index.unique);
                let field = message
                    .as_deref()
                    .and_then(|msg| {
                        unique
                            .clone()
                            .find(|index| msg.contains(&index.name(collection)))
                    })
                    .or_else(|| unique.clone().next())
                    .map(|index| index.field.to_string())
                    .unwrap_or_default();

                return StorageError::ConstraintViolation { collection, field };
            }
        }
        StorageError::Database(err)
    }
}
