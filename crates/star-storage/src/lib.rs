//! STAR Storage Layer
//!
//! Embedded record store for the business modules. Every collection is a
//! SQLite table of JSON documents keyed by an auto-incrementing integer,
//! with secondary indexes declared once in the schema registry.

mod backup;
mod collection;
mod database;
mod document;
mod error;
mod migrations;
mod record;
mod store;
mod transaction;

pub use backup::{Backup, ImportSummary};
pub use collection::{Collection, IndexSpec};
pub use database::Database;
pub use document::Document;
pub use error::StorageError;
pub use migrations::SCHEMA_VERSION;
pub use record::Record;
pub use store::{Store, StoreLocation};
pub use transaction::StoreTransaction;

pub type Result<T> = std::result::Result<T, StorageError>;
