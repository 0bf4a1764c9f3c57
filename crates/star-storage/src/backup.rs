//! Whole-store export and restore
//!
//! The backup format is one JSON object mapping collection names to
//! arrays of records. Keys are not carried over on restore: every record
//! is re-created and receives a fresh id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::database::Database;
use crate::document::{self, Document, KEY_FIELD};
use crate::error::StorageError;
use crate::Result;

/// Parsed backup. A `None` section was absent from the blob and is left
/// untouched on restore; `Some(vec![])` empties the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_vehicles: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<Document>>,
}

impl Backup {
    pub fn section(&self, collection: Collection) -> Option<&[Document]> {
        match collection {
            Collection::Appointments => self.appointments.as_deref(),
            Collection::Products => self.products.as_deref(),
            Collection::Vehicles => self.vehicles.as_deref(),
            Collection::CompletedVehicles => self.completed_vehicles.as_deref(),
            Collection::Sales => self.sales.as_deref(),
            Collection::Users => self.users.as_deref(),
        }
    }

    pub fn set_section(&mut self, collection: Collection, records: Vec<Document>) {
        let slot = match collection {
            Collection::Appointments => &mut self.appointments,
            Collection::Products => &mut self.products,
            Collection::Vehicles => &mut self.vehicles,
            Collection::CompletedVehicles => &mut self.completed_vehicles,
            Collection::Sales => &mut self.sales,
            Collection::Users => &mut self.users,
        };
        *slot = Some(records);
    }
}

/// Records restored per collection, in restore order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub restored: Vec<(Collection, usize)>,
}

impl ImportSummary {
    pub fn count(&self, collection: Collection) -> Option<usize> {
        self.restored
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.restored.iter().map(|(_, n)| n).sum()
    }
}

pub fn snapshot(db: &Database) -> Result<Backup> {
    let mut backup = Backup::default();
    for collection in Collection::ALL {
        backup.set_section(collection, db.read_all(collection)?);
    }
    Ok(backup)
}

pub fn export(db: &Database) -> Result<String> {
    let backup = snapshot(db)?;
    let json = serde_json::to_string_pretty(&backup)?;

    let records: usize = Collection::ALL
        .iter()
        .filter_map(|c| backup.section(*c))
        .map(<[Document]>::len)
        .sum();
    tracing::info!(records, bytes = json.len(), "Exported store");

    Ok(json)
}

/// Validate a blob without touching the store.
pub fn parse(blob: &str) -> Result<Backup> {
    let value: Value = serde_json::from_str(blob)
        .map_err(|e| StorageError::Format(format!("backup is not valid JSON: {}", e)))?;

    let Value::Object(sections) = &value else {
        return Err(StorageError::Format(
            "backup must be a JSON object keyed by collection name".to_string(),
        ));
    };

    for name in sections.keys() {
        if name.parse::<Collection>().is_err() {
            tracing::warn!(section = %name, "Ignoring unrecognized backup section");
        }
    }

    serde_json::from_value(value).map_err(|e| {
        StorageError::Format(format!(
            "every collection must be an array of JSON objects: {}",
            e
        ))
    })
}

/// Replace each collection present in the backup. A collection's clear
/// and refill commit together; a failure stops the restore, leaving the
/// failing collection as it was and any earlier ones already replaced.
pub fn restore(db: &Database, backup: &Backup) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for collection in Collection::ALL {
        let Some(records) = backup.section(collection) else {
            continue;
        };

        db.transaction(|tx| {
            document::clear(tx, collection)?;
            for record in records {
                let mut record = record.clone();
                record.remove(KEY_FIELD);
                document::insert(tx, collection, &record)?;
            }
            Ok(())
        })?;

        tracing::info!(collection = %collection, records = records.len(), "Restored collection");
        summary.restored.push((collection, records.len()));
    }

    Ok(summary)
}

pub fn import(db: &Database, blob: &str) -> Result<ImportSummary> {
    let backup = parse(blob)?;
    restore(db, &backup)
}
