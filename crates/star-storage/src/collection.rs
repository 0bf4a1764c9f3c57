//! Schema registry
//!
//! The closed set of collections and the secondary indexes declared on
//! each. Index declarations are additive: a new index means a new schema
//! version, never an edit of an existing entry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Barbershop appointments
    Appointments,
    /// Billiards catalog items
    Products,
    /// Car-wash vehicles still in process
    Vehicles,
    /// Car-wash vehicles already delivered
    CompletedVehicles,
    /// Billiards sales
    Sales,
    /// Staff accounts
    Users,
}

/// A secondary index over one top-level field of a collection's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub unique: bool,
}

impl IndexSpec {
    const fn unique(field: &'static str) -> Self {
        Self {
            field,
            unique: true,
        }
    }

    const fn non_unique(field: &'static str) -> Self {
        Self {
            field,
            unique: false,
        }
    }

    /// SQLite index name, e.g. `idx_products_codigo`
    pub fn name(&self, collection: Collection) -> String {
        format!("idx_{}_{}", collection.as_str(), self.field)
    }

    /// The indexed expression. Lookups must use the exact same expression
    /// for SQLite to pick the index.
    pub(crate) fn expression(&self) -> String {
        format!("json_extract(data, '$.{}')", self.field)
    }
}

const APPOINTMENT_INDEXES: &[IndexSpec] = &[
    IndexSpec::non_unique("fecha"),
    IndexSpec::non_unique("cliente"),
    IndexSpec::non_unique("barbero"),
];

const PRODUCT_INDEXES: &[IndexSpec] = &[
    IndexSpec::unique("codigo"),
    IndexSpec::non_unique("categoria"),
    IndexSpec::non_unique("nombre"),
];

const VEHICLE_INDEXES: &[IndexSpec] = &[
    IndexSpec::non_unique("placa"),
    IndexSpec::non_unique("estado"),
];

const COMPLETED_VEHICLE_INDEXES: &[IndexSpec] = &[
    IndexSpec::non_unique("placa"),
    IndexSpec::non_unique("fecha"),
];

const SALE_INDEXES: &[IndexSpec] = &[
    IndexSpec::non_unique("fecha"),
    IndexSpec::non_unique("metodo_pago"),
];

const USER_INDEXES: &[IndexSpec] = &[
    IndexSpec::unique("usuario"),
    IndexSpec::non_unique("rol"),
];

impl Collection {
    /// Every collection, in declaration order. Backups follow this order.
    pub const ALL: [Collection; 6] = [
        Collection::Appointments,
        Collection::Products,
        Collection::Vehicles,
        Collection::CompletedVehicles,
        Collection::Sales,
        Collection::Users,
    ];

    /// Stored name, used both as the table name and as the backup key
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Appointments => "appointments",
            Collection::Products => "products",
            Collection::Vehicles => "vehicles",
            Collection::CompletedVehicles => "completed_vehicles",
            Collection::Sales => "sales",
            Collection::Users => "users",
        }
    }

    pub fn indexes(&self) -> &'static [IndexSpec] {
        match self {
            Collection::Appointments => APPOINTMENT_INDEXES,
            Collection::Products => PRODUCT_INDEXES,
            Collection::Vehicles => VEHICLE_INDEXES,
            Collection::CompletedVehicles => COMPLETED_VEHICLE_INDEXES,
            Collection::Sales => SALE_INDEXES,
            Collection::Users => USER_INDEXES,
        }
    }

    pub fn index(&self, field: &str) -> Option<&'static IndexSpec> {
        self.indexes().iter().find(|index| index.field == field)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == s)
            .ok_or_else(|| format!("Unknown collection: {}", s))
    }
}
