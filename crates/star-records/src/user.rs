//! Staff accounts
//!
//! Authentication is not implemented; `password` is stored as given and
//! never checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use star_storage::{Collection, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "cajero_billar")]
    BilliardsCashier,
    #[serde(rename = "barbero")]
    Barber,
    #[serde(rename = "lavador")]
    Washer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::BilliardsCashier => "cajero_billar",
            Role::Barber => "barbero",
            Role::Washer => "lavador",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "cajero_billar" => Ok(Role::BilliardsCashier),
            "barbero" => Ok(Role::Barber),
            "lavador" => Ok(Role::Washer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Unique across users
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "activo", default = "default_active")]
    pub active: bool,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(name: String, username: String, password: String, role: Role) -> Self {
        Self {
            id: None,
            name,
            username: username.trim().to_string(),
            password,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
