//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use star_records::DEFAULT_TAX_RATE;
use star_storage::StoreLocation;

use crate::error::CoreError;
use crate::Result;

pub const DATABASE_PATH_ENV: &str = "STAR_DATABASE_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Keep everything in memory instead of `database_path`
    #[serde(default)]
    pub in_memory: bool,
    /// Tax applied to billiards sales, as a fraction
    pub tax_rate: f64,
    /// Insert the starter catalog when the catalog is empty
    pub seed_catalog: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("star_business.db"),
            in_memory: false,
            tax_rate: DEFAULT_TAX_RATE,
            seed_catalog: true,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            in_memory: true,
            ..Self::new(PathBuf::from("."))
        }
    }

    /// Defaults, with `STAR_DATABASE_PATH` overriding the database file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(DATABASE_PATH_ENV) {
            config.database_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self.in_memory = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(CoreError::Config(format!(
                "tax_rate must be in [0, 1), got {}",
                self.tax_rate
            )));
        }
        if !self.in_memory && self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path is empty".to_string()));
        }
        Ok(())
    }

    pub fn store_location(&self) -> StoreLocation {
        if self.in_memory {
            StoreLocation::InMemory
        } else {
            StoreLocation::File(self.database_path.clone())
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("STAR"))
            .unwrap_or_else(|| PathBuf::from(".star"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
