//! Main business state container
//!
//! Owns the store and hands out the per-area services, all sharing one
//! lazily opened database.

use chrono::NaiveDate;
use std::path::Path;

use star_storage::{ImportSummary, Store};

use crate::barbershop::Barbershop;
use crate::billiards::Billiards;
use crate::carwash::CarWash;
use crate::config::Config;
use crate::seeder;
use crate::summary::{self, DailySummary};
use crate::users::UserDirectory;
use crate::Result;

#[derive(Clone)]
pub struct Business {
    config: Config,
    store: Store,
    barbershop: Barbershop,
    billiards: Billiards,
    car_wash: CarWash,
    users: UserDirectory,
}

impl Business {
    /// Build the container. Nothing is opened until `initialize` or the
    /// first store operation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        // Ensure data directory exists
        if !config.in_memory {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let store = Store::new(config.store_location());

        Ok(Self {
            barbershop: Barbershop::new(store.clone()),
            billiards: Billiards::new(store.clone(), config.tax_rate),
            car_wash: CarWash::new(store.clone()),
            users: UserDirectory::new(store.clone()),
            config,
            store,
        })
    }

    /// Open the store and, if configured, seed an empty catalog.
    pub async fn initialize(&self) -> Result<()> {
        self.store.open().await?;

        if self.config.seed_catalog {
            seeder::seed_catalog(&self.store).await?;
        }

        tracing::info!(location = ?self.store.location(), "Business initialized");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn barbershop(&self) -> &Barbershop {
        &self.barbershop
    }

    pub fn billiards(&self) -> &Billiards {
        &self.billiards
    }

    pub fn car_wash(&self) -> &CarWash {
        &self.car_wash
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub async fn seed_catalog(&self) -> Result<usize> {
        seeder::seed_catalog(&self.store).await
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        summary::daily_summary(&self.store, date).await
    }

    // === Backup ===

    pub async fn export_backup(&self) -> Result<String> {
        Ok(self.store.export().await?)
    }

    pub async fn import_backup(&self, blob: &str) -> Result<ImportSummary> {
        Ok(self.store.import(blob).await?)
    }

    pub async fn export_to_file(&self, path: &Path) -> Result<()> {
        let blob = self.export_backup().await?;
        tokio::fs::write(path, blob).await?;

        tracing::info!(path = %path.display(), "Wrote backup");
        Ok(())
    }

    pub async fn import_from_file(&self, path: &Path) -> Result<ImportSummary> {
        let blob = tokio::fs::read_to_string(path).await?;
        self.import_backup(&blob).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_records::Product;
    use star_storage::Collection;

    #[tokio::test]
    async fn test_initialize_seeds_catalog() {
        let business = Business::new(Config::in_memory()).unwrap();
        assert!(!business.store().is_open());

        business.initialize().await.unwrap();
        assert!(business.store().is_open());
        assert_eq!(business.billiards().products().await.unwrap().len(), 6);

        // a second initialize does not seed again
        business.initialize().await.unwrap();
        assert_eq!(
            business.store().count(Collection::Products).await.unwrap(),
            6
        );
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let mut config = Config::in_memory();
        config.seed_catalog = false;
        let business = Business::new(config).unwrap();
        business.initialize().await.unwrap();

        assert!(business.billiards().products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backup_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backup_path = dir.path().join("backup.json");

        let source = Business::new(Config::in_memory()).unwrap();
        source.initialize().await.unwrap();
        source.export_to_file(&backup_path).await.unwrap();

        let mut config = Config::in_memory();
        config.seed_catalog = false;
        let target = Business::new(config).unwrap();
        target
            .billiards()
            .add_product(Product::new("Z9", "Tiza", "Accesorios", 5.0, 10.0, 3))
            .await
            .unwrap();

        let summary = target.import_from_file(&backup_path).await.unwrap();
        assert_eq!(summary.count(Collection::Products), Some(6));

        let codes: Vec<String> = target
            .billiards()
            .products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(codes.len(), 6);
        assert!(!codes.contains(&"Z9".to_string()));
    }

    #[tokio::test]
    async fn test_missing_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let business = Business::new(Config::in_memory()).unwrap();

        let err = business
            .import_from_file(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::CoreError::Io(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::in_memory();
        config.tax_rate = -0.1;
        assert!(Business::new(config).is_err());
    }
}
