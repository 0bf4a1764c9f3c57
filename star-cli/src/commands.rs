//! Subcommand implementations

use anyhow::Context;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

use star_core::{Business, Collection};

pub async fn export(business: &Business, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            business
                .export_to_file(path)
                .await
                .with_context(|| format!("failed to export to {}", path.display()))?;
            println!("Backup written to {}", path.display());
        }
        None => {
            let blob = business.export_backup().await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(blob.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

pub async fn import(business: &Business, file: &Path) -> anyhow::Result<()> {
    let summary = business
        .import_from_file(file)
        .await
        .with_context(|| format!("failed to import {}", file.display()))?;

    for (collection, records) in &summary.restored {
        println!("{:<20} {:>6}", collection.as_str(), records);
    }
    println!("Restored {} records", summary.total());
    Ok(())
}

pub async fn seed(business: &Business) -> anyhow::Result<()> {
    let inserted = business.seed_catalog().await?;
    if inserted == 0 {
        println!("Catalog already has products; nothing seeded");
    } else {
        println!("Seeded {} products", inserted);
    }
    Ok(())
}

pub async fn summary(business: &Business, date: NaiveDate) -> anyhow::Result<()> {
    let summary = business.daily_summary(date).await?;

    println!("Summary for {}", summary.date);
    println!("  Appointments  {:>8}", summary.appointments);
    println!("  Sales         {:>8}", summary.sales);
    println!("  Vehicles      {:>8}", summary.vehicles);
    println!("  Revenue       {:>8.2}", summary.revenue);
    Ok(())
}

pub async fn list(business: &Business, collection: Collection) -> anyhow::Result<()> {
    let records = business.store().read_all_documents(collection).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_core::Config;

    fn business(dir: &Path) -> Business {
        let config = Config::default().with_database_path(dir.join("star.db"));
        Business::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_export_then_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");

        let source = business(dir.path());
        seed(&source).await.unwrap();
        export(&source, Some(&backup)).await.unwrap();

        let other = tempfile::tempdir().unwrap();
        let target = business(other.path());
        import(&target, &backup).await.unwrap();
        assert_eq!(
            target.store().count(Collection::Products).await.unwrap(),
            6
        );
    }

    #[tokio::test]
    async fn test_import_missing_file_names_it() {
        let dir = tempfile::tempdir().unwrap();
        let target = business(dir.path());

        let err = import(&target, &dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
