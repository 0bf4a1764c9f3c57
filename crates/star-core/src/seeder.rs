//! Starter catalog for a fresh store

use star_records::Product;
use star_storage::{Collection, Store};

use crate::Result;

pub fn starter_catalog() -> Vec<Product> {
    vec![
        Product::new("P001", "Cerveza Nacional", "Bebidas", 50.0, 80.0, 48),
        Product::new("P002", "Refresco Cola", "Bebidas", 25.0, 45.0, 36),
        Product::new("P003", "Agua Mineral", "Bebidas", 15.0, 30.0, 60),
        Product::new("P004", "Papitas", "Snacks", 20.0, 40.0, 24),
        Product::new("P005", "Nachos", "Snacks", 35.0, 60.0, 18),
        Product::new("P006", "Hora de Billar", "Servicios", 0.0, 150.0, 999),
    ]
}

/// Insert the starter catalog if, and only if, the catalog is empty.
/// Returns how many products were inserted.
pub async fn seed_catalog(store: &Store) -> Result<usize> {
    if store.count(Collection::Products).await? != 0 {
        return Ok(0);
    }

    let catalog = starter_catalog();
    for product in &catalog {
        store.create(product).await?;
    }

    tracing::info!(products = catalog.len(), "Seeded starter catalog");
    Ok(catalog.len())
}
