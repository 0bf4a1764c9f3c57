//! Billiards hall: catalog and point of sale

use chrono::NaiveDate;

use star_records::{PaymentMethod, Product, Sale, SaleLine};
use star_storage::Store;

use crate::clock;
use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: i64, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

#[derive(Clone)]
pub struct Billiards {
    store: Store,
    tax_rate: f64,
}

impl Billiards {
    pub fn new(store: Store, tax_rate: f64) -> Self {
        Self { store, tax_rate }
    }

    // === Catalog ===

    pub async fn add_product(&self, product: Product) -> Result<Product> {
        validate_product(&product)?;
        let product = self.store.insert(product).await?;

        tracing::info!(product_id = ?product.id, code = %product.code, "Added product");
        Ok(product)
    }

    pub async fn update_product(&self, product: &Product) -> Result<()> {
        validate_product(product)?;
        self.store.update(product).await?;
        Ok(())
    }

    pub async fn remove_product(&self, id: i64) -> Result<()> {
        self.store.delete::<Product>(id).await?;
        Ok(())
    }

    pub async fn product(&self, id: i64) -> Result<Product> {
        self.store
            .read_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { kind: "Product", id })
    }

    /// Catalog sorted by name
    pub async fn products(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.store.read_all().await?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    pub async fn product_by_code(&self, code: &str) -> Result<Option<Product>> {
        let mut found: Vec<Product> = self.store.find_by_index("codigo", code).await?;
        Ok(found.pop())
    }

    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>> {
        Ok(self.store.find_by_index("categoria", category).await?)
    }

    // === Sales ===

    /// Sell the cart. Stock is re-read, checked and decremented, and the
    /// sale recorded, in one store transaction: either all of it is
    /// written or none of it, and concurrent checkouts never sell the
    /// same unit twice.
    pub async fn checkout(&self, cart: &[CartLine], payment_method: PaymentMethod) -> Result<Sale> {
        let cart = merge_lines(cart)?;
        let tax_rate = self.tax_rate;
        let date = clock::today();
        let time = clock::current_time();

        let sale = self
            .store
            .transaction(move |tx| -> Result<Sale> {
                let mut lines = Vec::with_capacity(cart.len());
                let mut picked = Vec::with_capacity(cart.len());

                for line in &cart {
                    let mut product: Product =
                        tx.read_by_id(line.product_id)?.ok_or(CoreError::NotFound {
                            kind: "Product",
                            id: line.product_id,
                        })?;
                    let available = product.stock;
                    if !product.withdraw(line.quantity) {
                        return Err(CoreError::InsufficientStock {
                            code: product.code,
                            requested: line.quantity,
                            available,
                        });
                    }
                    lines.push(SaleLine::from_product(&product, line.product_id, line.quantity));
                    picked.push(product);
                }

                for product in &picked {
                    tx.update(product)?;
                }
                let sale = Sale::new(lines, payment_method, tax_rate, date, time);
                Ok(tx.insert(sale)?)
            })
            .await?;

        tracing::info!(
            sale_id = ?sale.id,
            items = sale.item_count(),
            total = sale.total,
            payment_method = %sale.payment_method,
            "Completed sale"
        );

        Ok(sale)
    }

    pub async fn sales(&self) -> Result<Vec<Sale>> {
        Ok(self.store.read_all().await?)
    }

    pub async fn sales_on(&self, date: NaiveDate) -> Result<Vec<Sale>> {
        Ok(self.store.find_by_index("fecha", date.to_string()).await?)
    }
}

fn validate_product(product: &Product) -> Result<()> {
    if product.code.trim().is_empty() {
        return Err(CoreError::InvalidInput("product code is required".to_string()));
    }
    if product.name.trim().is_empty() {
        return Err(CoreError::InvalidInput("product name is required".to_string()));
    }
    for (label, price) in [
        ("purchase price", product.cost_price),
        ("sale price", product.sale_price),
    ] {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "{} must be a non-negative amount",
                label
            )));
        }
    }
    Ok(())
}

/// Collapse repeated products into one line each, keeping first-seen order.
fn merge_lines(cart: &[CartLine]) -> Result<Vec<CartLine>> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let mut merged: Vec<CartLine> = Vec::with_capacity(cart.len());
    for line in cart {
        if line.quantity == 0 {
            return Err(CoreError::InvalidInput(format!(
                "quantity for product {} must be positive",
                line.product_id
            )));
        }
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    CoreError::InvalidInput("quantity out of range".to_string())
                })?;
            }
            None => merged.push(*line),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_records::DEFAULT_TAX_RATE;
    use star_storage::StorageError;

    fn billiards() -> Billiards {
        Billiards::new(Store::in_memory(), DEFAULT_TAX_RATE)
    }

    async fn beer(billiards: &Billiards) -> i64 {
        billiards
            .add_product(Product::new("P001", "Cerveza", "Bebidas", 50.0, 80.0, 48))
            .await
            .unwrap()
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_snapshots_and_decrements() {
        let billiards = billiards();
        let id = beer(&billiards).await;

        let sale = billiards
            .checkout(&[CartLine::new(id, 2)], PaymentMethod::Cash)
            .await
            .unwrap();
        assert_eq!(sale.subtotal, 160.0);
        assert_eq!(sale.tax, 28.8);
        assert_eq!(sale.total, 188.8);
        assert_eq!(sale.lines, vec![SaleLine::new(id, "Cerveza", 2, 80.0)]);
        assert_eq!(billiards.product(id).await.unwrap().stock, 46);

        // later price edits do not touch the sale
        let mut product = billiards.product(id).await.unwrap();
        product.sale_price = 95.0;
        billiards.update_product(&product).await.unwrap();
        let stored = billiards.sales().await.unwrap();
        assert_eq!(stored[0].lines[0].unit_price, 80.0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_writes_nothing() {
        let billiards = billiards();
        let beer_id = beer(&billiards).await;
        let nachos = billiards
            .add_product(Product::new("P005", "Nachos", "Snacks", 35.0, 60.0, 1))
            .await
            .unwrap();

        let err = billiards
            .checkout(
                &[
                    CartLine::new(beer_id, 1),
                    CartLine::new(nachos.id.unwrap(), 1),
                    CartLine::new(nachos.id.unwrap(), 1),
                ],
                PaymentMethod::Card,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock { requested: 2, available: 1, .. }
        ));
        assert_eq!(billiards.product(beer_id).await.unwrap().stock, 48);
        assert!(billiards.sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_sell_last_unit_once() {
        let billiards = billiards();
        let id = billiards
            .add_product(Product::new("P006", "Hora de Billar", "Servicios", 0.0, 150.0, 1))
            .await
            .unwrap()
            .id
            .unwrap();
        let counter = billiards.clone();

        let cart = [CartLine::new(id, 1)];
        let (first, second) = tokio::join!(
            billiards.checkout(&cart, PaymentMethod::Cash),
            counter.checkout(&cart, PaymentMethod::Card),
        );

        let sold = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(sold, 1);
        let refused = if first.is_ok() { second } else { first };
        assert!(matches!(
            refused,
            Err(CoreError::InsufficientStock { requested: 1, available: 0, .. })
        ));
        assert_eq!(billiards.product(id).await.unwrap().stock, 0);
        assert_eq!(billiards.sales().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_and_missing_product() {
        let billiards = billiards();
        assert!(matches!(
            billiards.checkout(&[], PaymentMethod::Cash).await,
            Err(CoreError::EmptyCart)
        ));
        assert!(matches!(
            billiards
                .checkout(&[CartLine::new(404, 1)], PaymentMethod::Cash)
                .await,
            Err(CoreError::NotFound { id: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let billiards = billiards();
        beer(&billiards).await;

        let err = billiards
            .add_product(Product::new("P001", "Otra", "Bebidas", 1.0, 2.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::ConstraintViolation { .. })
        ));
        assert_eq!(billiards.products().await.unwrap().len(), 1);
        assert!(billiards.product_by_code("P001").await.unwrap().is_some());
        assert!(billiards.product_by_code("P999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_negative_price_is_invalid() {
        let billiards = billiards();
        let err = billiards
            .add_product(Product::new("P010", "Tiza", "Accesorios", -1.0, 10.0, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_sales_on_today() {
        let billiards = billiards();
        let id = beer(&billiards).await;
        billiards
            .checkout(&[CartLine::new(id, 1)], PaymentMethod::Transfer)
            .await
            .unwrap();

        assert_eq!(billiards.sales_on(clock::today()).await.unwrap().len(), 1);
        let yesterday = clock::today().pred_opt().unwrap();
        assert!(billiards.sales_on(yesterday).await.unwrap().is_empty());
    }
}
