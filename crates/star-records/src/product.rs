//! Billiards catalog items

use serde::{Deserialize, Serialize};
use star_storage::{Collection, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Unique across the catalog
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "precio_compra", default)]
    pub cost_price: f64,
    #[serde(rename = "precio_venta")]
    pub sale_price: f64,
    pub stock: u32,
}

impl Product {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        cost_price: f64,
        sale_price: f64,
        stock: u32,
    ) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            category: category.into(),
            cost_price,
            sale_price,
            stock,
        }
    }

    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Take `quantity` units out of stock. Returns false, leaving stock
    /// unchanged, when there are not enough units.
    pub fn withdraw(&mut self, quantity: u32) -> bool {
        match self.stock.checked_sub(quantity) {
            Some(remaining) => {
                self.stock = remaining;
                true
            }
            None => false,
        }
    }
}

impl Record for Product {
    const COLLECTION: Collection = Collection::Products;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
