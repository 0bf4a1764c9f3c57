//! Billiards sales
//!
//! A sale is a snapshot: line items carry the product name and unit
//! price as they were at checkout, so later catalog edits (or key
//! renumbering after a restore) do not change what was sold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use star_storage::{Collection, Record};

use crate::product::Product;

pub const DEFAULT_TAX_RATE: f64 = 0.18;

/// Round a monetary amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "efectivo")]
    Cash,
    #[serde(rename = "tarjeta")]
    Card,
    #[serde(rename = "transferencia")]
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "efectivo",
            PaymentMethod::Card => "tarjeta",
            PaymentMethod::Transfer => "transferencia",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "efectivo" => Ok(PaymentMethod::Cash),
            "tarjeta" => Ok(PaymentMethod::Card),
            "transferencia" => Ok(PaymentMethod::Transfer),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product key at the time of sale
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio")]
    pub unit_price: f64,
}

impl SaleLine {
    pub fn new(id: i64, name: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Snapshot a stored product at its current sale price.
    pub fn from_product(product: &Product, product_id: i64, quantity: u32) -> Self {
        Self::new(product_id, product.name.clone(), quantity, product.sale_price)
    }

    pub fn amount(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "productos")]
    pub lines: Vec<SaleLine>,
    pub subtotal: f64,
    #[serde(rename = "impuesto")]
    pub tax: f64,
    pub total: f64,
    #[serde(rename = "metodo_pago")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// `HH:MM`
    #[serde(rename = "hora")]
    pub time: String,
}

impl Sale {
    /// Build a sale, computing subtotal, tax and total from the lines.
    pub fn new(
        lines: Vec<SaleLine>,
        payment_method: PaymentMethod,
        tax_rate: f64,
        date: NaiveDate,
        time: String,
    ) -> Self {
        let subtotal = round_cents(lines.iter().map(SaleLine::amount).sum());
        let tax = round_cents(subtotal * tax_rate);
        let total = round_cents(subtotal + tax);

        Self {
            id: None,
            lines,
            subtotal,
            tax,
            total,
            payment_method,
            date,
            time,
        }
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

impl Record for Sale {
    const COLLECTION: Collection = Collection::Sales;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_totals_with_default_tax() {
        let sale = Sale::new(
            vec![SaleLine::new(1, "Cerveza", 2, 80.0)],
            PaymentMethod::Cash,
            DEFAULT_TAX_RATE,
            date(),
            "21:15".to_string(),
        );
        assert_eq!(sale.subtotal, 160.0);
        assert_eq!(sale.tax, 28.8);
        assert_eq!(sale.total, 188.8);
        assert_eq!(sale.item_count(), 2);
    }

    #[test]
    fn test_totals_over_several_lines() {
        let sale = Sale::new(
            vec![
                SaleLine::new(3, "Agua Mineral", 3, 30.0),
                SaleLine::new(5, "Nachos", 1, 60.0),
                SaleLine::new(6, "Hora de Billar", 2, 150.0),
            ],
            PaymentMethod::Card,
            DEFAULT_TAX_RATE,
            date(),
            "22:00".to_string(),
        );
        assert_eq!(sale.subtotal, 450.0);
        assert_eq!(sale.tax, 81.0);
        assert_eq!(sale.total, 531.0);
    }

    #[test]
    fn test_wire_field_names() {
        let sale = Sale::new(
            vec![SaleLine::new(1, "Cerveza", 1, 80.0)],
            PaymentMethod::Transfer,
            DEFAULT_TAX_RATE,
            date(),
            "09:00".to_string(),
        );
        let value = serde_json::to_value(&sale).unwrap();
        assert_eq!(value["metodo_pago"], "transferencia");
        assert_eq!(value["productos"][0]["cantidad"], 1);
        assert_eq!(value["productos"][0]["precio"], 80.0);
        assert_eq!(value["impuesto"], 14.4);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(28.799999999999997), 28.8);
        assert_eq!(round_cents(12.344), 12.34);
    }
}
