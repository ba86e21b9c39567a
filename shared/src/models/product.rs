//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Subcategory;
use crate::error::ValidationError;
use crate::wire;

/// Stock below this count is flagged as running low
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// Product entity, normalized at ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "wire::nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "wire::price")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "wire::count")]
    pub stock: u32,
    #[serde(default, deserialize_with = "wire::availability")]
    pub available: bool,
    /// Image URL
    #[serde(default)]
    pub img: Option<String>,
    /// Subcategory reference (required)
    pub subcategory_id: i64,
    /// Hydrated subcategory, when the API includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

/// Inventory badge shown next to a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stock", rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low(u32),
    InStock(u32),
}

impl StockStatus {
    pub fn from_stock(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockStatus::Low(n),
            n => StockStatus::InStock(n),
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of stock"),
            StockStatus::Low(n) | StockStatus::InStock(n) => write!(f, "{} in stock", n),
        }
    }
}

/// Create/update product payload
///
/// The same body is used for `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(required, custom(function = "non_negative"))]
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[validate(required, range(min = 1))]
    pub subcategory_id: Option<i64>,
}

impl ProductDraft {
    /// Check required fields before anything goes over the wire.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(ValidationError::from)
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: Some(product.price),
            stock: product.stock,
            available: product.available,
            img: product.img.clone(),
            subcategory_id: Some(product.subcategory_id),
        }
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(validator::ValidationError::new("negative"));
    }
    Ok(())
}
