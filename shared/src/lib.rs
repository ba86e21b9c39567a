//! Shared types for the catalog workspace
//!
//! Catalog entities, wire normalization, pagination and display helpers
//! used by the client crate and by anything rendering its output.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;
pub mod wire;

// Re-exports
pub use error::{FieldViolation, ValidationError};
pub use models::{Category, Product, ProductDraft, StockStatus, Subcategory};
pub use pagination::{Listing, Page};
pub use util::format_price;
