//! Data models
//!
//! Mirrors of the catalog API entities. All IDs are `i64`.

pub mod category;
pub mod product;

// Re-exports
pub use category::*;
pub use product::*;
