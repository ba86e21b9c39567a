//! Catalog Client - data layer for the catalog admin and storefront
//!
//! Talks to the remote catalog API over HTTP/JSON, mirrors one product page
//! plus the category tables in memory, and derives the filtered, sorted
//! list a screen shows.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod notice;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;

pub use api::{CatalogApi, ImageUpload};
pub use client::{HttpClient, NetworkHttpClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{CatalogError, CatalogResult, FetchError, HttpError, WriteError, WriteOp};
pub use filter::{Availability, PriceRange, ProductFilter, SortOrder};
pub use lookup::CatalogLookup;
pub use notice::{Notice, NoticeLevel};
pub use session::CatalogSession;
pub use store::{AuxiliaryLoad, CatalogSnapshot, CatalogStore, PageLoad, PageRequest, PageWindow};
pub use view::{CatalogView, ResultSummary};

// Re-export shared types for convenience
pub use shared::{
    Category, Listing, Page, Product, ProductDraft, StockStatus, Subcategory, ValidationError,
    format_price,
};
