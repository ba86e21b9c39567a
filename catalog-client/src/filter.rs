//! Filter / sort engine
//!
//! Pure function of (loaded page, lookup tables, predicate set) to the
//! ordered visible subset. Stages run in a fixed order, each on the previous
//! stage's output:
//!
//! 1. text query over name and description
//! 2. category, resolved through the subcategory lookup
//! 3. availability (tri-state)
//! 4. inclusive price range
//! 5. stable price sort, or none for relevance
//!
//! Only the currently loaded page is filtered; pagination stays server-side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use shared::Product;

use crate::lookup::CatalogLookup;

/// Availability predicate. `Only(false)` is a real filter, distinct from `Any`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Any,
    Only(bool),
}

impl Availability {
    pub fn matches(self, available: bool) -> bool {
        match self {
            Availability::Any => true,
            Availability::Only(wanted) => available == wanted,
        }
    }
}

impl From<Option<bool>> for Availability {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Availability::Any, Availability::Only)
    }
}

/// Inclusive price interval; a missing bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
}

impl PriceRange {
    /// Unbounded on both ends
    pub const FULL: PriceRange = PriceRange {
        low: None,
        high: None,
    };

    /// `[low, high]`; swapped bounds are put back in order
    pub fn between(low: Decimal, high: Decimal) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn at_least(low: Decimal) -> Self {
        Self {
            low: Some(low),
            high: None,
        }
    }

    pub fn at_most(high: Decimal) -> Self {
        Self {
            low: None,
            high: Some(high),
        }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.low.is_none_or(|low| price >= low) && self.high.is_none_or(|high| price <= high)
    }

    pub fn is_full(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the server order
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortOrder::Relevance),
            "price_asc" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The predicate set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or description
    #[serde(default)]
    pub query: String,
    /// Category id, matched through the product's subcategory
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub price: PriceRange,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ProductFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: Option<i64>) -> Self {
        self.category = category;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// True when every predicate is at its default
    pub fn is_cleared(&self) -> bool {
        *self == ProductFilter::default()
    }

    /// Whether `product` passes every active predicate (ordering aside)
    pub fn matches(&self, product: &Product, lookup: &CatalogLookup) -> bool {
        let needle = self.needle();
        matches_query(product, needle.as_deref())
            && self.matches_category(product, lookup)
            && self.availability.matches(product.available)
            && self.price.contains(product.price)
    }

    fn needle(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            None
        } else {
            Some(self.query.to_lowercase())
        }
    }

    fn matches_category(&self, product: &Product, lookup: &CatalogLookup) -> bool {
        match self.category {
            None => true,
            Some(wanted) => lookup.category_id_of(product) == Some(wanted),
        }
    }
}

fn matches_query(product: &Product, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => {
            product.name.to_lowercase().contains(needle)
                || product.description.to_lowercase().contains(needle)
        }
    }
}

/// Indices into `items` of the visible products, in display order
pub fn select(items: &[Product], lookup: &CatalogLookup, filter: &ProductFilter) -> Vec<usize> {
    let needle = filter.needle();

    let mut visible: Vec<usize> = (0..items.len())
        .filter(|&i| matches_query(&items[i], needle.as_deref()))
        .filter(|&i| filter.matches_category(&items[i], lookup))
        .filter(|&i| filter.availability.matches(items[i].available))
        .filter(|&i| filter.price.contains(items[i].price))
        .collect();

    // sort_by is stable: equal prices keep their relative order
    match filter.sort {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => visible.sort_by(|&a, &b| items[a].price.cmp(&items[b].price)),
        SortOrder::PriceDesc => visible.sort_by(|&a, &b| items[b].price.cmp(&items[a].price)),
    }
    visible
}

/// The visible products, borrowed from `items`, in display order
pub fn apply<'a>(
    items: &'a [Product],
    lookup: &CatalogLookup,
    filter: &ProductFilter,
) -> Vec<&'a Product> {
    select(items, lookup, filter)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}
