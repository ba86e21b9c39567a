//! Pagination types
//!
//! The catalog API pages server-side. `Page<T>` is the canonical form;
//! `Listing<T>` accepts either the paginated envelope or a bare array.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wire;

/// One server page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Total records across all pages
    #[serde(deserialize_with = "wire::count")]
    pub total: u64,
    /// Page number (1-based)
    #[serde(deserialize_with = "wire::count")]
    pub current_page: u32,
    /// Page size
    #[serde(deserialize_with = "wire::count")]
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, current_page: u32, per_page: u32) -> Self {
        Self {
            data,
            total,
            current_page,
            per_page,
        }
    }

    /// Wrap an unpaginated list as a single page
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        let per_page = u32::try_from(data.len()).unwrap_or(u32::MAX);
        Self {
            data,
            total,
            current_page: 1,
            per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.per_page)
    }
}

/// Number of pages needed for `total` items. Never less than one.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 || total == 0 {
        return 1;
    }
    u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
}

/// List response as the API actually sends it
#[derive(Debug, Clone)]
pub enum Listing<T> {
    Paged(Page<T>),
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    /// Normalize into a page. A bare array is a single page holding
    /// everything, with its own length as the total.
    pub fn into_page(self) -> Page<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Bare(data) => Page::single_page(data),
        }
    }
}

// Dispatched on shape by hand: an error inside `data` must surface as is.
impl<'de, T: DeserializeOwned> Deserialize<'de> for Listing<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let listing = if value.is_array() {
            Vec::<T>::deserialize(value).map(Listing::Bare)
        } else if value.get("data").is_some() {
            Page::<T>::deserialize(value).map(Listing::Paged)
        } else {
            return Err(de::Error::custom("expected an array or an object with `data`"));
        };
        listing.map_err(de::Error::custom)
    }
}
