//! View state
//!
//! `CatalogView` owns the predicate set and page window of one screen and
//! keeps the visible list in sync: every setter re-runs the filter engine
//! before returning.

use std::sync::Arc;

use shared::{Category, Product, Subcategory};

use crate::filter::{self, Availability, PriceRange, ProductFilter, SortOrder};
use crate::lookup::CatalogLookup;
use crate::store::{CatalogSnapshot, PageWindow};

/// "Showing X of Y" counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    /// Visible after filtering
    pub shown: usize,
    /// On the loaded page
    pub loaded: usize,
    /// Reported by the server across all pages
    pub total: u64,
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {} of {} products ({} in catalog)",
            self.shown, self.loaded, self.total
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    filter: ProductFilter,
    snapshot: Arc<CatalogSnapshot>,
    lookup: Arc<CatalogLookup>,
    visible: Vec<usize>,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn window(&self) -> PageWindow {
        self.snapshot.window
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    pub fn lookup(&self) -> &Arc<CatalogLookup> {
        &self.lookup
    }

    // ========== Predicates ==========

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.recompute();
    }

    pub fn set_category(&mut self, category: Option<i64>) {
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_availability(&mut self, availability: Availability) {
        self.filter.availability = availability;
        self.recompute();
    }

    pub fn set_price_range(&mut self, price: PriceRange) {
        self.filter.price = price;
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filter.sort = sort;
        self.recompute();
    }

    /// Replace the whole predicate set at once
    pub fn set_filter(&mut self, filter: ProductFilter) {
        self.filter = filter;
        self.recompute();
    }

    /// Back to the defaults: everything on the loaded page is visible again
    pub fn clear_filters(&mut self) {
        self.filter = ProductFilter::default();
        self.recompute();
    }

    // ========== Data ==========

    pub fn replace_snapshot(&mut self, snapshot: Arc<CatalogSnapshot>) {
        self.snapshot = snapshot;
        self.recompute();
    }

    pub fn replace_lookup(&mut self, lookup: Arc<CatalogLookup>) {
        self.lookup = lookup;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = filter::select(&self.snapshot.products, &self.lookup, &self.filter);
    }

    // ========== Output ==========

    /// Visible products in display order
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &Product> {
        self.visible.iter().map(|&i| &self.snapshot.products[i])
    }

    pub fn visible_ids(&self) -> Vec<i64> {
        self.visible().map(|p| p.id).collect()
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            shown: self.visible.len(),
            loaded: self.snapshot.len(),
            total: self.snapshot.window.total,
        }
    }

    /// Category and subcategory a product sits under, when resolvable
    pub fn placement(&self, product: &Product) -> Option<(&Category, &Subcategory)> {
        let subcategory = self.lookup.subcategory(product.subcategory_id)?;
        let category = self.lookup.category(subcategory.category_id)?;
        Some((category, subcategory))
    }

    /// Subcategory choices for a category picker (product form cascade)
    pub fn subcategory_choices(&self, category_id: i64) -> Vec<&Subcategory> {
        self.lookup.subcategories_of(category_id).collect()
    }
}
