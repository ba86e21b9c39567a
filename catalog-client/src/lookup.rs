//! Category / subcategory lookup tables
//!
//! Loaded once per `load_auxiliary` and shared as an immutable `Arc` until
//! the next load replaces it.

use std::collections::HashMap;

use shared::{Category, Product, Subcategory};

#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    category_index: HashMap<i64, usize>,
    subcategory_index: HashMap<i64, usize>,
}

impl CatalogLookup {
    pub fn new(categories: Vec<Category>, subcategories: Vec<Subcategory>) -> Self {
        let category_index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        let subcategory_index = subcategories
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        Self {
            categories,
            subcategories,
            category_index,
            subcategory_index,
        }
    }

    /// Categories in server order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Subcategories in server order
    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.category_index.get(&id).map(|&i| &self.categories[i])
    }

    pub fn subcategory(&self, id: i64) -> Option<&Subcategory> {
        self.subcategory_index.get(&id).map(|&i| &self.subcategories[i])
    }

    /// Owning category id of a product, via its subcategory
    pub fn category_id_of(&self, product: &Product) -> Option<i64> {
        self.subcategory(product.subcategory_id).map(|s| s.category_id)
    }

    /// Subcategories belonging to `category_id`, in server order
    pub fn subcategories_of(&self, category_id: i64) -> impl Iterator<Item = &Subcategory> {
        self.subcategories
            .iter()
            .filter(move |s| s.category_id == category_id)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.subcategories.is_empty()
    }
}
