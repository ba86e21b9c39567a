//! Catalog Store
//!
//! Holds the most recently loaded product page and the category /
//! subcategory lookup. Both are immutable `Arc` snapshots swapped whole
//! under a lock, so readers never see a half-applied load.
//!
//! Every page load is tagged with a [`PageRequest`]. When loads overlap and
//! complete out of order, only the most recently issued one is applied; the
//! others report [`PageLoad::Superseded`].

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use shared::pagination::total_pages;
use shared::{Product, ProductDraft, Subcategory, ValidationError};

use crate::api::{CatalogApi, ImageUpload};
use crate::client::http::{HttpClient, NetworkHttpClient};
use crate::config::{ClientConfig, DEFAULT_MAX_IMAGE_BYTES};
use crate::error::{CatalogResult, HttpError};
use crate::lookup::CatalogLookup;

/// Accepted image extensions
pub const SUPPORTED_IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Identity of one page load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Issue order; higher is newer
    pub seq: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Server-reported page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    /// Total items across all pages
    pub total: u64,
}

impl PageWindow {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            per_page,
            total,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(1, crate::config::DEFAULT_PAGE_SIZE, 0)
    }
}

/// One loaded page of products
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub window: PageWindow,
    /// Load that produced this snapshot; `None` before the first load
    pub request: Option<PageRequest>,
}

impl CatalogSnapshot {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Outcome of a page load that did not fail
#[derive(Debug, Clone)]
pub enum PageLoad {
    /// The response was current and now backs the store
    Applied(Arc<CatalogSnapshot>),
    /// A newer load was issued while this one was in flight
    Superseded {
        request: PageRequest,
        latest: PageRequest,
    },
}

impl PageLoad {
    pub fn snapshot(&self) -> Option<&Arc<CatalogSnapshot>> {
        match self {
            PageLoad::Applied(snapshot) => Some(snapshot),
            PageLoad::Superseded { .. } => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, PageLoad::Applied(_))
    }
}

/// Outcome of an auxiliary (category / subcategory) load
#[derive(Debug, Clone)]
pub enum AuxiliaryLoad {
    Applied(Arc<CatalogLookup>),
    Superseded,
}

impl AuxiliaryLoad {
    pub fn lookup(&self) -> Option<&Arc<CatalogLookup>> {
        match self {
            AuxiliaryLoad::Applied(lookup) => Some(lookup),
            AuxiliaryLoad::Superseded => None,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Arc<CatalogSnapshot>,
    lookup: Arc<CatalogLookup>,
    next_seq: u64,
    latest_page: Option<PageRequest>,
    latest_auxiliary: u64,
}

impl StoreState {
    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// In-memory mirror of the remote catalog
#[derive(Debug)]
pub struct CatalogStore<H = NetworkHttpClient> {
    api: CatalogApi<H>,
    state: RwLock<StoreState>,
    max_image_bytes: usize,
}

impl CatalogStore<NetworkHttpClient> {
    pub fn connect(config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self::new(CatalogApi::connect(config)?).with_max_image_bytes(config.max_image_bytes))
    }
}

impl<H: HttpClient> CatalogStore<H> {
    pub fn new(api: CatalogApi<H>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, bytes: usize) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    pub fn api(&self) -> &CatalogApi<H> {
        &self.api
    }

    /// Current product page
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.state.read().await.snapshot)
    }

    /// Current lookup tables
    pub async fn lookup(&self) -> Arc<CatalogLookup> {
        Arc::clone(&self.state.read().await.lookup)
    }

    /// Most recently issued page load, applied or not
    pub async fn latest_request(&self) -> Option<PageRequest> {
        self.state.read().await.latest_page
    }

    // ========== Reads ==========

    /// Load one page and make it the current snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self, page: u32, per_page: u32) -> CatalogResult<PageLoad> {
        let request = {
            let mut state = self.state.write().await;
            let request = PageRequest {
                seq: state.issue(),
                page: page.max(1),
                per_page: per_page.max(1),
            };
            state.latest_page = Some(request);
            request
        };
        tracing::debug!(
            seq = request.seq,
            page = request.page,
            per_page = request.per_page,
            "Loading products"
        );

        let result = self.api.list_products(request.page, request.per_page).await;

        let mut state = self.state.write().await;
        if let Some(latest) = state.latest_page.filter(|latest| *latest != request) {
            tracing::warn!(
                seq = request.seq,
                page = request.page,
                latest_seq = latest.seq,
                latest_page = latest.page,
                failed = result.is_err(),
                "Discarding superseded product page"
            );
            return Ok(PageLoad::Superseded { request, latest });
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    seq = request.seq,
                    page = request.page,
                    error = %e,
                    "Product load failed, keeping previous snapshot"
                );
                return Err(e.into());
            }
        };

        let snapshot = Arc::new(CatalogSnapshot {
            window: PageWindow::new(page.current_page, page.per_page, page.total),
            products: page.data,
            request: Some(request),
        });
        state.snapshot = Arc::clone(&snapshot);
        tracing::info!(
            seq = request.seq,
            page = snapshot.window.page,
            items = snapshot.len(),
            total = snapshot.window.total,
            "Product page applied"
        );
        Ok(PageLoad::Applied(snapshot))
    }

    /// Load every category and subcategory and replace the lookup tables.
    pub async fn load_auxiliary(&self) -> CatalogResult<AuxiliaryLoad> {
        let seq = {
            let mut state = self.state.write().await;
            let seq = state.issue();
            state.latest_auxiliary = seq;
            seq
        };
        tracing::debug!(seq, "Loading categories and subcategories");

        let result = tokio::try_join!(self.api.categories(), self.api.subcategories());

        let mut state = self.state.write().await;
        if state.latest_auxiliary != seq {
            tracing::warn!(
                seq,
                latest_seq = state.latest_auxiliary,
                "Discarding superseded lookup load"
            );
            return Ok(AuxiliaryLoad::Superseded);
        }

        let (categories, subcategories) = result.inspect_err(|e| {
            tracing::warn!(seq, error = %e, "Lookup load failed, keeping previous tables");
        })?;

        let lookup = Arc::new(CatalogLookup::new(categories, subcategories));
        state.lookup = Arc::clone(&lookup);
        tracing::info!(
            seq,
            categories = lookup.categories().len(),
            subcategories = lookup.subcategories().len(),
            "Lookup tables applied"
        );
        Ok(AuxiliaryLoad::Applied(lookup))
    }

    /// Single product (storefront detail page)
    pub async fn product(&self, id: i64) -> CatalogResult<Product> {
        Ok(self.api.product(id).await?)
    }

    /// Subcategories of one category, straight from the API
    pub async fn subcategories_of(&self, category_id: i64) -> CatalogResult<Vec<Subcategory>> {
        Ok(self.api.subcategories_of(category_id).await?)
    }

    /// Products of one subcategory, straight from the API
    pub async fn products_in(&self, subcategory_id: i64) -> CatalogResult<Vec<Product>> {
        Ok(self.api.products_in(subcategory_id).await?)
    }

    // ========== Writes ==========
    //
    // Writes never touch the snapshot. Callers reload to see the result.

    pub async fn create(&self, draft: &ProductDraft) -> CatalogResult<Product> {
        draft.check()?;
        let product = self.api.create_product(draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Product create rejected");
        })?;
        tracing::info!(id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, draft: &ProductDraft) -> CatalogResult<Product> {
        draft.check()?;
        let product = self.api.update_product(id, draft).await.inspect_err(|e| {
            tracing::warn!(id, error = %e, "Product update rejected");
        })?;
        tracing::info!(id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.api.delete_product(id).await.inspect_err(|e| {
            tracing::warn!(id, error = %e, "Product delete rejected");
        })?;
        tracing::info!(id, "Product deleted");
        Ok(())
    }

    /// Upload a product image and return its public URL.
    ///
    /// The extension and size are checked before anything is sent.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> CatalogResult<ImageUpload> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_IMAGE_FORMATS.contains(&extension.as_str()) {
            return Err(ValidationError::field("image", "unsupported_format").into());
        }
        if bytes.is_empty() {
            return Err(ValidationError::field("image", "empty").into());
        }
        if bytes.len() > self.max_image_bytes {
            return Err(ValidationError::field("image", "too_large").into());
        }

        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let size = bytes.len();
        let upload = self
            .api
            .upload_image(file_name, mime.essence_str(), bytes)
            .await
            .inspect_err(|e| {
                tracing::warn!(file = file_name, error = %e, "Image upload rejected");
            })?;
        tracing::info!(file = file_name, size, url = %upload.url, "Image uploaded");
        Ok(upload)
    }
}
