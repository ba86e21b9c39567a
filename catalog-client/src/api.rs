//! Typed endpoints of the remote catalog API
//!
//! One method per route. Each performs exactly one round trip and never
//! retries; read failures come back as [`FetchError`], write failures as
//! [`WriteError`].

use serde::Deserialize;
use std::sync::Arc;

use shared::{Category, Listing, Page, Product, ProductDraft, Subcategory};

use crate::client::http::{FilePart, HttpClient, NetworkHttpClient};
use crate::config::ClientConfig;
use crate::error::{FetchError, HttpError, WriteError, WriteOp};

/// Multipart field the upload route reads
pub const IMAGE_FIELD: &str = "image";

/// Response of `POST /products/upload-image`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageUpload {
    pub url: String,
}

/// Typed wrapper over an [`HttpClient`]
#[derive(Debug)]
pub struct CatalogApi<H = NetworkHttpClient> {
    http: Arc<H>,
}

impl<H> Clone for CatalogApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl CatalogApi<NetworkHttpClient> {
    /// Build a network-backed API from configuration
    pub fn connect(config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self::new(NetworkHttpClient::from_config(config)?))
    }
}

impl<H: HttpClient> CatalogApi<H> {
    pub fn new(http: H) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ========== Reads ==========

    /// `GET /products?page=P&per_page=N`
    pub async fn list_products(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Product>, FetchError> {
        let path = format!("products?page={}&per_page={}", page, per_page);
        let listing: Listing<Product> = self.read(&path).await?;
        Ok(listing.into_page())
    }

    /// `GET /products/{id}`
    pub async fn product(&self, id: i64) -> Result<Product, FetchError> {
        self.read(&format!("products/{}", id)).await
    }

    /// `GET /categories`
    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        self.read("categories").await
    }

    /// `GET /subcategories`
    pub async fn subcategories(&self) -> Result<Vec<Subcategory>, FetchError> {
        self.read("subcategories").await
    }

    /// `GET /categories/{id}/subcategories`
    pub async fn subcategories_of(&self, category_id: i64) -> Result<Vec<Subcategory>, FetchError> {
        self.read(&format!("categories/{}/subcategories", category_id)).await
    }

    /// `GET /subcategories/{id}/products`
    pub async fn products_in(&self, subcategory_id: i64) -> Result<Vec<Product>, FetchError> {
        let path = format!("subcategories/{}/products", subcategory_id);
        let listing: Listing<Product> = self.read(&path).await?;
        Ok(listing.into_page().data)
    }

    // ========== Writes ==========

    /// `POST /products`
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, WriteError> {
        self.http
            .post("products", draft)
            .await
            .map_err(|e| WriteError::from_http(WriteOp::Create, e))
    }

    /// `PUT /products/{id}`
    pub async fn update_product(
        &self,
        id: i64,
        draft: &ProductDraft,
    ) -> Result<Product, WriteError> {
        self.http
            .put(&format!("products/{}", id), draft)
            .await
            .map_err(|e| WriteError::from_http(WriteOp::Update, e))
    }

    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, id: i64) -> Result<(), WriteError> {
        self.http
            .delete(&format!("products/{}", id))
            .await
            .map_err(|e| WriteError::from_http(WriteOp::Delete, e))
    }

    /// `POST /products/upload-image` as multipart field `image`
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUpload, WriteError> {
        let file = FilePart {
            field: IMAGE_FIELD.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        };
        self.http
            .upload("products/upload-image", file)
            .await
            .map_err(|e| WriteError::from_http(WriteOp::Upload, e))
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.http
            .get(path)
            .await
            .map_err(|e| FetchError::from_http(path, e))
    }
}
