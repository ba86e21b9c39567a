// catalog-client/src/client/http.rs
// HTTP transport for the catalog API

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::ClientConfig;
use crate::error::HttpError;

pub type HttpResult<T> = Result<T, HttpError>;

/// File attached to a multipart upload
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name (the catalog API expects `image`)
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// HTTP client trait
///
/// Paths are relative to the configured API root, without a leading slash
/// (e.g. `products?page=1&per_page=10`).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> HttpResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T>;
    async fn put<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T>;
    /// DELETE; any 2xx counts as success and the body is ignored
    async fn delete(&self, path: &str) -> HttpResult<()>;
    async fn upload<T: DeserializeOwned>(&self, path: &str, file: FilePart) -> HttpResult<T>;
}

/// Network HTTP client backed by reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> HttpResult<Vec<u8>> {
        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request rejected");
            return Err(HttpError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> HttpResult<T> {
        let body = self.send(req).await?;
        serde_json::from_slice(&body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> HttpResult<T> {
        tracing::debug!(%path, "GET");
        self.send_json(self.request(reqwest::Method::GET, path)).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T> {
        tracing::debug!(%path, "POST");
        self.send_json(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + std::marker::Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T> {
        tracing::debug!(%path, "PUT");
        self.send_json(self.request(reqwest::Method::PUT, path).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> HttpResult<()> {
        tracing::debug!(%path, "DELETE");
        self.send(self.request(reqwest::Method::DELETE, path)).await?;
        Ok(())
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, file: FilePart) -> HttpResult<T> {
        tracing::debug!(%path, file = %file.file_name, size = file.bytes.len(), "POST multipart");
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part(file.field, part);
        self.send_json(self.request(reqwest::Method::POST, path).multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = NetworkHttpClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/products/3"), "http://localhost:8000/api/products/3");
        assert_eq!(client.url("categories"), "http://localhost:8000/api/categories");
    }
}
