//! Admin session
//!
//! Pairs a [`CatalogStore`] with a [`CatalogView`]: loads land in the view
//! as soon as they are applied, and writes are followed by a reload of the
//! current page.

use shared::ProductDraft;

use crate::client::http::{HttpClient, NetworkHttpClient};
use crate::config::ClientConfig;
use crate::error::{CatalogResult, HttpError, WriteOp};
use crate::notice::Notice;
use crate::store::{AuxiliaryLoad, CatalogStore, PageLoad};
use crate::view::CatalogView;

#[derive(Debug)]
pub struct CatalogSession<H = NetworkHttpClient> {
    store: CatalogStore<H>,
    view: CatalogView,
    page_size: u32,
}

impl CatalogSession<NetworkHttpClient> {
    pub fn connect(config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self::new(CatalogStore::connect(config)?, config.page_size))
    }
}

impl<H: HttpClient> CatalogSession<H> {
    pub fn new(store: CatalogStore<H>, page_size: u32) -> Self {
        Self {
            store,
            view: CatalogView::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &CatalogStore<H> {
        &self.store
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// Predicate setters live on the view
    pub fn view_mut(&mut self) -> &mut CatalogView {
        &mut self.view
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Load lookup tables, then the first page
    pub async fn open(&mut self) -> CatalogResult<()> {
        self.reload_auxiliary().await?;
        self.go_to_page(1).await?;
        Ok(())
    }

    pub async fn reload_auxiliary(&mut self) -> CatalogResult<AuxiliaryLoad> {
        let load = self.store.load_auxiliary().await?;
        if let Some(lookup) = load.lookup() {
            self.view.replace_lookup(lookup.clone());
        }
        Ok(load)
    }

    pub async fn go_to_page(&mut self, page: u32) -> CatalogResult<PageLoad> {
        let load = self.store.load(page, self.page_size).await?;
        if let Some(snapshot) = load.snapshot() {
            self.view.replace_snapshot(snapshot.clone());
        }
        Ok(load)
    }

    /// Reload the page currently on screen
    pub async fn refresh(&mut self) -> CatalogResult<PageLoad> {
        let page = self.view.window().page;
        self.go_to_page(page).await
    }

    /// Change the page size and start over from page 1
    pub async fn change_page_size(&mut self, page_size: u32) -> CatalogResult<PageLoad> {
        self.page_size = page_size.max(1);
        self.go_to_page(1).await
    }

    /// Create (`id == None`) or update a product, then reload.
    ///
    /// A write that succeeded is never reported as an error; if only the
    /// reload fails the notice is downgraded to a warning.
    pub async fn save(&mut self, id: Option<i64>, draft: &ProductDraft) -> CatalogResult<Notice> {
        let op = match id {
            Some(id) => {
                self.store.update(id, draft).await?;
                WriteOp::Update
            }
            None => {
                self.store.create(draft).await?;
                WriteOp::Create
            }
        };
        Ok(self.after_write(op).await)
    }

    /// Delete a product, then reload.
    ///
    /// When the delete empties a page other than the first, the session
    /// steps back one page.
    pub async fn remove(&mut self, id: i64) -> CatalogResult<Notice> {
        self.store.delete(id).await?;
        let notice = self.after_write(WriteOp::Delete).await;

        let window = self.view.window();
        if self.view.snapshot().is_empty() && window.has_previous() {
            tracing::debug!(page = window.page, "Page emptied by delete, stepping back");
            if let Err(e) = self.go_to_page(window.page - 1).await {
                return Ok(reload_failed(WriteOp::Delete, &e));
            }
        }
        Ok(notice)
    }

    /// Upload an image and return the URL to put in a draft's `img`
    pub async fn attach_image(&self, file_name: &str, bytes: Vec<u8>) -> CatalogResult<String> {
        Ok(self.store.upload_image(file_name, bytes).await?.url)
    }

    async fn after_write(&mut self, op: WriteOp) -> Notice {
        match self.refresh().await {
            Ok(_) => Notice::written(op),
            Err(e) => reload_failed(op, &e),
        }
    }
}

fn reload_failed(op: WriteOp, err: &crate::error::CatalogError) -> Notice {
    tracing::warn!(op = op.as_str(), error = %err, "Reload after write failed");
    Notice::warning(format!(
        "{}, but the catalog could not be reloaded",
        Notice::written(op).message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogApi;
    use crate::error::CatalogError;
    use crate::filter::Availability;
    use crate::notice::NoticeLevel;
    use crate::test_support::{ScriptedHttp, product_json};
    use http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    fn session(http: ScriptedHttp) -> CatalogSession<ScriptedHttp> {
        CatalogSession::new(CatalogStore::new(CatalogApi::new(http)), 2)
    }

    fn page(products: Vec<Value>, page: u32, total: u64) -> Value {
        json!({ "data": products, "total": total, "current_page": page, "per_page": 2 })
    }

    fn script_catalog(http: &ScriptedHttp) {
        http.reply_json(
            "GET",
            "categories",
            json!([{ "id": 1, "name": "Computers" }, { "id": 2, "name": "Accessories" }]),
        );
        http.reply_json(
            "GET",
            "subcategories",
            json!([
                { "id": 10, "name": "Laptops", "category_id": 1 },
                { "id": 20, "name": "Mice", "category_id": 2 }
            ]),
        );
        http.reply_json(
            "GET",
            "products?page=1&per_page=2",
            page(
                vec![
                    product_json(1, "Laptop Pro", "1200.00", 1, 10),
                    product_json(2, "Mouse", "25.00", 0, 20),
                ],
                1,
                3,
            ),
        );
        http.reply_json(
            "GET",
            "products?page=2&per_page=2",
            page(vec![product_json(3, "Trackball", "60.00", 1, 20)], 2, 3),
        );
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Keyboard".into(),
            price: Some(Decimal::new(4550, 2)),
            subcategory_id: Some(20),
            available: true,
            ..ProductDraft::default()
        }
    }

    #[tokio::test]
    async fn test_open_fills_view() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        let mut session = session(http);

        session.open().await.unwrap();
        assert_eq!(session.view().visible_ids(), vec![1, 2]);
        assert_eq!(session.view().window().total_pages(), 2);

        session.view_mut().set_category(Some(2));
        assert_eq!(session.view().visible_ids(), vec![2]);
    }

    #[tokio::test]
    async fn test_paging_keeps_predicates() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        let mut session = session(http);
        session.open().await.unwrap();
        session.view_mut().set_availability(Availability::Only(true));

        session.go_to_page(2).await.unwrap();
        assert_eq!(session.view().window().page, 2);
        assert_eq!(session.view().visible_ids(), vec![3]);
    }

    #[tokio::test]
    async fn test_failed_page_leaves_view_alone() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_status("GET", "products?page=2&per_page=2", StatusCode::INTERNAL_SERVER_ERROR);
        let mut session = session(http);
        session.open().await.unwrap();

        let err = session.go_to_page(2).await.unwrap_err();
        assert_eq!(err.notice().message, "Could not load the catalog (HTTP 500)");
        assert_eq!(session.view().window().page, 1);
        assert_eq!(session.view().visible_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_save_creates_then_reloads() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json("POST", "products", product_json(4, "Keyboard", "45.50", 1, 20));
        let mut session = session(http.clone());
        session.open().await.unwrap();

        let notice = session.save(None, &draft()).await.unwrap();
        assert_eq!(notice, Notice::success("Product created"));

        let methods: Vec<_> = http
            .calls()
            .into_iter()
            .skip(3)
            .map(|c| (c.method, c.path))
            .collect();
        assert_eq!(
            methods,
            vec![
                ("POST", "products".to_string()),
                ("GET", "products?page=1&per_page=2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_updates_by_id() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json("PUT", "products/2", product_json(2, "Keyboard", "45.50", 1, 20));
        let mut session = session(http);
        session.open().await.unwrap();

        let notice = session.save(Some(2), &draft()).await.unwrap();
        assert_eq!(notice.message, "Product updated");
    }

    #[tokio::test]
    async fn test_rejected_save_is_error() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_status("POST", "products", StatusCode::UNPROCESSABLE_ENTITY);
        let mut session = session(http);
        session.open().await.unwrap();

        let err = session.save(None, &draft()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Write(_)));
        assert_eq!(err.notice().message, "Could not create the product (HTTP 422)");
    }

    #[tokio::test]
    async fn test_reload_failure_after_write_is_warning() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json("PUT", "products/1", product_json(1, "Laptop", "999.00", 1, 10));
        let mut session = session(http.clone());
        session.open().await.unwrap();

        http.reply_status("GET", "products?page=1&per_page=2", StatusCode::BAD_GATEWAY);
        let notice = session.save(Some(1), &draft()).await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Product updated, but the catalog could not be reloaded");
    }

    #[tokio::test]
    async fn test_remove_last_item_steps_back() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json("DELETE", "products/3", Value::Null);
        let mut session = session(http.clone());
        session.open().await.unwrap();
        session.go_to_page(2).await.unwrap();

        http.reply_json("GET", "products?page=2&per_page=2", page(Vec::new(), 2, 2));
        let notice = session.remove(3).await.unwrap();
        assert_eq!(notice, Notice::success("Product deleted"));
        assert_eq!(session.view().window().page, 1);
        assert_eq!(session.view().visible_ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_remove_on_first_page_stays() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json("DELETE", "products/1", Value::Null);
        let mut session = session(http.clone());
        session.open().await.unwrap();

        http.reply_json("GET", "products?page=1&per_page=2", page(Vec::new(), 1, 0));
        session.remove(1).await.unwrap();
        assert_eq!(session.view().window().page, 1);
        assert!(session.view().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_attach_image_returns_url() {
        let http = ScriptedHttp::new();
        http.reply_json(
            "POST",
            "products/upload-image",
            json!({ "url": "http://cdn.example/p/kb.png" }),
        );
        let session = session(http);

        let url = session.attach_image("kb.png", vec![137, 80, 78, 71]).await.unwrap();
        assert_eq!(url, "http://cdn.example/p/kb.png");
    }

    #[tokio::test]
    async fn test_change_page_size_restarts() {
        let http = ScriptedHttp::new();
        script_catalog(&http);
        http.reply_json(
            "GET",
            "products?page=1&per_page=5",
            json!({
                "data": [product_json(1, "Laptop Pro", "1200.00", 1, 10)],
                "total": 1, "current_page": 1, "per_page": 5
            }),
        );
        let mut session = session(http);
        session.open().await.unwrap();
        session.go_to_page(2).await.unwrap();

        session.change_page_size(5).await.unwrap();
        assert_eq!(session.page_size(), 5);
        assert_eq!(session.view().window(), crate::store::PageWindow::new(1, 5, 1));
    }
}
