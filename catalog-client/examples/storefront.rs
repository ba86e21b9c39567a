// catalog-client/examples/storefront.rs
// Print one filtered page of the catalog as a storefront grid

use anyhow::Context;
use catalog_client::{CatalogSession, ClientConfig, SortOrder, format_price};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: {} [query] [relevance|price_asc|price_desc] [page]", args[0]);
        println!("  Example: {} laptop price_asc 1", args[0]);
        return Ok(());
    }
    let query = args.get(1).cloned().unwrap_or_default();
    let sort: SortOrder = match args.get(2) {
        Some(s) => s.parse().map_err(anyhow::Error::msg)?,
        None => SortOrder::Relevance,
    };
    let page: u32 = match args.get(3) {
        Some(p) => p.parse().context("invalid page number")?,
        None => 1,
    };

    let config = ClientConfig::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        "Connecting to catalog"
    );

    let mut session = CatalogSession::connect(&config)?;
    if let Err(e) = session.open().await {
        tracing::error!("Failed to open catalog: {}", e);
        println!("{}", e.notice().message);
        return Err(e.into());
    }
    if page > 1 {
        session.go_to_page(page).await?;
    }

    let view = session.view_mut();
    view.set_query(query);
    view.set_sort(sort);

    let view = session.view();
    let window = view.window();
    println!("{}", view.summary());
    println!("Page {} of {}", window.page, window.total_pages());
    println!();

    for product in view.visible() {
        let placement = view
            .placement(product)
            .map(|(category, subcategory)| format!("{} / {}", category.name, subcategory.name))
            .unwrap_or_else(|| "Uncategorized".to_string());
        let badge = if product.available { "" } else { " [unavailable]" };
        println!(
            "{:>5}  {:<32} {:>12}  {:<16} {}{}",
            product.id,
            product.name,
            format_price(product.price),
            product.stock_status().to_string(),
            placement,
            badge
        );
    }

    Ok(())
}
