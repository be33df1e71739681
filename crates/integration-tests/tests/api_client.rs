//! Integration tests for the HTTP product API client.
//!
//! Each test serves an in-memory shop over a local axum server and talks to
//! it through `ApiClient`, exactly as the CLI does against the real API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rocketshoes_cart::{
    ApiClient, CartConfig, CartStore, CatalogService, FileStore, LogFormat, Price, ProductId,
    ServiceError, StockService, default_cart, messages,
};
use rocketshoes_integration_tests::{FakeShop, RecordingNotifier, spawn_api};

fn shop() -> Arc<FakeShop> {
    Arc::new(
        FakeShop::new()
            .with_product(1, "Tênis de Caminhada Leve Confortável", Price::from_parts(1799, 1), 3)
            .with_product(3, "Tênis Adidas Duramo Lite 2.0", Price::from_parts(2199, 1), 2),
    )
}

fn client(base: url::Url, cache_ttl: Duration) -> ApiClient {
    ApiClient::with_options(base, Duration::from_secs(5), cache_ttl).unwrap()
}

#[tokio::test]
async fn test_fetches_product_and_stock() {
    let shop = shop();
    let api = client(spawn_api(shop).await.unwrap(), Duration::ZERO);

    let product = api.product(ProductId::new(3)).await.unwrap();
    assert_eq!(product.id, ProductId::new(3));
    assert_eq!(product.title, "Tênis Adidas Duramo Lite 2.0");
    assert_eq!(product.price, Price::from_parts(2199, 1));

    let stock = api.stock(ProductId::new(3)).await.unwrap();
    assert_eq!(stock.product_id, ProductId::new(3));
    assert_eq!(stock.available, 2);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let api = client(spawn_api(shop()).await.unwrap(), Duration::ZERO);

    let err = api.product(ProductId::new(77)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == ProductId::new(77)));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let shop = shop();
    let api = client(spawn_api(shop.clone()).await.unwrap(), Duration::ZERO);
    shop.set_unavailable(true);

    let err = api.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 503, .. }));
}

#[tokio::test]
async fn test_catalog_is_cached_but_stock_is_not() {
    let shop = shop();
    let api = client(spawn_api(shop.clone()).await.unwrap(), Duration::from_secs(60));

    let first = api.product(ProductId::new(1)).await.unwrap();
    assert_eq!(api.stock(ProductId::new(1)).await.unwrap().available, 3);

    shop.rename(ProductId::new(1), "Renamed");
    shop.set_stock(ProductId::new(1), 9);

    let second = api.product(ProductId::new(1)).await.unwrap();
    assert_eq!(second.title, first.title);
    assert_eq!(api.stock(ProductId::new(1)).await.unwrap().available, 9);
}

#[tokio::test]
async fn test_uncached_client_sees_catalog_changes() {
    let shop = shop();
    let api = client(spawn_api(shop.clone()).await.unwrap(), Duration::ZERO);

    api.product(ProductId::new(1)).await.unwrap();
    shop.rename(ProductId::new(1), "Renamed");

    assert_eq!(api.product(ProductId::new(1)).await.unwrap().title, "Renamed");
}

#[tokio::test]
async fn test_store_from_config_against_local_api() {
    let shop = shop();
    let base = spawn_api(shop.clone()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = CartConfig {
        api_url: base,
        storage_dir: dir.path().to_path_buf(),
        storage_key: "cart".to_string(),
        http_timeout: Duration::from_secs(5),
        catalog_cache_ttl: Duration::from_secs(60),
        log_format: LogFormat::Pretty,
    };
    let notifier = Arc::new(RecordingNotifier::default());

    let store = CartStore::from_config(&config, notifier.clone()).await.unwrap();
    assert_eq!(store.cart(), default_cart());
    assert!(FileStore::new(dir.path()).path_for("cart").exists());

    let cart = store.add_product(ProductId::new(3)).await.unwrap();
    assert_eq!(cart.get(ProductId::new(3)).unwrap().amount, 1);

    // Product 1 has 2 units in the default cart and 3 in stock
    store.add_product(ProductId::new(1)).await.unwrap();
    assert!(store.add_product(ProductId::new(1)).await.is_err());
    assert!(store.add_product(ProductId::new(50)).await.is_err());

    assert_eq!(
        notifier.messages(),
        vec![messages::STOCK_EXCEEDED, messages::ADD_FAILED]
    );

    let reopened = CartStore::from_config(&config, notifier).await.unwrap();
    assert_eq!(reopened.cart(), store.cart());
}
