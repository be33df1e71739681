//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart store behavior against in-process fakes and real storage backends
//! - `api_client` - HTTP client and full store wiring against a local product API
//!
//! This library holds the shared fixtures: an in-memory shop that serves as
//! both catalog and stock service, a notifier that records messages, and a
//! local HTTP server exposing the shop over the product API routes.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::{CatalogService, NotificationSink, ServiceError, StockService};
use rocketshoes_core::{Price, Product, ProductId, Stock};
use url::Url;

/// In-memory catalog and stock levels.
#[derive(Default)]
pub struct FakeShop {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    unavailable: AtomicBool,
}

impl FakeShop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with `available` units in stock.
    #[must_use]
    pub fn with_product(self, id: i32, title: &str, price: Price, available: u32) -> Self {
        let id = ProductId::new(id);
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Product {
                    id,
                    title: title.to_string(),
                    price,
                    image: format!("https://cdn.example.com/tenis{id}.jpg"),
                },
            );
        self.set_stock(id, available);
        self
    }

    pub fn set_stock(&self, id: ProductId, available: u32) {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, available);
    }

    pub fn rename(&self, id: ProductId, title: &str) {
        if let Some(product) = self
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            product.title = title.to_string();
        }
    }

    /// Make every lookup fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The error a lookup reports while the shop is down, matching what
    /// `ApiClient` returns for a 503.
    fn down() -> ServiceError {
        ServiceError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            message: "shop is down".to_string(),
        }
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    fn find_product(&self, id: ProductId) -> Option<Product> {
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn find_stock(&self, id: ProductId) -> Option<Stock> {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|&available| Stock {
                product_id: id,
                available,
            })
    }
}

#[async_trait]
impl CatalogService for FakeShop {
    async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        if self.is_unavailable() {
            return Err(Self::down());
        }
        self.find_product(id).ok_or(ServiceError::NotFound(id))
    }
}

#[async_trait]
impl StockService for FakeShop {
    async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
        if self.is_unavailable() {
            return Err(Self::down());
        }
        Ok(self.find_stock(id).unwrap_or(Stock {
            product_id: id,
            available: 0,
        }))
    }
}

/// Notifier that keeps every message it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

// =============================================================================
// Local product API
// =============================================================================

/// Serve `shop` over the product API routes on an ephemeral local port.
///
/// Returns the base URL (with trailing slash). The server runs until the
/// test's runtime shuts down. While the shop is unavailable every route
/// answers 503.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_api(shop: Arc<FakeShop>) -> std::io::Result<Url> {
    let app = Router::new()
        .route("/products/{id}", get(product_handler))
        .route("/stock/{id}", get(stock_handler))
        .with_state(shop);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Url::parse(&format!("http://{addr}/"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

async fn product_handler(State(shop): State<Arc<FakeShop>>, Path(id): Path<i32>) -> Response {
    if shop.is_unavailable() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    shop.find_product(ProductId::new(id)).map_or_else(
        || (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
        |product| Json(product).into_response(),
    )
}

async fn stock_handler(State(shop): State<Arc<FakeShop>>, Path(id): Path<i32>) -> Response {
    if shop.is_unavailable() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    shop.find_stock(ProductId::new(id)).map_or_else(
        || (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
        |stock| Json(stock).into_response(),
    )
}
