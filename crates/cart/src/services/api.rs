//! HTTP client for the product and stock API.
//!
//! Talks to a JSON REST API exposing:
//! - `GET {base}/products/{id}` → `{ id, title, price, image }`
//! - `GET {base}/stock/{id}` → `{ id, amount }`
//!
//! Product records are cached with `moka`. Stock is never cached: every
//! quantity check reads the live value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogService, ServiceError, StockService};
use crate::config::CartConfig;

/// Maximum number of product records kept in the catalog cache.
const CATALOG_CACHE_CAPACITY: u64 = 1000;

/// Client for the product and stock API.
///
/// Cheaply cloneable; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Option<Cache<ProductId, Product>>,
}

impl ApiClient {
    /// Create a client from the cart configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CartConfig) -> Result<Self, ServiceError> {
        Self::with_options(
            config.api_url.clone(),
            config.http_timeout,
            config.catalog_cache_ttl,
        )
    }

    /// Create a client with explicit settings.
    ///
    /// A zero `cache_ttl` disables the catalog cache.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_options(
        base_url: Url,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let products = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CATALOG_CACHE_CAPACITY)
                .time_to_live(cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                products,
            }),
        })
    }

    /// Build the URL of a resource for a product.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, ServiceError> {
        self.inner
            .base_url
            .join(&format!("{resource}/{id}"))
            .map_err(|e| ServiceError::Parse(format!("invalid endpoint URL: {e}")))
    }

    /// GET a JSON resource for a product.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: ProductId,
    ) -> Result<T, ServiceError> {
        let url = self.endpoint(resource, id)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(id));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product API response"
            );
            ServiceError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Catalog cache hit");
            return Ok(product);
        }

        let product: Product = self.get_json("products", id).await?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}

#[async_trait]
impl StockService for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
        let stock: Stock = self.get_json("stock", id).await?;
        debug!(available = stock.available, "Fetched stock");
        Ok(stock)
    }
}
