//! External collaborators of the cart store.
//!
//! The store only ever reads from the product API: catalog records to build
//! new lines and stock levels to bound quantities. Both lookups are traits so
//! the store can run against the HTTP [`ApiClient`] or an in-process fake.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::services::{ApiClient, CatalogService, StockService};
//!
//! let client = ApiClient::new(&config)?;
//! let product = client.product(ProductId::new(1)).await?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod api;

pub use api::ApiClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when calling the product API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API has no record for this product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ServiceError {
    /// Whether the error means the product does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read-only lookup of a product's base attributes.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch a product by id.
    ///
    /// Fails with [`ServiceError::NotFound`] for an unknown id.
    async fn product(&self, id: ProductId) -> Result<Product, ServiceError>;
}

/// Read-only lookup of available stock.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the available quantity for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError>;
}
