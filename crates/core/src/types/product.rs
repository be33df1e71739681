//! Catalog and stock records returned by the product API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product's base attributes as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Absolute image URL.
    pub image: String,
}

/// Available quantity for a product.
///
/// The stock endpoint names the available quantity `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(rename = "amount")]
    pub available: u32,
}

impl Stock {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.available
    }
}
