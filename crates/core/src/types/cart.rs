//! Cart and line item types.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s kept in insertion order.
//! The cart enforces two invariants on every way in (construction, JSON
//! decoding, and mutation):
//!
//! - every line has `amount >= 1`
//! - no two lines share a product id
//!
//! The JSON form is a bare array of line items, which is also the blob the
//! cart store persists.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors that can occur when building or decoding a [`Cart`].
#[derive(thiserror::Error, Debug)]
pub enum CartDataError {
    /// A line item has a zero amount.
    #[error("line item {product_id} must have an amount of at least 1")]
    ZeroAmount {
        /// Product of the offending line.
        product_id: ProductId,
    },
    /// Two line items share the same product id.
    #[error("product {0} appears more than once in the cart")]
    DuplicateProduct(ProductId),
    /// The serialized cart is not valid JSON for a list of line items.
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One product entry in the cart with its selected quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub amount: u32,
}

impl LineItem {
    /// Build a line item from a catalog record.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Price of the whole line (`price * amount`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// The user's current selection of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, validating the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if any line has a zero amount or if a product id
    /// appears more than once.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartDataError> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }

    /// Decode a cart from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates the cart
    /// invariants.
    pub fn from_json(json: &str) -> Result<Self, CartDataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the cart to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart has a line for this product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Append a new line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line has a zero amount or the product is
    /// already in the cart.
    pub fn push(&mut self, item: LineItem) -> Result<(), CartDataError> {
        if item.amount == 0 {
            return Err(CartDataError::ZeroAmount {
                product_id: item.id,
            });
        }
        if self.contains(item.id) {
            return Err(CartDataError::DuplicateProduct(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Set the amount of an existing line.
    ///
    /// Returns `Ok(false)` if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is zero.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<bool, CartDataError> {
        if amount == 0 {
            return Err(CartDataError::ZeroAmount { product_id: id });
        }
        Ok(self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| item.amount = amount)
            .is_some())
    }

    /// Remove the line for a product, preserving the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartDataError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
