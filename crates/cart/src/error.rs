//! Unified error handling for cart operations.
//!
//! Every cart mutation returns `Result<Cart, CartError>`. Before an error is
//! returned the store has already logged it and pushed the matching
//! user-facing message to the notification sink, so callers may ignore the
//! error entirely; the cart is never left half-updated.

use rocketshoes_core::{CartDataError, ProductId};
use thiserror::Error;

use crate::notify::messages;
use crate::services::ServiceError;
use crate::storage::StorageError;

/// A cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    /// Message reported when this operation fails for a reason other than stock.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => messages::ADD_FAILED,
            Self::Remove => messages::REMOVE_FAILED,
            Self::Update => messages::UPDATE_FAILED,
        }
    }
}

/// Error type for cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("Stock exceeded for product {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Catalog lookup failed (including unknown products).
    #[error("Catalog error: {0}")]
    Catalog(#[source] ServiceError),

    /// Stock lookup failed.
    #[error("Stock error: {0}")]
    Stock(#[source] ServiceError),

    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persisted cart, or a computed one, violates the cart invariants.
    #[error("Invalid cart: {0}")]
    InvalidCart(#[from] CartDataError),
}

impl CartError {
    /// User-facing message for this error raised by `operation`.
    #[must_use]
    pub const fn notification(&self, operation: Operation) -> &'static str {
        match self {
            Self::StockExceeded { .. } => messages::STOCK_EXCEEDED,
            _ => operation.failure_message(),
        }
    }

    /// Whether the error is an expected business-rule or caller rejection
    /// rather than an infrastructure failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::StockExceeded { .. } | Self::NotInCart(_) => true,
            Self::Catalog(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::NotInCart(ProductId::new(3));
        assert_eq!(err.to_string(), "Product 3 is not in the cart");

        let err = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Stock exceeded for product 1: requested 4, available 3"
        );
    }

    #[test]
    fn test_stock_exceeded_message_is_shared_across_operations() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(err.notification(Operation::Add), messages::STOCK_EXCEEDED);
        assert_eq!(err.notification(Operation::Update), messages::STOCK_EXCEEDED);
    }

    #[test]
    fn test_other_errors_use_operation_message() {
        let not_found = CartError::Catalog(ServiceError::NotFound(ProductId::new(9)));
        assert_eq!(not_found.notification(Operation::Add), messages::ADD_FAILED);

        let missing = CartError::NotInCart(ProductId::new(9));
        assert_eq!(missing.notification(Operation::Remove), messages::REMOVE_FAILED);
        assert_eq!(missing.notification(Operation::Update), messages::UPDATE_FAILED);

        let storage = CartError::Storage(StorageError::Backend("disk full".to_string()));
        assert_eq!(storage.notification(Operation::Update), messages::UPDATE_FAILED);
    }

    #[test]
    fn test_rejections_vs_failures() {
        assert!(CartError::NotInCart(ProductId::new(1)).is_rejection());
        assert!(CartError::Catalog(ServiceError::NotFound(ProductId::new(1))).is_rejection());
        assert!(
            !CartError::Stock(ServiceError::Api {
                status: 503,
                message: "down".to_string(),
            })
            .is_rejection()
        );
        assert!(!CartError::Storage(StorageError::Backend("x".to_string())).is_rejection());
    }
}
