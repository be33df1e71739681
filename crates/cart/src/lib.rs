//! RocketShoes Cart - Stock-checked, persisted shopping cart.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart and is the only way to change it
//! - Every quantity change is checked against live stock from the product API
//! - The whole cart is written through to a [`PersistentStore`] after each change
//! - Failures never escape as panics: each one becomes a user-facing
//!   notification plus an error value, and the cart is left untouched
//!
//! # Modules
//!
//! - [`store`] - The cart store and its operations
//! - [`services`] - Catalog and stock lookups, plus the HTTP [`ApiClient`]
//! - [`storage`] - Memory and file persistence backends
//! - [`notify`] - Notification sinks and the fixed user-facing messages
//! - [`config`] - Environment-based configuration
//! - [`error`] - The cart error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notify;
pub mod seed;
pub mod services;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY, LogFormat};
pub use error::{CartError, Operation};
pub use notify::{ChannelNotifier, NotificationSink, TracingNotifier, messages};
pub use seed::default_cart;
pub use services::{ApiClient, CatalogService, ServiceError, StockService};
pub use storage::{FileStore, MemoryStore, PersistentStore, StorageError};
pub use store::{CartDeps, CartStore};

pub use rocketshoes_core::{Cart, LineItem, Price, Product, ProductId, Stock};
