//! The cart store.
//!
//! [`CartStore`] owns the cart, mediates every mutation through a stock
//! check, and writes the whole cart through to a [`PersistentStore`] after
//! each successful change.
//!
//! # Consistency
//!
//! A mutation computes the next cart on a copy, persists it, and only then
//! swaps it in and publishes it to subscribers. Any failure before the swap
//! leaves both the in-memory and the persisted cart exactly as they were.
//!
//! Dropping a mutation future before the swap leaves the in-memory cart and
//! subscribers untouched. The storage write may still land, so the persisted
//! blob can run one commit ahead until the next successful mutation.
//!
//! Mutations are serialized: one async mutex is held from the first lookup
//! to the final swap, so two adds for the same product cannot both pass the
//! same stock check.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::from_config(&config, Arc::new(TracingNotifier)).await?;
//!
//! let cart = store.add_product(ProductId::new(3)).await?;
//! let cart = store.update_product_amount(ProductId::new(3), 2).await?;
//! let cart = store.remove_product(ProductId::new(3)).await?;
//! ```

use std::sync::Arc;

use rocketshoes_core::{Cart, LineItem, ProductId, Stock};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::config::CartConfig;
use crate::error::{CartError, Operation, Result};
use crate::notify::NotificationSink;
use crate::seed::default_cart;
use crate::services::{ApiClient, CatalogService, StockService};
use crate::storage::{FileStore, PersistentStore};

/// Collaborators injected into a [`CartStore`].
#[derive(Clone)]
pub struct CartDeps {
    pub catalog: Arc<dyn CatalogService>,
    pub stock: Arc<dyn StockService>,
    pub storage: Arc<dyn PersistentStore>,
    pub notifier: Arc<dyn NotificationSink>,
}

/// Stock-checked, persisted shopping cart.
///
/// Cheaply cloneable via `Arc`; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    key: String,
    deps: CartDeps,
    cart: Mutex<Cart>,
    snapshot: watch::Sender<Cart>,
}

impl CartStore {
    /// Load the cart stored under `key`, seeding the default cart if the
    /// storage has nothing for it yet.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read, if the seed cannot be
    /// written, or if the stored blob is not a valid cart. A corrupt blob is
    /// left untouched.
    #[instrument(skip(deps, key))]
    pub async fn open(deps: CartDeps, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let cart = match deps.storage.read(&key).await? {
            Some(blob) if !blob.trim().is_empty() => {
                let cart = Cart::from_json(&blob)?;
                info!(key = %key, lines = cart.len(), "Loaded persisted cart");
                cart
            }
            _ => {
                let seed = default_cart();
                deps.storage.write(&key, &seed.to_json()?).await?;
                info!(key = %key, lines = seed.len(), "Seeded default cart");
                seed
            }
        };

        let (snapshot, _) = watch::channel(cart.clone());

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                key,
                deps,
                cart: Mutex::new(cart),
                snapshot,
            }),
        })
    }

    /// Open a store backed by the product API and a file store, as described
    /// by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the persisted
    /// cart cannot be loaded.
    pub async fn from_config(
        config: &CartConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config).map_err(CartError::Catalog)?);
        let deps = CartDeps {
            catalog: api.clone(),
            stock: api,
            storage: Arc::new(FileStore::new(&config.storage_dir)),
            notifier,
        };
        Self::open(deps, config.storage_key.clone()).await
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.snapshot.borrow().clone()
    }

    /// Watch committed carts. The receiver starts at the current cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.snapshot.subscribe()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line, or fetches the product from the catalog
    /// and appends a new line with amount 1. Either way the resulting amount
    /// must be covered by current stock.
    ///
    /// # Errors
    ///
    /// Returns the reason the cart was left unchanged. The matching
    /// notification has already been sent.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = self.plan_add(&cart, product_id).await;
        self.apply(Operation::Add, &mut cart, planned).await
    }

    /// Remove a product's line. No stock check is made.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line, or the
    /// storage error if the new cart could not be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = Self::plan_remove(&cart, product_id);
        self.apply(Operation::Remove, &mut cart, planned).await
    }

    /// Set a product's quantity.
    ///
    /// An amount of zero or less is ignored without notification.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line,
    /// [`CartError::StockExceeded`] if stock does not cover `amount`, or the
    /// lookup/storage error that prevented the update.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = self.plan_update(&cart, product_id, amount).await;
        self.apply(Operation::Update, &mut cart, planned).await
    }

    // =========================================================================
    // Planning
    // =========================================================================

    async fn plan_add(&self, cart: &Cart, product_id: ProductId) -> Result<Option<Cart>> {
        if let Some(existing) = cart.get(product_id) {
            let requested = existing.amount.saturating_add(1);
            self.ensure_stock(product_id, i64::from(requested)).await?;

            let mut next = cart.clone();
            next.set_amount(product_id, requested)?;
            return Ok(Some(next));
        }

        let product = self
            .inner
            .deps
            .catalog
            .product(product_id)
            .await
            .map_err(CartError::Catalog)?;
        self.ensure_stock(product_id, 1).await?;

        let mut next = cart.clone();
        next.push(LineItem::from_product(product, 1))?;
        Ok(Some(next))
    }

    fn plan_remove(cart: &Cart, product_id: ProductId) -> Result<Option<Cart>> {
        let mut next = cart.clone();
        next.remove(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(Some(next))
    }

    async fn plan_update(
        &self,
        cart: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Option<Cart>> {
        if amount <= 0 {
            debug!(amount, "Ignoring non-positive amount");
            return Ok(None);
        }

        if !cart.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        let stock = self.ensure_stock(product_id, amount).await?;
        let amount = u32::try_from(amount).map_err(|_| CartError::StockExceeded {
            product_id,
            requested: amount,
            available: stock.available,
        })?;

        let mut next = cart.clone();
        next.set_amount(product_id, amount)?;
        Ok(Some(next))
    }

    /// Fetch live stock and check it covers `requested` units.
    async fn ensure_stock(&self, product_id: ProductId, requested: i64) -> Result<Stock> {
        let stock = self
            .inner
            .deps
            .stock
            .stock(product_id)
            .await
            .map_err(CartError::Stock)?;

        if !u32::try_from(requested).is_ok_and(|units| stock.covers(units)) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.available,
            });
        }
        Ok(stock)
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Commit a planned cart (if any), then report any failure.
    async fn apply(
        &self,
        operation: Operation,
        current: &mut Cart,
        planned: Result<Option<Cart>>,
    ) -> Result<Cart> {
        let outcome = match planned {
            Ok(Some(next)) => self.commit(current, next).await,
            Ok(None) => Ok(current.clone()),
            Err(e) => Err(e),
        };

        if let Err(err) = &outcome {
            self.report(operation, err);
        }
        outcome
    }

    /// Persist `next`, then make it the current cart.
    ///
    /// If the caller drops the future while the write is in flight, the
    /// write may complete without the swap.
    async fn commit(&self, current: &mut Cart, next: Cart) -> Result<Cart> {
        let blob = next.to_json()?;
        self.inner
            .deps
            .storage
            .write(&self.inner.key, &blob)
            .await?;

        *current = next.clone();
        self.inner.snapshot.send_replace(next.clone());
        debug!(lines = next.len(), items = next.item_count(), "Cart committed");
        Ok(next)
    }

    fn report(&self, operation: Operation, err: &CartError) {
        if err.is_rejection() {
            warn!(?operation, error = %err, "Cart operation rejected");
        } else {
            error!(?operation, error = %err, "Cart operation failed");
        }
        self.inner.deps.notifier.error(err.notification(operation));
    }
}
