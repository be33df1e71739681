//! CLI command implementations.

pub mod cart;

use std::sync::Arc;

use rocketshoes_cart::{CartConfig, CartError, CartStore, TracingNotifier};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart store rejected or failed the operation.
    #[error("{0}")]
    Cart(#[from] CartError),
}

/// Open the cart store described by `config`.
///
/// Notifications are emitted as tracing warnings, so they show up alongside
/// the rest of the command's log output.
///
/// # Errors
///
/// Returns an error if the persisted cart cannot be loaded.
pub async fn open_store(config: &CartConfig) -> Result<CartStore, CommandError> {
    tracing::debug!(
        api = %config.api_url,
        dir = %config.storage_dir.display(),
        key = %config.storage_key,
        "Opening cart store"
    );
    Ok(CartStore::from_config(config, Arc::new(TracingNotifier)).await?)
}
