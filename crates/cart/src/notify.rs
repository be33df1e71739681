//! User-facing notifications.
//!
//! The cart store reports every rejected or failed operation through a
//! [`NotificationSink`] with one of the fixed messages in [`messages`]. Sinks
//! are fire-and-forget: they cannot fail and the store never waits on them.

use tokio::sync::mpsc;

/// Fixed user-facing messages.
pub mod messages {
    /// Requested quantity exceeds available stock (add and update).
    pub const STOCK_EXCEEDED: &str = "Quantidade solicitada fora de estoque";

    /// Adding a product failed for any reason other than stock.
    pub const ADD_FAILED: &str = "Erro na adição do produto";

    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Erro na remoção do produto";

    /// Changing a product's quantity failed for any reason other than stock.
    pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";
}

/// A channel for user-facing error messages.
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Emits notifications as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes::notify", "{message}");
    }
}

/// Forwards notifications to an unbounded channel.
///
/// A UI layer holds the receiver and renders each message as a toast.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its messages arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn error(&self, message: &str) {
        // Nobody listening is not an error for a fire-and-forget sink
        let _ = self.tx.send(message.to_string());
    }
}
