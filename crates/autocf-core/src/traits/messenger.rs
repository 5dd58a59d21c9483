// # Messenger Trait
//
// Defines the interface for delivering the composed change notification.
//
// ## Implementations
//
// - Telegram Bot API: `autocf-notify-telegram` crate

use async_trait::async_trait;

use crate::error::Result;

/// Trait for notification channel implementations
///
/// Receives the fully composed text; batching and formatting happen in
/// [`Notifier`](crate::Notifier). Called at most once per pass.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver one notification text
    async fn send(&self, text: &str) -> Result<()>;
}
