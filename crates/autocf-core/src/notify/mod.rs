//! Batched change notifications
//!
//! Changes applied during a pass are described as short messages, collected
//! in order, and flushed as one outbound text when the pass ends. The flush
//! happens on success and failure paths alike, so changes applied before an
//! abort are still reported.

use tracing::debug;

use crate::error::Result;
use crate::traits::Messenger;

/// Header line of every composed notification
const MESSAGE_HEADER: &str = "*Autocloudflare*";

/// Ordered message collector for one reconciliation pass.
///
/// Duplicates are kept and registration order is preserved. Flushing
/// consumes the collector, so a pass sends at most one notification.
#[derive(Debug, Default)]
pub struct Notifier {
    messages: Vec<String>,
}

impl Notifier {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one human-readable change description
    pub fn register(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Whether no change has been registered yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Send all registered messages as a single notification.
    ///
    /// Nothing is sent when the collector is empty. Delivery failures
    /// propagate to the caller.
    pub async fn flush(self, messenger: &dyn Messenger) -> Result<()> {
        if self.messages.is_empty() {
            debug!("no changes registered, skipping notification");
            return Ok(());
        }
        messenger.send(&compose(&self.messages)).await
    }
}

/// The fixed header plus one bulleted line per registered message
fn compose(messages: &[String]) -> String {
    let mut text = String::from(MESSAGE_HEADER);
    for message in messages {
        text.push_str("\n- ");
        text.push_str(message);
    }
    text
}
