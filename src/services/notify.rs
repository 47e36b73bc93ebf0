//! Trait for the push-notification delivery endpoint.

use anyhow::Result;

/// Delivers one message to one subscriber address.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user_key: &str, message: &str) -> Result<()>;
}
