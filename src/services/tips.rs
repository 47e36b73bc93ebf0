//! Trait for the buying-tip rewriter.

use anyhow::Result;

/// Rewrites a scraped advisory paragraph into a short phrase suitable for a
/// push notification.
#[async_trait::async_trait]
pub trait TipGenerator: Send + Sync {
    async fn concise_tip(&self, advisory: &str) -> Result<String>;
}
