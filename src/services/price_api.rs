//! Trait and wire types for the regional fuel price source.

use anyhow::Result;
use serde::Deserialize;

/// One station's advertised price for a single fuel type at query time.
///
/// Prices are integers in the provider's sub-unit scale (tenths of a cent
/// per litre). Samples are ephemeral; they are produced fresh on every query
/// and never persisted individually.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceSample {
    #[serde(rename = "FuelId")]
    pub fuel_id: u32,
    #[serde(rename = "Price")]
    pub price: u32,
}

/// Abstraction over the regional price provider.
#[async_trait::async_trait]
pub trait PriceApi: Send + Sync {
    /// Returns raw per-station prices for `fuel_id` across the configured
    /// region. An unavailable provider yields an empty list, not an error.
    async fn prices_for(&self, fuel_id: u32) -> Result<Vec<u32>>;
}
