use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::FuelApiConfig;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient};
use crate::services::price_api::{PriceApi, PriceSample};

#[derive(Deserialize)]
struct SitePricesResponse {
    #[serde(rename = "SitePrices")]
    site_prices: Vec<PriceSample>,
}

/// Client for the regional fuel price API.
///
/// The provider returns every station's price for every fuel in the
/// configured geographic region in one response; filtering down to a single
/// fuel id happens client-side.
pub struct FuelPriceClient<C> {
    client: C,
    url: String,
}

impl FuelPriceClient<ApiKey<BasicClient>> {
    pub fn new(config: &FuelApiConfig) -> Self {
        let client = ApiKey::authorization(
            BasicClient::new(),
            format!("FPDAPI SubscriberToken={}", config.subscriber_token),
        );

        let url = format!(
            "{}/Price/GetSitesPrices?countryId={}&geoRegionLevel={}&geoRegionId={}",
            config.base_url, config.country_id, config.geo_region_level, config.geo_region_id
        );

        Self { client, url }
    }
}

#[async_trait]
impl<C: HttpClient> PriceApi for FuelPriceClient<C> {
    async fn prices_for(&self, fuel_id: u32) -> Result<Vec<u32>> {
        let req = reqwest::Request::new(reqwest::Method::GET, self.url.parse()?);
        let response = self.client.execute(req).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "price source returned an error, treating as no prices");
            return Ok(Vec::new());
        }

        let data: SitePricesResponse = response.json().await?;

        let prices: Vec<u32> = data
            .site_prices
            .into_iter()
            .filter(|site| site.fuel_id == fuel_id)
            .map(|site| site.price)
            .collect();

        if prices.is_empty() {
            warn!(fuel_id, "no prices found for fuel id");
        }

        Ok(prices)
    }
}
