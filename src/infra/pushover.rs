use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::PushoverConfig;
use crate::services::notify::Notifier;

const TITLE: &str = "Fuel Price Alert";

/// Push delivery via the Pushover message endpoint.
pub struct PushoverClient {
    url: String,
    app_token: String,
}

impl PushoverClient {
    pub fn new(config: &PushoverConfig) -> Self {
        Self {
            url: config.api_url.clone(),
            app_token: config.app_token.clone(),
        }
    }
}

#[async_trait]
impl Notifier for PushoverClient {
    async fn send(&self, user_key: &str, message: &str) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let payload = [
            ("token", self.app_token.as_str()),
            ("user", user_key),
            ("message", message),
            ("title", TITLE),
        ];

        let response = client.post(&self.url).form(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Notification delivery failed with status {}: {}",
                status,
                body
            ));
        }

        Ok(())
    }
}
