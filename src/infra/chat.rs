use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TipsConfig;
use crate::services::tips::TipGenerator;

const SYSTEM_PROMPT: &str =
    "You are an AI language model who creates concise fuel buying tips suitable for push notifications.";

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    n: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Buying-tip rewriter backed by a chat-completion API.
pub struct ChatTipClient {
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatTipClient {
    pub fn new(config: &TipsConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TipGenerator for ChatTipClient {
    async fn concise_tip(&self, advisory: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Rewrite the following city buying tip to be extremely concise, pleasant \
                         to read, and to convey certainty about the forecasted price movement. \
                         Recommend a user action in 7 words or less without labeling the tip.\n\
                         Do not use full stops (periods) or quotation marks in the response, and \
                         ensure to use sentence case. Buying tip: {advisory}"
                    ),
                },
            ],
            max_tokens: 10,
            n: 1,
            temperature: 1.0,
        };

        let response = client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send tip request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Tip generation failed with status {}: {}",
                status,
                body
            ));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse tip response: {}", e))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        Ok(content.trim().trim_end_matches('.').to_string())
    }
}
