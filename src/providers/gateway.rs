use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::traits::GenerationProvider;
use super::types::ProviderResponse;
use crate::app::ProviderConfig;
use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

const SYSTEM_PROMPT: &str = "You are the writing assistant inside a job-application \
tracker. You produce polished application documents and structured job analyses \
from the candidate data you are given. Never invent employers, dates, or \
credentials that are not in the provided profile.";

/// Generation provider speaking the OpenAI-compatible chat-completions
/// format of an LLM gateway. All upstream models go through the same
/// interface; the gateway handles provider-specific routing and auth.
pub struct GatewayProvider {
    client: Client,
    gateway_url: String,
    model_name: String,
    api_key: Option<String>,
}

impl GatewayProvider {
    /// Create a provider from configuration. The API key is read from the
    /// environment variable the config names.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            // Safety net only; the adapter enforces the per-attempt deadline
            .timeout(config.attempt_timeout())
            .build()
            .context("Failed to build gateway HTTP client")?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.clone(),
            model_name: config.model.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
        })
    }
}

#[async_trait]
impl GenerationProvider for GatewayProvider {
    async fn invoke(&self, prompt: &str) -> Result<ProviderResponse> {
        let request_body = json!({
            "model": self.model_name,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": DEFAULT_TEMPERATURE,
            "max_tokens": DEFAULT_MAX_TOKENS,
            "stream": false,
        });

        let url = format!("{}/v1/chat/completions", self.gateway_url);
        let mut request = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.with_context(|| {
            format!(
                "Failed to reach LLM gateway at {}. Is the gateway running?",
                self.gateway_url
            )
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.context("Failed to read gateway reply")?;
        Ok(ProviderResponse { status, body })
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
