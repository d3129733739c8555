//! Gemini `generateContent` client.
//!
//! - request/response plumbing lives in `transport`.
//!
//! Each `generate` call is one HTTP round trip. There is no retry layer.

mod transport;

use super::ModelClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::GenerateContentRequest;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Client for the Gemini generative language API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from resolved API configuration and a key.
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        Self {
            http: transport::build_http_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.trim().to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the model's text answer.
    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        let url = transport::generate_url(&self.base_url, &self.model);
        debug!(model = %self.model, "sending generateContent request");
        let request = GenerateContentRequest::from_prompt(prompt);
        let response = transport::send_generate(&self.http, &url, &self.api_key, &request).await?;
        transport::response_text(response)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        GeminiClient::generate(self, prompt).await
    }
}
