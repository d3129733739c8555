//! HTTP transport helpers for `generateContent` requests.

use crate::error::ApiError;
use crate::types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use std::time::Duration;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Build an HTTP client with timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Endpoint for one model's `generateContent` method.
pub(super) fn generate_url(base_url: &str, model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{base_url}/models/{model}:generateContent")
}

/// Send one request and decode the response body.
pub(super) async fn send_generate(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    request: &GenerateContentRequest,
) -> Result<GenerateContentResponse, ApiError> {
    let response = http
        .post(url)
        .header(API_KEY_HEADER, api_key)
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            code,
            body: error_message(&body),
        });
    }

    response
        .json::<GenerateContentResponse>()
        .await
        .map_err(ApiError::from)
}

/// Prefer the provider's error message over the raw JSON envelope.
pub(super) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        _ => body.trim().to_string(),
    }
}

/// Pull the answer text out of a decoded response.
pub(super) fn response_text(response: GenerateContentResponse) -> Result<String, ApiError> {
    if let Some(text) = response.first_text() {
        return Ok(text);
    }
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(ApiError::InvalidResponse(format!(
            "prompt was blocked ({reason})"
        )));
    }
    let finish = response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
        .unwrap_or("none");
    Err(ApiError::InvalidResponse(format!(
        "response contained no text (finish reason: {finish})"
    )))
}
