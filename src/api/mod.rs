//! Model API access.
//!
//! - `client`: `GeminiClient`, the reqwest-backed production client.
//!
//! The pipeline only sees [`ModelClient`], so tests substitute a fake and the
//! configured client is an explicit handle rather than process-wide state.

use crate::error::ApiError;
use async_trait::async_trait;

mod client;

pub use client::GeminiClient;

/// Minimal model API interface used by the pipeline.
///
/// Failures are returned as-is; callers perform no retry or backoff.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}
