//! Mistral chat-completions client.
//!
//! See: <https://docs.mistral.ai/api/#tag/chat>

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;

use crate::traits::ChatClient;
use crate::types::ChatRequest;
use crate::{Result, TonepickerError};

/// Default base URL for the Mistral API
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Longest slice of an error body carried into [`TonepickerError::Api`].
const MAX_ERROR_BODY: usize = 512;

/// Client for the Mistral chat-completions endpoint.
///
/// Holds one `reqwest::Client`, so connections are pooled across calls.
/// No request timeout is configured: a stalled upstream holds the caller
/// until the caller gives up.
#[derive(Clone)]
pub struct MistralClient {
    http: Client,
    base_url: String,
}

impl MistralClient {
    /// Create a client for the API at `base_url`, usually
    /// [`DEFAULT_BASE_URL`]. A trailing `/` is dropped.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().build().map_err(|e| {
            TonepickerError::Configuration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to [`TonepickerError::Api`], keeping the
    /// start of the body for diagnostics.
    async fn status_error(response: reqwest::Response) -> TonepickerError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.chars().take(MAX_ERROR_BODY).collect();

        let message = if detail.trim().is_empty() {
            format!("Mistral API error: {status}")
        } else {
            format!("Mistral API error: {status}: {}", detail.trim())
        };

        TonepickerError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ChatClient for MistralClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Ok(response.text().await?)
    }
}
