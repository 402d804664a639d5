//! Upstream chat capability.
//!
//! [`ToneRewriteService`](crate::ToneRewriteService) depends on exactly one
//! outside capability: send a chat-completions request and hand back the
//! raw response body. [`MistralClient`](crate::providers::MistralClient)
//! is the production implementation; tests substitute stubs.

use async_trait::async_trait;

use crate::Result;
use crate::types::ChatRequest;

/// Client for an OpenAI-style chat-completions endpoint.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `request`, authorised with `api_key` as a bearer token, and
    /// return the raw response body.
    ///
    /// Transport failures and non-success statuses are errors. The body is
    /// returned unparsed; interpreting it is the caller's job.
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String>;
}
