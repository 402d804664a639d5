//! The tone rewrite service.
//!
//! [`ToneRewriteService::rewrite`] turns `(text, x, y)` into rewritten text:
//!
//! 1. blank text short-circuits to an empty result;
//! 2. a live cache entry for the request fingerprint is returned as is;
//! 3. without an API key the call fails with
//!    [`TonepickerError::Configuration`] before any network traffic;
//! 4. otherwise a system + user message pair is sent upstream, the first
//!    choice's content is extracted, cached and returned.
//!
//! Failures are never cached and never retried here.
//!
//! # Known limitations
//!
//! - No timeout is applied to the upstream call.
//! - Concurrent identical requests that all miss the cache each call
//!   upstream; there is no in-flight de-duplication.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::cache::{CacheConfig, CacheKey, RewriteCache};
use crate::providers::{DEFAULT_BASE_URL, MistralClient};
use crate::telemetry;
use crate::traits::ChatClient;
use crate::types::{ChatRequest, Message, ToneCoordinate, extract_content};
use crate::{Result, TonepickerError};

/// Default upstream model.
pub const DEFAULT_MODEL: &str = "mistral-small";

/// Default sampling temperature. Kept low so rewrites stay literal.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// System message sent with every rewrite.
pub const SYSTEM_PROMPT: &str =
    "You are a concise assistant that rewrites text only to match requested tone.";

/// Separator between the tone instruction and the user's text.
const TEXT_SEPARATOR: &str = "\n\n---\nUser text:\n";

/// Rewrites text to a requested tone through an upstream chat API.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ToneRewriteService {
    client: Arc<dyn ChatClient>,
    cache: RewriteCache,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl ToneRewriteService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> ToneRewriteServiceBuilder {
        ToneRewriteServiceBuilder::new()
    }

    /// The cache owned by this service.
    pub fn cache(&self) -> &RewriteCache {
        &self.cache
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the upstream request for `text` at `tone`.
    pub fn request_for(&self, text: &str, tone: ToneCoordinate) -> ChatRequest {
        let user = format!("{}{TEXT_SEPARATOR}{text}", tone.instruction());
        ChatRequest::new(
            self.model.clone(),
            self.temperature,
            vec![Message::system(SYSTEM_PROMPT), Message::user(user)],
        )
    }

    /// Rewrite `text` to the tone at `(x, y)`.
    ///
    /// Coordinates may be any integer; they are clamped to the grid when
    /// choosing words but used raw in the cache key.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn rewrite(&self, text: &str, x: i32, y: i32) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let key = CacheKey::new(Some(text), x, y);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(%key, "cache hit");
            return Ok(cached);
        }
        debug!(%key, "cache miss");

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TonepickerError::Configuration("MISTRAL_API_KEY not set".to_string()))?;

        let request = self.request_for(text, ToneCoordinate::new(x, y));

        let start = Instant::now();
        let result = self.call_upstream(api_key, &request).await;
        Self::record_upstream(start, result.is_ok());

        match result {
            Ok(rewritten) => {
                self.cache.put(key, rewritten.clone()).await;
                Ok(rewritten)
            }
            Err(e) => {
                warn!(error = %e, model = %self.model, "upstream rewrite failed");
                Err(e)
            }
        }
    }

    async fn call_upstream(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        let body = self.client.complete(api_key, request).await?;
        extract_content(&body)
    }

    fn record_upstream(start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::UPSTREAM_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }
}

/// Builder for [`ToneRewriteService`].
///
/// Without an explicit [`client`](Self::client), `build` creates a
/// [`MistralClient`] against [`base_url`](Self::base_url) (default: the
/// public Mistral API). Without an explicit [`cache`](Self::cache), a
/// fresh cache with the default 10 minute TTL is created.
pub struct ToneRewriteServiceBuilder {
    client: Option<Arc<dyn ChatClient>>,
    cache: Option<RewriteCache>,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl ToneRewriteServiceBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            cache: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Use a specific upstream client instead of the default Mistral one.
    pub fn client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Use an existing cache. Handles to it stay valid after `build`.
    pub fn cache(mut self, cache: RewriteCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Create a fresh cache with `config`.
    pub fn cache_config(mut self, config: &CacheConfig) -> Self {
        self.cache = Some(RewriteCache::new(config));
        self
    }

    /// Set the upstream API key. Blank keys count as unset.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.trim().is_empty() {
            None
        } else {
            Some(key)
        };
        self
    }

    /// Set the API key from an optional value, e.g. a lookup result.
    pub fn maybe_api_key(self, api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => self.api_key(key),
            None => Self {
                api_key: None,
                ..self
            },
        }
    }

    /// Base URL for the default Mistral client.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the service.
    ///
    /// A missing API key is not an error here: each `rewrite` that misses
    /// the cache fails with a configuration error instead.
    pub fn build(self) -> Result<ToneRewriteService> {
        let client: Arc<dyn ChatClient> = match self.client {
            Some(client) => client,
            None => Arc::new(MistralClient::with_base_url(self.base_url)?),
        };

        Ok(ToneRewriteService {
            client,
            cache: self.cache.unwrap_or_default(),
            api_key: self.api_key,
            model: self.model,
            temperature: self.temperature,
        })
    }
}

impl Default for ToneRewriteServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
