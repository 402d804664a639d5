//! Integration tests for [`ToneRewriteService::rewrite`] against stub clients.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tonepicker::{
    CacheConfig, CacheKey, ChatClient, ChatRequest, Result, RewriteCache, Role,
    ToneRewriteService, TonepickerError, instruction_for,
};

// ============================================================================
// Stub clients
// ============================================================================

/// Returns a fixed body and records every call.
struct StubClient {
    body: String,
    calls: AtomicUsize,
    last: Mutex<Option<(String, ChatRequest)>>,
}

impl StubClient {
    fn new(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    fn replying(content: &str) -> Arc<Self> {
        Self::new(serde_json::json!({ "choices": [{ "message": { "content": content } }] }).to_string())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> (String, ChatRequest) {
        self.last.lock().unwrap().clone().expect("no call recorded")
    }
}

#[async_trait]
impl ChatClient for StubClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((api_key.to_string(), request.clone()));
        Ok(self.body.clone())
    }
}

/// Always fails like a dropped connection.
struct FailingClient {
    calls: AtomicUsize,
}

impl FailingClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatClient for FailingClient {
    async fn complete(&self, _api_key: &str, _request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TonepickerError::Http("connection refused".into()))
    }
}

/// Echoes the tone line of the instruction so different tones give different output.
struct EchoToneClient {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatClient for EchoToneClient {
    async fn complete(&self, _api_key: &str, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let user = &request.messages[1].content;
        let tone = user.split('.').next().unwrap_or_default();
        Ok(serde_json::json!({ "choices": [{ "message": { "content": tone } }] }).to_string())
    }
}

fn service_with(client: Arc<dyn ChatClient>, cache: RewriteCache) -> ToneRewriteService {
    ToneRewriteService::builder()
        .client(client)
        .cache(cache)
        .api_key("test-key")
        .build()
        .unwrap()
}

// ============================================================================
// Response extraction
// ============================================================================

#[tokio::test]
async fn returns_first_choice_content() {
    let stub = StubClient::new(r#"{"choices":[{"message":{"content":"Hello there"}}]}"#);
    let service = service_with(stub.clone(), RewriteCache::default());

    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "Hello there");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn missing_choices_yields_empty_string() {
    let stub = StubClient::new(r#"{"id":"cmpl-1","object":"chat.completion"}"#);
    let service = service_with(stub.clone(), RewriteCache::default());

    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "");
}

#[tokio::test]
async fn numeric_content_is_returned_as_text() {
    let stub = StubClient::new(r#"{"choices":[{"message":{"content":42}}]}"#);
    let service = service_with(stub.clone(), RewriteCache::default());

    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "42");
}

#[tokio::test]
async fn empty_result_is_cached_like_any_success() {
    let stub = StubClient::new(r#"{"choices":[]}"#);
    let service = service_with(stub.clone(), RewriteCache::default());

    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "");
    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "");
    assert_eq!(stub.calls(), 1);
}

// ============================================================================
// Upstream request shape
// ============================================================================

#[tokio::test]
async fn sends_key_model_temperature_and_two_messages() {
    let stub = StubClient::replying("ok");
    let service = service_with(stub.clone(), RewriteCache::default());

    service.rewrite("see you tomorrow", 2, 0).await.unwrap();

    let (api_key, request) = stub.last();
    assert_eq!(api_key, "test-key");
    assert_eq!(request.model, "mistral-small");
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].role, Role::User);
    assert_eq!(
        request.messages[1].content,
        format!("{}\n\n---\nUser text:\nsee you tomorrow", instruction_for(2, 0))
    );
    assert!(request.messages[1].content.contains("tone: casual and stern."));
}

#[tokio::test]
async fn out_of_range_coordinates_are_clamped_in_instruction() {
    let stub = StubClient::replying("ok");
    let service = service_with(stub.clone(), RewriteCache::default());

    service.rewrite("hi", -5, 99).await.unwrap();

    let (_, request) = stub.last();
    assert!(request.messages[1].content.contains("tone: very formal and warm."));
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn identical_request_hits_cache() {
    let stub = StubClient::replying("Good day.");
    let service = service_with(stub.clone(), RewriteCache::default());

    let first = service.rewrite("hey", 0, 1).await.unwrap();
    let second = service.rewrite("hey", 0, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_triggers_fresh_call() {
    let stub = StubClient::replying("Good day.");
    let service = service_with(stub.clone(), RewriteCache::default());

    service.rewrite("hey", 0, 1).await.unwrap();

    tokio::time::advance(Duration::from_secs(599)).await;
    service.rewrite("hey", 0, 1).await.unwrap();
    assert_eq!(stub.calls(), 1, "still inside the 10 minute window");

    tokio::time::advance(Duration::from_secs(2)).await;
    service.rewrite("hey", 0, 1).await.unwrap();
    assert_eq!(stub.calls(), 2, "entry expired after 10 minutes");
}

#[tokio::test(start_paused = true)]
async fn custom_ttl_is_honoured() {
    let stub = StubClient::replying("x");
    let cache = RewriteCache::new(&CacheConfig::new().ttl(Duration::from_secs(5)));
    let service = service_with(stub.clone(), cache);

    service.rewrite("hey", 1, 1).await.unwrap();
    tokio::time::advance(Duration::from_secs(5)).await;
    service.rewrite("hey", 1, 1).await.unwrap();

    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn different_tone_is_a_separate_entry() {
    let client = Arc::new(EchoToneClient {
        calls: AtomicUsize::new(0),
    });
    let service = service_with(client.clone(), RewriteCache::default());

    let formal = service.rewrite("hey", 0, 0).await.unwrap();
    let casual = service.rewrite("hey", 2, 2).await.unwrap();

    assert_ne!(formal, casual);
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    assert_ne!(CacheKey::new(Some("hey"), 0, 0), CacheKey::new(Some("hey"), 2, 2));
}

#[tokio::test]
async fn raw_coordinates_key_the_cache() {
    // (-1, 0) and (0, 0) ask for the same tone but are cached separately.
    let stub = StubClient::replying("x");
    let service = service_with(stub.clone(), RewriteCache::default());

    service.rewrite("hey", -1, 0).await.unwrap();
    service.rewrite("hey", 0, 0).await.unwrap();

    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn successful_rewrite_populates_injected_cache() {
    let cache = RewriteCache::default();
    let stub = StubClient::replying("Greetings.");
    let service = service_with(stub, cache.clone());

    service.rewrite("hi", 1, 1).await.unwrap();

    let key = CacheKey::new(Some("hi"), 1, 1);
    assert_eq!(cache.get(&key).await.as_deref(), Some("Greetings."));
}

#[tokio::test]
async fn prepopulated_cache_is_served_without_api_key() {
    let cache = RewriteCache::default();
    cache
        .put(CacheKey::new(Some("hi"), 1, 1), "from cache".into())
        .await;

    let stub = StubClient::replying("from upstream");
    let service = ToneRewriteService::builder()
        .client(stub.clone())
        .cache(cache)
        .build()
        .unwrap();

    assert_eq!(service.rewrite("hi", 1, 1).await.unwrap(), "from cache");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn concurrent_identical_misses_are_not_deduplicated() {
    let stub = StubClient::replying("same");
    let service = Arc::new(service_with(stub.clone(), RewriteCache::default()));

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.rewrite("hi", 1, 1).await })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.rewrite("hi", 1, 1).await })
    };

    assert_eq!(a.await.unwrap().unwrap(), "same");
    assert_eq!(b.await.unwrap().unwrap(), "same");
    assert!((1..=2).contains(&stub.calls()));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn missing_api_key_fails_before_network() {
    let stub = StubClient::replying("unused");
    let service = ToneRewriteService::builder()
        .client(stub.clone())
        .build()
        .unwrap();

    let err = service.rewrite("hi", 1, 1).await.unwrap_err();

    assert!(matches!(err, TonepickerError::Configuration(_)));
    assert!(err.to_string().contains("MISTRAL_API_KEY not set"));
    assert!(!err.is_upstream());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn transport_failure_is_upstream_error_and_not_cached() {
    let cache = RewriteCache::default();
    let client = FailingClient::new();
    let service = service_with(client.clone(), cache.clone());

    let err = service.rewrite("hi", 1, 1).await.unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("connection refused"));

    let key = CacheKey::new(Some("hi"), 1, 1);
    assert!(cache.entry(&key).await.is_none());

    // Not cached, so the next call goes upstream again.
    service.rewrite("hi", 1, 1).await.unwrap_err();
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_body_is_parse_error_and_not_cached() {
    let cache = RewriteCache::default();
    let stub = StubClient::new("upstream exploded");
    let service = service_with(stub.clone(), cache.clone());

    let err = service.rewrite("hi", 1, 1).await.unwrap_err();
    assert!(matches!(err, TonepickerError::Parse(_)));
    assert!(err.is_upstream());
    assert!(cache.entry(&CacheKey::new(Some("hi"), 1, 1)).await.is_none());
}

#[tokio::test]
async fn blank_text_short_circuits() {
    let stub = StubClient::replying("unused");
    let service = service_with(stub.clone(), RewriteCache::default());

    assert_eq!(service.rewrite("", 1, 1).await.unwrap(), "");
    assert_eq!(service.rewrite("   ", 1, 1).await.unwrap(), "");
    assert_eq!(stub.calls(), 0);
}
