//! Axum routes for the tone API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{ToneRewriteService, TonepickerError};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ToneRewriteService>,
}

impl AppState {
    pub fn new(service: Arc<ToneRewriteService>) -> Self {
        Self { service }
    }
}

/// Body of `POST /api/tone/adjust`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToneRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Successful response of `POST /api/tone/adjust`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneResponse {
    pub adjusted_text: String,
}

/// Build the router with all routes, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/tone/adjust", post(adjust_tone))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, build_router(state)).await
}

/// POST /api/tone/adjust: rewrite `text` to the tone at `(x, y)`.
///
/// Bodies that fail to parse as a [`ToneRequest`] get a JSON 400 like any
/// other client error.
pub async fn adjust_tone(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ToneRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(&TonepickerError::InvalidRequest(rejection.body_text()));
        }
    };

    let text = match request.text.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => return error_response(&TonepickerError::EmptyText),
    };

    match state.service.rewrite(text, request.x, request.y).await {
        Ok(adjusted_text) => (StatusCode::OK, Json(ToneResponse { adjusted_text })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /api/health: liveness and version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::version_string(),
    }))
}

/// `EMPTY_TEXT` is a bare 400; other client errors are a 400 with a
/// message, and everything else is a 502 carrying the diagnostic message.
fn error_response(err: &TonepickerError) -> Response {
    let (status, body) = match err {
        TonepickerError::EmptyText => (StatusCode::BAD_REQUEST, json!({ "error": err.error_code() })),
        e if e.is_client_error() => (
            StatusCode::BAD_REQUEST,
            json!({ "error": e.error_code(), "message": e.to_string() }),
        ),
        e => (
            StatusCode::BAD_GATEWAY,
            json!({ "error": e.error_code(), "message": e.to_string() }),
        ),
    };

    (status, Json(body)).into_response()
}
