//! HTTP surface and daemon configuration.
//!
//! - `routes`: axum router exposing `POST /api/tone/adjust` and
//!   `GET /api/health`, with permissive CORS.
//! - `config`: TOML configuration and secrets loading for `tonepickerd`.

pub mod config;
pub mod routes;

pub use routes::{AppState, ToneRequest, ToneResponse, build_router, serve};
