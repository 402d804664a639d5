//! Tonepicker - tone rewriting in front of an LLM chat API
//!
//! This crate rewrites text to a point on a 3×3 tone grid (formality ×
//! warmth) by forwarding an instruction to an upstream chat-completions
//! API, caching results for a short time.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonepicker::ToneRewriteService;
//!
//! #[tokio::main]
//! async fn main() -> tonepicker::Result<()> {
//!     let service = ToneRewriteService::builder()
//!         .api_key("your-mistral-key")
//!         .build()?;
//!
//!     // x = 2 (casual), y = 2 (warm)
//!     let rewritten = service.rewrite("Submit the report by Friday.", 2, 2).await?;
//!     println!("{rewritten}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, RewriteCache};
pub use error::{Result, TonepickerError};
pub use service::{ToneRewriteService, ToneRewriteServiceBuilder};
pub use traits::ChatClient;
pub use version::{PKG_VERSION, version_string};

pub use types::{ChatRequest, Formality, Message, Role, ToneCoordinate, Warmth, instruction_for};
