//! Rewrite result cache.
//!
//! - [`CacheKey`]: fingerprint of `(x, y, text)`; see [`key`].
//! - [`RewriteCache`]: concurrent TTL map from key to rewritten text,
//!   owned by one [`ToneRewriteService`](crate::ToneRewriteService) and
//!   injected through its builder. Nothing is persisted; the cache lives
//!   and dies with the service instance.

pub mod key;
pub mod response;

pub use key::CacheKey;
pub use response::{CacheConfig, CacheEntry, RewriteCache};
