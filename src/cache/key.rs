//! Cache key derivation.
//!
//! Keys have the form `{x}:{y}:{hash}` where `x`/`y` are the raw
//! coordinates from the request and `hash` is a 64-bit `DefaultHasher`
//! digest of the text. The hash is stable within a process run, which is
//! all an in-memory cache needs. Two texts colliding on the hash would
//! share a cached rewrite; with non-adversarial input and a short TTL that
//! is accepted.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Hash used for absent text.
pub const ABSENT_TEXT_HASH: u64 = 0;

/// Fingerprint of a rewrite request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `text` at raw coordinates `(x, y)`.
    ///
    /// `None` text hashes to [`ABSENT_TEXT_HASH`], so repeated absent-text
    /// lookups land on the same key.
    pub fn new(text: Option<&str>, x: i32, y: i32) -> Self {
        Self(format!("{x}:{y}:{}", text_hash(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn text_hash(text: Option<&str>) -> u64 {
    match text {
        None => ABSENT_TEXT_HASH,
        Some(text) => {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            hasher.finish()
        }
    }
}
