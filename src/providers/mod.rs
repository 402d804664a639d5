//! Upstream chat API clients.

pub mod mistral;

pub use mistral::{DEFAULT_BASE_URL, MistralClient};
