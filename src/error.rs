//! Tonepicker error types

/// Tonepicker error types
#[derive(Debug, thiserror::Error)]
pub enum TonepickerError {
    // Upstream transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Upstream data errors
    #[error("parsing upstream response failed: {0}")]
    Parse(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Client input errors, raised by the HTTP layer before the service is called
    #[error("text must not be empty")]
    EmptyText,

    #[error("invalid request body: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for TonepickerError {
    fn from(err: serde_json::Error) -> Self {
        TonepickerError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for TonepickerError {
    fn from(err: reqwest::Error) -> Self {
        TonepickerError::Http(err.to_string())
    }
}

impl TonepickerError {
    /// Whether the failure originated in the upstream chat API
    /// (transport, status, or body parsing).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            TonepickerError::Http(_) | TonepickerError::Api { .. } | TonepickerError::Parse(_)
        )
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TonepickerError::EmptyText | TonepickerError::InvalidRequest(_)
        )
    }

    /// Stable machine-readable code for the HTTP error envelope.
    ///
    /// Configuration failures share the upstream code: callers only need to
    /// tell "your request was bad" apart from "the rewrite could not be done".
    pub fn error_code(&self) -> &'static str {
        match self {
            TonepickerError::EmptyText => "EMPTY_TEXT",
            TonepickerError::InvalidRequest(_) => "INVALID_REQUEST",
            _ => "UPSTREAM_ERROR",
        }
    }
}

/// Result type alias for Tonepicker operations
pub type Result<T> = std::result::Result<T, TonepickerError>;
