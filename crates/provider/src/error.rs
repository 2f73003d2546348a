//! Error handling for the provider client
//!
//! Raw provider responses are classified exactly once, here, into a closed
//! set of variants. Callers match on variants instead of inspecting message
//! strings.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for the hosted identity/record-store provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider-side throttling of repeated requests
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// An account already exists for the given email
    #[error("{0}")]
    DuplicateAccount(String),

    /// Password or OTP verification rejected
    #[error("{0}")]
    InvalidCredentials(String),

    /// Any other provider-reported failure, message passed through verbatim
    #[error("{0}")]
    Api(String),

    /// Network or HTTP transport errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation that requires a session was called without one
    #[error("Missing session")]
    MissingSession,
}

impl ProviderError {
    /// Classify a non-success provider response body.
    ///
    /// The provider signals rate limiting and duplicate accounts through
    /// message wording rather than distinct status codes, so this matching
    /// set must stay aligned with the hosted service's error strings.
    pub(crate) fn classify(status: StatusCode, body: String) -> Self {
        let lowered = body.to_lowercase();

        if status == StatusCode::TOO_MANY_REQUESTS
            || lowered.contains("429")
            || lowered.contains("rate limit")
            || lowered.contains("too many requests")
        {
            return ProviderError::RateLimited(body);
        }

        if lowered.contains("already registered")
            || lowered.contains("already exists")
            || lowered.contains("already been registered")
            || lowered.contains("email already")
            || lowered.contains("duplicate key")
            || lowered.contains("unique constraint")
            || lowered.contains("already in use")
        {
            return ProviderError::DuplicateAccount(body);
        }

        if lowered.contains("invalid login credentials")
            || lowered.contains("invalid credentials")
            || lowered.contains("token has expired")
            || (lowered.contains("otp") && lowered.contains("invalid"))
        {
            return ProviderError::InvalidCredentials(body);
        }

        ProviderError::Api(body)
    }

    /// Whether this error should be retried with backoff
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }

    /// Whether this error means the email is already taken
    pub fn is_duplicate_account(&self) -> bool {
        matches!(self, ProviderError::DuplicateAccount(_))
    }
}
