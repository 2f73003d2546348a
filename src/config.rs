//! Configuration options for the booking and session core

use std::time::Duration;

/// Tunables for the session manager and booking form engine
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Extra sign-up attempts after a rate-limited first try
    pub signup_max_retries: u32,

    /// Delay before retry n is `signup_retry_base_delay * n`
    pub signup_retry_base_delay: Duration,

    /// Minimum elapsed time between two accepted booking submissions
    pub submit_debounce: Duration,

    /// Where the confirmation email sends the user back to
    pub redirect_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            signup_max_retries: 2,
            signup_retry_base_delay: Duration::from_secs(1),
            submit_debounce: Duration::from_millis(1500),
            redirect_url: "https://moonproduction.in/".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set how many extra sign-up attempts follow a rate-limited one
    pub fn with_signup_max_retries(mut self, value: u32) -> Self {
        self.signup_max_retries = value;
        self
    }

    /// Set the base delay for sign-up retries
    pub fn with_signup_retry_base_delay(mut self, value: Duration) -> Self {
        self.signup_retry_base_delay = value;
        self
    }

    /// Set the booking submit debounce window
    pub fn with_submit_debounce(mut self, value: Duration) -> Self {
        self.submit_debounce = value;
        self
    }

    /// Set the post-confirmation redirect URL
    pub fn with_redirect_url(mut self, value: &str) -> Self {
        self.redirect_url = value.to_string();
        self
    }
}
