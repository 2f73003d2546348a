//! Moon Production booking and session core
//!
//! The client-side state and validation core behind the studio's booking
//! funnel: a session manager that mirrors the hosted identity provider's
//! push notifications into a single reactive cell, and a booking form
//! engine with derived pricing, submit-time validation, and
//! debounce-guarded submission.

pub mod booking;
pub mod clock;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod validate;

use reqwest::Client;
use std::sync::Arc;

use moonstudio_provider::{AuthClient, RecordsClient};

use crate::clock::{Clock, SystemClock};
use crate::config::ClientOptions;
use crate::notify::Notifier;
use crate::session::SessionManager;

/// The main entry point: bundles the provider clients for one project
pub struct Studio {
    /// The base URL for the hosted provider project
    pub url: String,
    /// The anonymous API key
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    auth: Arc<AuthClient>,
    options: ClientOptions,
}

impl Studio {
    /// Create a client with default options
    ///
    /// # Example
    ///
    /// ```
    /// use moonstudio::Studio;
    ///
    /// let studio = Studio::new("https://your-project.supabase.co", "your-anon-key");
    /// ```
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a client with custom options
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let auth = Arc::new(AuthClient::new(url, key, http_client.clone()));

        Self {
            url: url.to_string(),
            key: key.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// The raw auth client
    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.auth
    }

    /// A record-store client for the `service_requests` table, carrying
    /// the signed-in user's token when a session exists
    pub fn service_requests(&self) -> RecordsClient {
        let records = RecordsClient::new(&self.url, &self.key, self.http_client.clone());
        match self.auth.get_session() {
            Some(session) => records.with_auth(&session.access_token),
            None => records,
        }
    }

    /// Start the session manager against this project
    pub fn sessions(&self, notifier: Notifier) -> SessionManager {
        self.sessions_with_clock(notifier, Arc::new(SystemClock))
    }

    /// Start the session manager with an injected clock
    pub fn sessions_with_clock(&self, notifier: Notifier, clock: Arc<dyn Clock>) -> SessionManager {
        SessionManager::start(self.auth.clone(), notifier, clock, self.options.clone())
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::booking::{BookingDraft, BookingForm, OtpChallenge};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::notify::Notifier;
    pub use crate::session::SessionManager;
    pub use crate::Studio;
}

pub use crate::booking::BookingForm;
pub use crate::error::Error;
