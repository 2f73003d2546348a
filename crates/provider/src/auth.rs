//! Identity provider client
//!
//! Covers the auth endpoints the booking funnel consumes: password
//! sign-up/sign-in, sign-out, SMS OTP send/verify, and federated (Google)
//! redirect initiation. Session changes are pushed to subscribers over a
//! broadcast channel so exactly one code path updates consumer state.

use log::{debug, warn};
use reqwest::Client;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::types::{AuthChange, OAuthProvider, Session, SignUpOptions};

/// Auth client for the hosted identity provider
pub struct AuthClient {
    url: String,
    key: String,
    http_client: Client,
    current_session: Arc<RwLock<Option<Session>>>,
    auth_events: broadcast::Sender<AuthChange>,
}

impl AuthClient {
    /// Create a new auth client against a project URL and anon key
    pub fn new(url: &str, key: &str, http_client: Client) -> Self {
        let (auth_events, _) = broadcast::channel(16);
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            current_session: Arc::new(RwLock::new(None)),
            auth_events,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Subscribe to session changes (sign-in, token refresh, sign-out).
    ///
    /// The returned receiver is dropped to unsubscribe; pushes after that
    /// point go nowhere.
    pub fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange> {
        self.auth_events.subscribe()
    }

    /// Current session snapshot, if any
    pub fn get_session(&self) -> Option<Session> {
        self.current_session.read().expect("session lock poisoned").clone()
    }

    fn store_session(&self, session: &Session, change: AuthChange) {
        {
            let mut guard = self.current_session.write().expect("session lock poisoned");
            *guard = Some(session.clone());
        }
        // No receivers is fine; nobody has subscribed yet.
        if let Err(e) = self.auth_events.send(change) {
            debug!("no auth-state subscribers: {}", e);
        }
    }

    async fn error_from(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("provider auth call failed ({}): {}", status, body);
        ProviderError::classify(status, body)
    }

    /// Create an account with email and password.
    ///
    /// `options.data` carries profile metadata (full name, mobile number);
    /// the provider provisions the profile row itself via a database
    /// trigger, so there is no follow-up write here.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<Option<Session>, ProviderError> {
        let url = self.auth_url("/signup");

        let mut payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        if let Some(data) = options.data {
            payload["data"] = data;
        }
        if let Some(redirect) = options.email_redirect_to {
            payload["options"] = serde_json::json!({ "email_redirect_to": redirect });
        }

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        // With email confirmation enabled the provider returns a bare user
        // instead of a session; only a full session signs the user in.
        let body: serde_json::Value = response.json().await?;
        match serde_json::from_value::<Session>(body) {
            Ok(session) => {
                self.store_session(&session, AuthChange::SignedIn(session.clone()));
                Ok(Some(session))
            }
            Err(_) => Ok(None),
        }
    }

    /// Sign in with email and password
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let url = self.auth_url("/token?grant_type=password");

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let session: Session = response.json().await?;
        self.store_session(&session, AuthChange::SignedIn(session.clone()));
        Ok(session)
    }

    /// Terminate the current session.
    ///
    /// This is the only path that clears the stored session; it broadcasts
    /// `SignedOut` so subscribers converge through the push channel.
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        let token = self
            .get_session()
            .map(|s| s.access_token)
            .ok_or(ProviderError::MissingSession)?;

        let url = self.auth_url("/logout");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        {
            let mut guard = self.current_session.write().expect("session lock poisoned");
            *guard = None;
        }
        if let Err(e) = self.auth_events.send(AuthChange::SignedOut) {
            debug!("no auth-state subscribers: {}", e);
        }

        Ok(())
    }

    /// Request a 6-digit OTP over SMS for the given phone number
    pub async fn sign_in_with_otp(&self, phone: &str) -> Result<(), ProviderError> {
        let url = self.auth_url("/otp");

        let payload = serde_json::json!({
            "phone": phone,
            "channel": "sms",
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }

    /// Verify an SMS OTP; success signs the user in exactly as password
    /// sign-in does
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<Session, ProviderError> {
        let url = self.auth_url("/verify");

        let payload = serde_json::json!({
            "phone": phone,
            "token": code,
            "type": "sms",
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let session: Session = response.json().await?;
        self.store_session(&session, AuthChange::SignedIn(session.clone()));
        Ok(session)
    }

    /// Exchange the stored refresh token for a fresh session.
    ///
    /// Success stores the new token bundle and broadcasts `TokenRefreshed`,
    /// so subscribers pick the rotation up through the same push path as a
    /// sign-in.
    pub async fn refresh_session(&self) -> Result<Session, ProviderError> {
        let refresh_token = self
            .get_session()
            .map(|s| s.refresh_token)
            .ok_or(ProviderError::MissingSession)?;

        let url = self.auth_url("/token?grant_type=refresh_token");

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let session: Session = response.json().await?;
        self.store_session(&session, AuthChange::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Build the federated sign-in redirect URL
    pub fn oauth_sign_in_url(&self, provider: OAuthProvider, redirect_to: Option<&str>) -> String {
        let mut url = format!(
            "{}?provider={}",
            self.auth_url("/authorize"),
            provider.as_str()
        );
        if let Some(redirect) = redirect_to {
            url.push_str(&format!("&redirect_to={}", urlencoding::encode(redirect)));
        }
        url
    }
}
