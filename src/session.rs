//! Process-wide session state
//!
//! The session manager is the single writer of the authenticated-identity
//! state. It mirrors provider push notifications into a `watch` cell that
//! every consumer reads through its own receiver, and exposes the
//! sign-in/sign-up/sign-out/OTP operations with their notification
//! contract. Consumers never mutate the state; the manager itself mutates
//! it only from the provider's push path or its own operation results.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use moonstudio_provider::{
    AuthChange, AuthClient, OAuthProvider, Session, SignUpOptions, User,
};

use crate::clock::Clock;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::notify::Notifier;

/// Zero-or-one authenticated identity plus the startup loading flag
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub is_loading: bool,
}

impl SessionState {
    fn loading() -> Self {
        Self {
            user: None,
            session: None,
            is_loading: true,
        }
    }

    fn set_session(&mut self, session: Option<Session>) {
        self.user = session.as_ref().map(|s| s.user.clone());
        self.session = session;
        self.is_loading = false;
    }

    fn apply(&mut self, change: AuthChange) {
        match change {
            AuthChange::SignedIn(session) | AuthChange::TokenRefreshed(session) => {
                self.set_session(Some(session));
            }
            AuthChange::SignedOut => self.set_session(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owns the session cell and the provider subscription behind it
pub struct SessionManager {
    auth: Arc<AuthClient>,
    state: watch::Receiver<SessionState>,
    listener: JoinHandle<()>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    options: ClientOptions,
}

impl SessionManager {
    /// Start the manager: subscribe to provider pushes and fetch the
    /// current snapshot.
    ///
    /// The two initialization paths race; whichever lands first clears the
    /// loading flag, and both write the same state shape, so the final
    /// state does not depend on the order.
    pub fn start(
        auth: Arc<AuthClient>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        options: ClientOptions,
    ) -> Self {
        let (tx, rx) = watch::channel(SessionState::loading());
        let changes = auth.on_auth_state_change();
        let snapshot_auth = auth.clone();

        let listener = tokio::spawn(async move {
            let snapshot = snapshot_auth.get_session();
            debug!("initial session snapshot (present: {})", snapshot.is_some());
            tx.send_modify(|state| state.set_session(snapshot));

            Self::pump(changes, tx).await;
        });

        Self {
            auth,
            state: rx,
            listener,
            notifier,
            clock,
            options,
        }
    }

    async fn pump(
        mut changes: broadcast::Receiver<AuthChange>,
        tx: watch::Sender<SessionState>,
    ) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    // Only the kind; the full event carries token material.
                    debug!("applying provider auth change: {}", change.kind());
                    tx.send_modify(|state| state.apply(change));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The provider re-broadcasts full sessions, so the next
                    // event converges; nothing to replay.
                    warn!("auth change stream lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("auth change stream closed, listener exiting");
                    break;
                }
            }
        }
    }

    /// A read-only view of the session state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Current snapshot
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Cancel the provider subscription. Pushes after this point mutate
    /// nothing.
    pub fn shutdown(&self) {
        self.listener.abort();
    }

    /// Create an account, retrying on provider rate limiting.
    ///
    /// Retry n waits `base_delay * n` before re-attempting, up to
    /// `signup_max_retries` extra attempts. Exhausted retries surface the
    /// normalized [`Error::TooManyAttempts`] instead of the raw provider
    /// message; every other provider error passes through unmodified so the
    /// caller can react to cases like a duplicate account. The provider
    /// provisions the profile row server-side; no follow-up write happens
    /// here.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        mobile_number: &str,
    ) -> Result<(), Error> {
        let metadata = serde_json::json!({
            "full_name": full_name,
            "mobile_number": mobile_number,
        });

        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                let delay = self.options.signup_retry_base_delay * attempt;
                info!("rate limited, retrying sign-up in {:?} (attempt {})", delay, attempt);
                self.clock.sleep(delay).await;
            }

            let options = SignUpOptions {
                email_redirect_to: Some(self.options.redirect_url.clone()),
                data: Some(metadata.clone()),
            };

            match self.auth.sign_up(email, password, options).await {
                Ok(_) => return Ok(()),
                Err(e) if e.is_rate_limited() && attempt < self.options.signup_max_retries => {
                    attempt += 1;
                }
                Err(e) if e.is_rate_limited() => {
                    warn!("sign-up retries exhausted on rate limiting");
                    return Err(Error::TooManyAttempts);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), Error> {
        match self.auth.sign_in_with_password(email, password).await {
            Ok(_) => {
                self.notifier.notify(
                    "Welcome Back!",
                    "You have successfully signed in to Moon Production.",
                );
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify_destructive("Sign In Failed", &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Terminate the current session.
    ///
    /// Local state updates arrive through the provider's push callback,
    /// never by direct mutation here.
    pub async fn sign_out(&self) -> Result<(), Error> {
        match self.auth.sign_out().await {
            Ok(()) => {
                self.notifier
                    .notify("See You Soon!", "You have been successfully signed out.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify_destructive("Sign Out Failed", &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Send a 6-digit OTP over SMS
    pub async fn send_phone_otp(&self, phone: &str) -> Result<(), Error> {
        match self.auth.sign_in_with_otp(phone).await {
            Ok(()) => {
                self.notifier
                    .notify("OTP Sent", "We sent a 6-digit code via SMS.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify_destructive("OTP Send Failed", &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Verify an SMS OTP; success transitions the session through the same
    /// push path as password sign-in
    pub async fn verify_phone_otp(&self, phone: &str, code: &str) -> Result<(), Error> {
        match self.auth.verify_otp(phone, code).await {
            Ok(_) => {
                self.notifier
                    .notify("Verified", "Phone number verified successfully.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify_destructive("OTP Verification Failed", &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Begin federated sign-in with Google; returns the redirect URL the
    /// UI layer navigates to. Building the URL is local and cannot fail;
    /// the session itself arrives later as a provider push once the
    /// redirect completes.
    pub fn sign_in_with_google(&self) -> String {
        self.auth
            .oauth_sign_in_url(OAuthProvider::Google, Some(&self.options.redirect_url))
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
