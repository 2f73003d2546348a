//! Wire types for the identity provider

use serde::{Deserialize, Serialize};

/// An authenticated user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A provider session token bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub user: User,
}

/// Options attached to an account-creation call
#[derive(Debug, Clone, Default)]
pub struct SignUpOptions {
    /// Where the confirmation email should send the user back to
    pub email_redirect_to: Option<String>,
    /// Profile metadata stored on the user record (full name, mobile number)
    pub data: Option<serde_json::Value>,
}

/// Federated identity providers the site offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

/// A session change pushed by the provider.
///
/// Every path that signs a user in or out broadcasts one of these; the
/// session manager mirrors them into its own state and never mutates a
/// session locally.
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthChange {
    /// Event kind, safe for log lines. The full variants carry token
    /// material and must not be formatted into logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "signed-in",
            Self::TokenRefreshed(_) => "token-refreshed",
            Self::SignedOut => "signed-out",
        }
    }
}
