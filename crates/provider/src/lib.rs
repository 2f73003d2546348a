//! Provider client for the Moon Production booking core
//!
//! This crate talks to the hosted identity/database service the site
//! delegates persistence and authentication to. It exposes two clients:
//! [`AuthClient`] for the auth endpoints (password, OTP, federated) and
//! [`RecordsClient`] for the `service_requests` table, plus the closed
//! [`ProviderError`] taxonomy classified at this boundary.

mod auth;
mod error;
mod records;
mod types;

pub use auth::AuthClient;
pub use error::ProviderError;
pub use records::{RecordsClient, RequestStatus, ServiceRequest};
pub use types::{AuthChange, OAuthProvider, Session, SignUpOptions, User};
