//! Error handling for the booking and session core
//!
//! Every failing operation returns one of these instead of panicking; the
//! caller decides the UI consequence (navigation, tab switch, field
//! highlighting). Nothing here is fatal to the process.

use thiserror::Error;

use moonstudio_provider::ProviderError;

/// Unified error type for the booking and session core
#[derive(Error, Debug)]
pub enum Error {
    /// Provider-reported failures, already classified at the provider
    /// boundary
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Local validation failures, detected before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submission attempted without an authenticated session
    #[error("Please sign in to submit a service request.")]
    NotAuthenticated,

    /// Sign-up retries exhausted on persistent rate limiting
    #[error("Too many sign-up attempts. Please wait a moment before trying again.")]
    TooManyAttempts,

    /// A second submit arrived inside the debounce window
    #[error("Please wait a moment before submitting again.")]
    SubmitThrottled,

    /// A submit arrived while the previous one was still in flight
    #[error("Your booking is already being submitted.")]
    SubmitInFlight,
}

/// Submit-time validation failures; each carries its own user-facing
/// message and none of them touch the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields to complete your booking.")]
    MissingBookingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter your full name.")]
    ShortFullName,

    #[error("Password must be at least 6 characters long.")]
    WeakPassword,

    #[error("Passwords do not match. Please try again.")]
    PasswordMismatch,

    #[error("Please enter a valid mobile number.")]
    InvalidMobileNumber,

    #[error("Phone number must start with a country code, e.g. +91.")]
    PhoneNotInternational,

    #[error("Request a code before verifying.")]
    OtpNotRequested,

    #[error("Enter the 6-digit code we sent you.")]
    OtpCodeLength,
}
