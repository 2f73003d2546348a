//! Phone-verification sub-flow
//!
//! A small state machine that gates when the session manager's OTP calls
//! may fire. Local rejections never touch the network and never duplicate
//! the manager's error formatting.

use crate::error::{Error, ValidationError};
use crate::session::SessionManager;

/// Where an in-flight verification attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpStep {
    #[default]
    Idle,
    CodeSent,
}

/// One phone-verification attempt, one instance per form context
#[derive(Debug, Default)]
pub struct OtpChallenge {
    phone: String,
    code: String,
    step: OtpStep,
    sending: bool,
    verifying: bool,
}

impl OtpChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_phone(&mut self, phone: &str) {
        self.phone = phone.to_string();
    }

    pub fn set_code(&mut self, code: &str) {
        self.code = code.to_string();
    }

    pub fn step(&self) -> OtpStep {
        self.step
    }

    pub fn is_busy(&self) -> bool {
        self.sending || self.verifying
    }

    /// The phone field satisfies the international-format precondition
    pub fn can_send(&self) -> bool {
        self.phone.starts_with('+') && !self.sending
    }

    /// Request a code. Rejected locally unless the phone number starts
    /// with `+`.
    pub async fn send(&mut self, sessions: &SessionManager) -> Result<(), Error> {
        if !self.phone.starts_with('+') {
            return Err(ValidationError::PhoneNotInternational.into());
        }

        self.sending = true;
        let result = sessions.send_phone_otp(&self.phone).await;
        self.sending = false;

        if result.is_ok() {
            self.step = OtpStep::CodeSent;
        }
        result
    }

    /// Verify the entered code. Rejected locally unless a code was sent
    /// and the entry is exactly 6 characters.
    pub async fn verify(&mut self, sessions: &SessionManager) -> Result<(), Error> {
        if self.step != OtpStep::CodeSent {
            return Err(ValidationError::OtpNotRequested.into());
        }
        if self.code.chars().count() != 6 {
            return Err(ValidationError::OtpCodeLength.into());
        }

        self.verifying = true;
        let result = sessions.verify_phone_otp(&self.phone, &self.code).await;
        self.verifying = false;

        if result.is_ok() {
            // Verification signs the user in; the challenge is spent.
            self.step = OtpStep::Idle;
            self.code.clear();
        }
        result
    }
}
