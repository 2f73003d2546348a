//! Booking form engine
//!
//! Owns one [`BookingDraft`], computes the derived total, validates
//! completeness, and submits exactly once per user intent: a fixed
//! debounce window rejects rapid re-submits before any network traffic,
//! and a busy flag covers the in-flight call.

pub mod catalog;
pub mod draft;
pub mod otp;

pub use catalog::{add_on, service, AddOn, Service, ADD_ONS, SERVICES, TIME_SLOTS};
pub use draft::BookingDraft;
pub use otp::{OtpChallenge, OtpStep};

use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use moonstudio_provider::{RecordsClient, ServiceRequest};

use crate::clock::Clock;
use crate::config::ClientOptions;
use crate::error::{Error, ValidationError};
use crate::notify::Notifier;
use crate::session::SessionState;

/// The booking form: one draft, submit gating, derived pricing
pub struct BookingForm {
    draft: BookingDraft,
    records: RecordsClient,
    session: watch::Receiver<SessionState>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    debounce: std::time::Duration,
    last_accepted: Option<Instant>,
    in_flight: bool,
}

impl BookingForm {
    pub fn new(
        records: RecordsClient,
        session: watch::Receiver<SessionState>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        options: &ClientOptions,
    ) -> Self {
        Self {
            draft: BookingDraft::new(),
            records,
            session,
            notifier,
            clock,
            debounce: options.submit_debounce,
            last_accepted: None,
            in_flight: false,
        }
    }

    /// The draft, for reads and field-by-field mutation
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    /// Derived total for the current draft
    pub fn total(&self) -> u32 {
        self.draft.total()
    }

    /// The submit control should be disabled while this is true
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Submit the draft as a service request.
    ///
    /// Gate order: authenticated session, draft completeness, debounce
    /// window, busy flag. Every gate rejects before any network call. On
    /// success the draft resets to empty; on provider failure it stays
    /// intact for correction and retry.
    pub async fn submit(&mut self) -> Result<(), Error> {
        let state = self.session.borrow().clone();
        let Some(user) = state.user else {
            self.notifier.notify_destructive(
                "Authentication required",
                "Please sign in to submit a service request.",
            );
            return Err(Error::NotAuthenticated);
        };

        if !self.draft.is_complete() {
            self.notifier.notify_destructive(
                "Missing Information",
                "Please fill in all required fields to complete your booking.",
            );
            return Err(ValidationError::MissingBookingFields.into());
        }

        let now = self.clock.now();
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.debounce {
                debug!("submit rejected inside debounce window");
                self.notifier.notify_destructive(
                    "Too Fast",
                    "Please wait a moment before submitting again.",
                );
                return Err(Error::SubmitThrottled);
            }
        }
        if self.in_flight {
            return Err(Error::SubmitInFlight);
        }

        // Window opens at acceptance, not completion, so a rapid second
        // attempt is rejected regardless of the first call's latency.
        self.last_accepted = Some(now);
        self.in_flight = true;

        let request = self.build_request(&user.id);
        info!("submitting service request for {}", request.service_type);
        let result = self.records.insert(&request).await;
        self.in_flight = false;

        match result {
            Ok(()) => {
                self.draft.reset();
                self.notifier.notify(
                    "Booking Submitted!",
                    "We'll contact you within 24 hours to confirm your session.",
                );
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify_destructive("Submission failed", &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Map the draft onto the provider's service-request row. `submit`
    /// only calls this on a complete draft.
    fn build_request(&self, user_id: &str) -> ServiceRequest {
        let service = self
            .draft
            .service
            .as_deref()
            .and_then(catalog::service);
        let service_name = service.map(|s| s.name).unwrap_or("Unknown");
        let date = self
            .draft
            .date
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_default();
        let slot = self.draft.time_slot.clone().unwrap_or_default();
        let hours = self.draft.duration_hours.unwrap_or(1);
        let add_ons: Vec<&str> = self
            .draft
            .add_ons
            .iter()
            .filter_map(|id| catalog::add_on(id))
            .map(|a| a.name)
            .collect();

        let description = if add_ons.is_empty() {
            format!("{} session, {} hour(s)", service_name, hours)
        } else {
            format!(
                "{} session, {} hour(s), add-ons: {}",
                service_name,
                hours,
                add_ons.join(", ")
            )
        };

        ServiceRequest {
            id: None,
            user_id: user_id.to_string(),
            service_type: service_name.to_string(),
            full_name: self.draft.client_name.clone(),
            email: self.draft.client_email.clone(),
            phone: self.draft.client_phone.clone(),
            project_title: format!("{} booking", service_name),
            project_description: description,
            budget_range: format!("₹{}", self.draft.total()),
            timeline: format!("{} at {}", date, slot),
            additional_notes: self.draft.notes.clone(),
            status: None,
            created_at: None,
        }
    }
}
