//! The in-progress booking draft and its derived total
//!
//! The draft is purely local state: mutators never validate, the total is
//! recomputed on every read, and completeness is only checked at submit
//! time.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::catalog;

/// Mutable, ephemeral state of an in-progress booking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub service: Option<String>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub duration_hours: Option<u32>,
    pub add_ons: BTreeSet<String>,
    pub notes: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_service(&mut self, id: &str) {
        self.service = Some(id.to_string());
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn select_time(&mut self, slot: &str) {
        self.time_slot = Some(slot.to_string());
    }

    /// Duration is whole hours, minimum 1
    pub fn set_duration(&mut self, hours: u32) {
        self.duration_hours = Some(hours.max(1));
    }

    /// Add the add-on if absent, remove it if present
    pub fn toggle_add_on(&mut self, id: &str) {
        if !self.add_ons.remove(id) {
            self.add_ons.insert(id.to_string());
        }
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn set_client_name(&mut self, name: &str) {
        self.client_name = name.to_string();
    }

    pub fn set_client_email(&mut self, email: &str) {
        self.client_email = email.to_string();
    }

    pub fn set_client_phone(&mut self, phone: &str) {
        self.client_phone = phone.to_string();
    }

    /// Derived total: hourly rate times duration (multiplier 1 when the
    /// duration is unset) plus the flat prices of selected add-ons.
    /// Missing or unknown selections contribute zero.
    pub fn total(&self) -> u32 {
        let rate = self
            .service
            .as_deref()
            .and_then(catalog::service)
            .map(|s| s.hourly_rate)
            .unwrap_or(0);
        let multiplier = self.duration_hours.unwrap_or(1);
        let add_ons: u32 = self
            .add_ons
            .iter()
            .filter_map(|id| catalog::add_on(id))
            .map(|a| a.price)
            .sum();

        // No upper bound on the duration field, so saturate rather than
        // wrap on absurd input.
        rate.saturating_mul(multiplier).saturating_add(add_ons)
    }

    /// All fields a submission requires are populated
    pub fn is_complete(&self) -> bool {
        self.service.is_some()
            && self.date.is_some()
            && self.time_slot.is_some()
            && self.duration_hours.is_some()
            && !self.client_name.is_empty()
            && !self.client_email.is_empty()
            && !self.client_phone.is_empty()
    }

    /// Clear everything back to the empty draft
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_rate_times_duration_plus_add_ons() {
        let mut draft = BookingDraft::new();
        draft.select_service("mixing-mastering"); // 2000/h
        draft.set_duration(3);
        draft.toggle_add_on("video-shoot"); // +1500
        draft.toggle_add_on("mastering"); // +1000

        assert_eq!(draft.total(), 2000 * 3 + 2500);
    }

    #[test]
    fn unset_duration_defaults_to_one_hour() {
        let mut draft = BookingDraft::new();
        draft.select_service("vocal-recording"); // 1200/h
        assert_eq!(draft.total(), 1200);
    }

    #[test]
    fn empty_draft_totals_zero() {
        assert_eq!(BookingDraft::new().total(), 0);
    }

    #[test]
    fn unknown_selections_contribute_zero() {
        let mut draft = BookingDraft::new();
        draft.select_service("karaoke");
        draft.set_duration(4);
        draft.toggle_add_on("fog-machine");
        assert_eq!(draft.total(), 0);
    }

    #[test]
    fn total_covers_every_service_and_duration() {
        for service in catalog::SERVICES {
            for hours in 1..=8u32 {
                let mut draft = BookingDraft::new();
                draft.select_service(service.id);
                draft.set_duration(hours);
                for add_on in catalog::ADD_ONS {
                    draft.toggle_add_on(add_on.id);
                }
                let add_on_sum: u32 = catalog::ADD_ONS.iter().map(|a| a.price).sum();
                assert_eq!(draft.total(), service.hourly_rate * hours + add_on_sum);
            }
        }
    }

    #[test]
    fn toggle_add_on_is_an_involution() {
        let mut draft = BookingDraft::new();
        draft.toggle_add_on("extra-mixing");
        assert!(draft.add_ons.contains("extra-mixing"));
        draft.toggle_add_on("extra-mixing");
        assert!(draft.add_ons.is_empty());
    }

    #[test]
    fn extreme_duration_saturates_instead_of_wrapping() {
        let mut draft = BookingDraft::new();
        draft.select_service("music-production"); // 2500/h
        draft.set_duration(u32::MAX);
        draft.toggle_add_on("video-shoot");

        assert_eq!(draft.total(), u32::MAX);
    }

    #[test]
    fn duration_clamps_to_at_least_one() {
        let mut draft = BookingDraft::new();
        draft.set_duration(0);
        assert_eq!(draft.duration_hours, Some(1));
    }

    #[test]
    fn completeness_requires_every_contact_field() {
        let mut draft = BookingDraft::new();
        draft.select_service("music-production");
        draft.select_date(NaiveDate::from_ymd_opt(2026, 9, 10).unwrap());
        draft.select_time("02:00 PM");
        draft.set_duration(2);
        draft.set_client_name("Test Artist");
        draft.set_client_email("artist@example.com");
        assert!(!draft.is_complete());

        draft.set_client_phone("+919876543210");
        assert!(draft.is_complete());
    }

    #[test]
    fn reset_returns_to_empty() {
        let mut draft = BookingDraft::new();
        draft.select_service("voice-dubbing");
        draft.set_notes("rough mix attached");
        draft.reset();
        assert_eq!(draft, BookingDraft::new());
    }
}
