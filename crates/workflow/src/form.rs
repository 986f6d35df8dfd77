//! Form state: the two drafts plus lookup supersession bookkeeping.
//!
//! Postal lookups are fire-and-forget per keystroke. Each attempt gets a
//! monotonically increasing ticket; only the result carrying the most recent
//! ticket may touch the drafts. An in-flight request is never cancelled, its
//! result is simply discarded once a newer one has been issued.

use userdesk_lookup::{LookupOutcome, should_trigger};
use userdesk_profiles::{Address, AddressField, Person, PersonField};

/// Handle identifying one postal-lookup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

/// Everything the caller needs to run one lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub ticket: LookupTicket,
    pub postal_code: String,
    pub country_hint: Option<String>,
}

/// The person and address drafts for one workflow session.
#[derive(Debug, Clone)]
pub struct FormState {
    pub person: Person,
    pub address: Address,
    last_ticket: u64,
    busy: bool,
    lookup_unavailable: bool,
}

impl FormState {
    /// Empty drafts for Add mode.
    pub fn for_add() -> Self {
        Self::with_drafts(Person::draft(), Address::draft())
    }

    /// Drafts loaded from the subject's records for Edit mode. Multiple
    /// addresses may exist; the first entry is the working address.
    pub fn for_edit(person: Person, mut addresses: Vec<Address>) -> Self {
        let address = if addresses.is_empty() {
            Address::draft()
        } else {
            addresses.swap_remove(0)
        };
        Self::with_drafts(person, address)
    }

    fn with_drafts(person: Person, address: Address) -> Self {
        Self {
            person,
            address,
            last_ticket: 0,
            busy: false,
            lookup_unavailable: false,
        }
    }

    /// Replace one person field.
    pub fn set_person_field(&mut self, field: PersonField, value: impl Into<String>) {
        self.person.set_field(field, value);
    }

    /// Replace one address field. Editing the postal code past the trigger
    /// threshold starts a new lookup attempt, superseding any in flight.
    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Option<PendingLookup> {
        self.address.set_field(field, value);

        if field == AddressField::PostalCode && should_trigger(&self.address.postal_code) {
            Some(self.begin_lookup())
        } else {
            None
        }
    }

    /// Issue a fresh lookup ticket; any earlier ticket becomes stale.
    pub fn begin_lookup(&mut self) -> PendingLookup {
        self.last_ticket += 1;
        self.busy = true;
        self.lookup_unavailable = false;

        let country = self.address.country.trim();
        PendingLookup {
            ticket: LookupTicket(self.last_ticket),
            postal_code: self.address.postal_code.trim().to_string(),
            country_hint: (!country.is_empty()).then(|| country.to_string()),
        }
    }

    /// Apply a lookup result if its ticket is still the most recent.
    ///
    /// Returns whether the drafts were touched. A field is only overwritten
    /// when the outcome actually supplies a value; a match never blanks
    /// existing entries.
    pub fn apply_lookup(&mut self, ticket: LookupTicket, outcome: &LookupOutcome) -> bool {
        if ticket.0 != self.last_ticket {
            tracing::debug!(
                stale = ticket.0,
                current = self.last_ticket,
                "discarding superseded lookup result"
            );
            return false;
        }

        if let Some(district) = &outcome.district {
            self.address.district = district.clone();
        }
        if let Some(city) = &outcome.city {
            self.address.city = city.clone();
        }
        if let Some(state) = &outcome.state {
            self.address.state = state.clone();
        }
        if let Some(country) = &outcome.country {
            self.address.country = country.clone();
        }

        self.busy = false;
        true
    }

    /// Record that the current attempt found nothing. Stale failures are
    /// ignored just like stale results.
    pub fn fail_lookup(&mut self, ticket: LookupTicket) {
        if ticket.0 == self.last_ticket {
            self.busy = false;
            self.lookup_unavailable = true;
        }
    }

    /// Whether the most recently issued lookup is still outstanding.
    pub fn lookup_in_progress(&self) -> bool {
        self.busy
    }

    /// Non-fatal "lookup unavailable" indicator; the user fills fields
    /// manually. Cleared by the next attempt.
    pub fn lookup_unavailable(&self) -> bool {
        self.lookup_unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_lookup::ProviderKind;

    fn outcome(city: &str, state: &str) -> LookupOutcome {
        LookupOutcome {
            district: None,
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            country: None,
            source: ProviderKind::Primary,
        }
    }

    #[test]
    fn postal_code_edit_past_threshold_triggers_lookup() {
        let mut form = FormState::for_add();

        assert!(form.set_address_field(AddressField::PostalCode, "50").is_none());
        let pending = form
            .set_address_field(AddressField::PostalCode, "5000")
            .expect("threshold reached");
        assert_eq!(pending.postal_code, "5000");
        assert_eq!(pending.country_hint.as_deref(), Some("India"));
        assert!(form.lookup_in_progress());
    }

    #[test]
    fn non_postal_edits_never_trigger_lookups() {
        let mut form = FormState::for_add();
        assert!(form.set_address_field(AddressField::Street, "a long street name").is_none());
        assert!(!form.lookup_in_progress());
    }

    #[test]
    fn stale_result_is_discarded_after_newer_lookup_starts() {
        let mut form = FormState::for_add();
        let first = form.begin_lookup();
        let second = form.begin_lookup();

        // First attempt completes late; it must not touch the drafts.
        assert!(!form.apply_lookup(first.ticket, &outcome("Old City", "Old State")));
        assert_eq!(form.address.city, "");

        assert!(form.apply_lookup(second.ticket, &outcome("Gachibowli", "Telangana")));
        assert_eq!(form.address.city, "Gachibowli");
        assert_eq!(form.address.state, "Telangana");
    }

    #[test]
    fn stale_result_is_discarded_even_after_newer_one_applied() {
        let mut form = FormState::for_add();
        let first = form.begin_lookup();
        let second = form.begin_lookup();

        assert!(form.apply_lookup(second.ticket, &outcome("New City", "New State")));
        assert!(!form.apply_lookup(first.ticket, &outcome("Old City", "Old State")));
        assert_eq!(form.address.city, "New City");
    }

    #[test]
    fn applied_outcome_never_blanks_existing_fields() {
        let mut form = FormState::for_add();
        form.set_address_field(AddressField::District, "Hyderabad");
        form.set_address_field(AddressField::Country, "India");

        let pending = form.begin_lookup();
        let partial = LookupOutcome {
            district: None,
            city: Some("Gachibowli".to_string()),
            state: None,
            country: None,
            source: ProviderKind::Secondary,
        };

        assert!(form.apply_lookup(pending.ticket, &partial));
        assert_eq!(form.address.district, "Hyderabad");
        assert_eq!(form.address.country, "India");
        assert_eq!(form.address.city, "Gachibowli");
    }

    #[test]
    fn failed_lookup_surfaces_unavailable_without_touching_fields() {
        let mut form = FormState::for_add();
        form.set_address_field(AddressField::City, "Typed City");

        let pending = form.begin_lookup();
        form.fail_lookup(pending.ticket);

        assert!(form.lookup_unavailable());
        assert!(!form.lookup_in_progress());
        assert_eq!(form.address.city, "Typed City");

        // The next attempt clears the indicator.
        form.begin_lookup();
        assert!(!form.lookup_unavailable());
    }

    #[test]
    fn stale_failure_does_not_clear_a_newer_inflight_lookup() {
        let mut form = FormState::for_add();
        let first = form.begin_lookup();
        let _second = form.begin_lookup();

        form.fail_lookup(first.ticket);
        assert!(form.lookup_in_progress());
        assert!(!form.lookup_unavailable());
    }

    #[test]
    fn edit_mode_takes_the_first_address() {
        let mut a1 = Address::draft();
        a1.city = "First".to_string();
        let mut a2 = Address::draft();
        a2.city = "Second".to_string();

        let form = FormState::for_edit(Person::draft(), vec![a1, a2]);
        assert_eq!(form.address.city, "First");
    }

    #[test]
    fn edit_mode_with_no_addresses_starts_a_fresh_draft() {
        let form = FormState::for_edit(Person::draft(), Vec::new());
        assert_eq!(form.address.id, None);
        assert_eq!(form.address.country, "India");
    }
}
