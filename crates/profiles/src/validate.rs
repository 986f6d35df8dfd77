//! Pre-submission validation.
//!
//! Submission is gated on the required person and address fields being
//! non-empty; a failed check reports *which* fields are missing and must not
//! cause any network traffic.

use serde::{Deserialize, Serialize};

use crate::{Address, Person};

/// A required form field found empty at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    FirstName,
    LastName,
    Email,
    HouseFlat,
    Street,
    Area,
    PostalCode,
    Country,
}

impl core::fmt::Display for MissingField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            MissingField::FirstName => "first name",
            MissingField::LastName => "last name",
            MissingField::Email => "email",
            MissingField::HouseFlat => "house/flat",
            MissingField::Street => "street",
            MissingField::Area => "area",
            MissingField::PostalCode => "postal code",
            MissingField::Country => "country",
        };
        f.write_str(name)
    }
}

/// Collect every required field that is empty (after trimming).
///
/// Empty result means the drafts are submittable.
pub fn missing_required(person: &Person, address: &Address) -> Vec<MissingField> {
    let mut missing = Vec::new();

    let mut check = |value: &str, field: MissingField| {
        if value.trim().is_empty() {
            missing.push(field);
        }
    };

    check(&person.first_name, MissingField::FirstName);
    check(&person.last_name, MissingField::LastName);
    check(&person.email, MissingField::Email);
    check(&address.house_flat, MissingField::HouseFlat);
    check(&address.street, MissingField::Street);
    check(&address.area, MissingField::Area);
    check(&address.postal_code, MissingField::PostalCode);
    check(&address.country, MissingField::Country);

    missing
}
