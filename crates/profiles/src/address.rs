use serde::{Deserialize, Serialize};

use userdesk_core::{AddressId, PersonId};

use crate::PRIMARY_MARKET_COUNTRY;

/// A postal address owned by exactly one person once persisted.
///
/// An address without an `id` has not been linked to any persisted person
/// yet; the owner reference is filled in by the save protocol after the
/// person identifier has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: Option<AddressId>,
    /// Owning person, as the service names it on the wire.
    #[serde(default, rename = "person")]
    pub person_id: Option<PersonId>,
    #[serde(default)]
    pub house_flat: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

/// User-editable fields of an [`Address`] draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    HouseFlat,
    Street,
    Landmark,
    Area,
    District,
    City,
    State,
    PostalCode,
    Country,
}

impl Address {
    /// Empty Add-mode draft; country defaults to the primary market.
    pub fn draft() -> Self {
        Self {
            id: None,
            person_id: None,
            house_flat: String::new(),
            street: String::new(),
            landmark: String::new(),
            area: String::new(),
            district: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: PRIMARY_MARKET_COUNTRY.to_string(),
        }
    }

    /// Replace exactly one field, leaving the rest untouched.
    pub fn set_field(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::HouseFlat => self.house_flat = value,
            AddressField::Street => self.street = value,
            AddressField::Landmark => self.landmark = value,
            AddressField::Area => self.area = value,
            AddressField::District => self.district = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::PostalCode => self.postal_code = value,
            AddressField::Country => self.country = value,
        }
    }
}
