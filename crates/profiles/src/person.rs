use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use userdesk_core::PersonId;

/// A person record as the profile service exposes it.
///
/// `id` and `date_joined` are absent on a draft being created and assigned by
/// the service; everything else is user-editable form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: Option<PersonId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Role flag; the service reports administrators as superusers.
    #[serde(default, rename = "is_superuser")]
    pub is_admin: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Read-only, server-assigned.
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// User-editable fields of a [`Person`] draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    FirstName,
    LastName,
    Phone,
    Email,
}

impl Person {
    /// Empty Add-mode draft: no identifier yet, active by default.
    pub fn draft() -> Self {
        Self {
            id: None,
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            email: String::new(),
            is_admin: false,
            is_active: true,
            date_joined: None,
        }
    }

    /// Replace exactly one field, leaving the rest untouched.
    pub fn set_field(&mut self, field: PersonField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PersonField::FirstName => self.first_name = value,
            PersonField::LastName => self.last_name = value,
            PersonField::Phone => self.phone = value,
            PersonField::Email => self.email = value,
        }
    }
}

/// Registration request for creating a person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterPayload {
    /// Build a registration payload from a Person draft.
    ///
    /// This flow has no username or password inputs, so both are derived from
    /// the email. The derived credential is a provisional stand-in for a
    /// missing "set password" step (see DESIGN.md); accounts created this way
    /// are expected to go through a password reset before real use.
    pub fn from_draft(person: &Person) -> Self {
        let username = if person.username.trim().is_empty() {
            derive_username(&person.email)
        } else {
            person.username.clone()
        };

        Self {
            username,
            email: person.email.clone(),
            phone: person.phone.clone(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            password: placeholder_credential(&person.email),
        }
    }
}

const CREDENTIAL_MIN_LEN: usize = 8;
const CREDENTIAL_MAX_LEN: usize = 64;

/// Derive the placeholder credential from an email: pad to the service's
/// minimum acceptable length, truncate at a sane maximum.
pub fn placeholder_credential(email: &str) -> String {
    let mut cred: String = email.chars().take(CREDENTIAL_MAX_LEN).collect();
    while cred.len() < CREDENTIAL_MIN_LEN {
        cred.push('0');
    }
    cred
}

/// Username defaults to the email's local part.
pub fn derive_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    if local.is_empty() {
        email.to_string()
    } else {
        local.to_string()
    }
}
