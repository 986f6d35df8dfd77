//! `userdesk-profiles` — the Person and Address records and their draft
//! lifecycle: created empty (Add) or loaded from the service (Edit), mutated
//! field by field, validated before submission, discarded at session end.

pub mod address;
pub mod person;
pub mod validate;

pub use address::{Address, AddressField};
pub use person::{Person, PersonField, RegisterPayload};
pub use validate::{MissingField, missing_required};

/// Country pre-filled into Add-mode drafts and treated as the primary lookup
/// market.
pub const PRIMARY_MARKET_COUNTRY: &str = "India";
