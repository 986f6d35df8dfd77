//! `userdesk-workflow` — the profile–address reconciliation workflow.
//!
//! Given an identity context (who is editing, editing what, for whom), a pair
//! of drafts (person + address), and a typed postal code, this crate decides
//! the correct set of network operations: which endpoints, which verbs, in
//! which order. Person is always saved before Address; the address upsert
//! needs the resolved person identifier as its owner reference.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod http;
pub mod services;

pub use config::ServiceConfig;
pub use controller::{ReconciliationController, WorkflowPhase};
pub use error::{ServiceError, WorkflowError};
pub use form::{FormState, LookupTicket, PendingLookup};
pub use services::{AddressService, PersonService};
