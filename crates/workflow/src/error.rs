//! Workflow error taxonomy.
//!
//! Transport errors are converted into [`ServiceError`] at the component that
//! issued the request; nothing from `reqwest` crosses into the state machine.

use thiserror::Error;

use userdesk_core::PersonId;
use userdesk_profiles::MissingField;
use userdesk_session::SessionError;

/// A failure talking to one of the backing services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status and (usually) a
    /// validation message worth showing to the user.
    #[error("service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

fn missing_list(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors surfaced by the reconciliation controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// No credential present; the workflow cannot start.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Required fields missing at submission; reported inline, no network
    /// call was made.
    #[error("required fields missing: {}", missing_list(.0))]
    Validation(Vec<MissingField>),

    /// Fetching the subject's records failed while opening the workflow.
    #[error("failed to load subject records: {0}")]
    Load(ServiceError),

    /// Person create/update rejected; the address step was not attempted.
    #[error("person save failed: {0}")]
    PersonSave(ServiceError),

    /// Address upsert rejected after the person save succeeded. The person
    /// change is persisted and not rolled back; the retained identifier
    /// allows a manual retry of the address step.
    #[error("address save failed after person {person_id} was saved: {source}")]
    AddressSave {
        person_id: PersonId,
        source: ServiceError,
    },

    /// Submission attempted outside the `Ready` state.
    #[error("submit is only valid from the Ready state")]
    NotReady,
}
