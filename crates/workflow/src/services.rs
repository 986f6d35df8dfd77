//! Service seams for the person and address backends.
//!
//! The controller is generic over these traits; production wires in the
//! `reqwest`-backed implementations from [`crate::http`], tests wire in
//! in-memory fakes. Role-distinguished operations are separate methods so the
//! endpoint/verb choice is visible at the call site.

use userdesk_core::{AddressId, PersonId};
use userdesk_profiles::{Address, Person, RegisterPayload};

use crate::error::ServiceError;

/// Person read/write operations.
#[allow(async_fn_in_trait)]
pub trait PersonService {
    /// Read the acting identity's own record.
    async fn fetch_self(&self, token: &str) -> Result<Person, ServiceError>;

    /// Read a subject's record by identifier.
    async fn fetch(&self, token: &str, subject: PersonId) -> Result<Person, ServiceError>;

    /// Create a new person record (Add mode). Returns the created record,
    /// including the newly issued identifier.
    async fn register(&self, payload: &RegisterPayload) -> Result<Person, ServiceError>;

    /// Self-service partial update of the actor's own record.
    async fn update_self(&self, token: &str, person: &Person) -> Result<Person, ServiceError>;

    /// Administrator-scoped full replace of another subject's record.
    async fn replace(
        &self,
        token: &str,
        subject: PersonId,
        person: &Person,
    ) -> Result<Person, ServiceError>;
}

/// Address read/write operations.
#[allow(async_fn_in_trait)]
pub trait AddressService {
    /// Addresses owned by the given person. Callers take the first entry as
    /// the working address (single-address assumption).
    async fn list_for(&self, token: &str, owner: PersonId) -> Result<Vec<Address>, ServiceError>;

    /// Create a new address; the draft must carry its owner reference.
    async fn create(&self, token: &str, address: &Address) -> Result<Address, ServiceError>;

    /// Self-service full replace.
    async fn replace(
        &self,
        token: &str,
        id: AddressId,
        address: &Address,
    ) -> Result<Address, ServiceError>;

    /// Administrator-scoped full replace.
    async fn replace_admin(
        &self,
        token: &str,
        id: AddressId,
        address: &Address,
    ) -> Result<Address, ServiceError>;
}
