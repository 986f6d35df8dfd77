//! The reconciliation controller: the workflow's state machine.
//!
//! `Idle → Loading → Ready → Submitting → {Succeeded, Failed}`, with `Ready`
//! re-entrant under field edits. The save protocol is strictly sequential:
//! the person record is resolved first, and only then is the address
//! upserted, carrying the resolved person identifier as its owner reference.
//! An address failure after a successful person save is surfaced as a
//! distinct partial-application error; nothing is rolled back.

use userdesk_core::PersonId;
use userdesk_lookup::{LookupError, LookupOutcome};
use userdesk_profiles::{AddressField, PersonField, RegisterPayload, missing_required};
use userdesk_session::{EditMode, IdentityContext, NavTarget, Session, resolve};

use crate::error::{ServiceError, WorkflowError};
use crate::form::{FormState, LookupTicket, PendingLookup};
use crate::services::{AddressService, PersonService};

/// Where the workflow session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Loading,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

/// Drives one profile–address form session from open to save.
pub struct ReconciliationController<P, A> {
    session: Session,
    ctx: IdentityContext,
    persons: P,
    addresses: A,
    form: FormState,
    phase: WorkflowPhase,
    last_error: Option<WorkflowError>,
}

impl<P, A> ReconciliationController<P, A>
where
    P: PersonService,
    A: AddressService,
{
    /// Open a workflow session: resolve the identity context, then load the
    /// subject's records (Edit) or start empty drafts (Add).
    pub async fn open(
        session: Session,
        nav: &NavTarget,
        persons: P,
        addresses: A,
    ) -> Result<Self, WorkflowError> {
        let ctx = resolve(Some(&session), nav)?;

        let mut controller = Self {
            session,
            ctx,
            persons,
            addresses,
            form: FormState::for_add(),
            phase: WorkflowPhase::Idle,
            last_error: None,
        };
        controller.load().await?;
        Ok(controller)
    }

    async fn load(&mut self) -> Result<(), WorkflowError> {
        self.phase = WorkflowPhase::Loading;

        match self.ctx.mode {
            EditMode::Add => {
                self.form = FormState::for_add();
            }
            EditMode::EditSelf | EditMode::EditOther => {
                let subject = self.subject()?;
                let token = self.session.token();

                let person = if self.ctx.mode == EditMode::EditSelf {
                    self.persons.fetch_self(token).await
                } else {
                    self.persons.fetch(token, subject).await
                }
                .map_err(WorkflowError::Load)?;

                let addresses = self
                    .addresses
                    .list_for(token, subject)
                    .await
                    .map_err(WorkflowError::Load)?;

                self.form = FormState::for_edit(person, addresses);
            }
        }

        self.phase = WorkflowPhase::Ready;
        tracing::debug!(mode = ?self.ctx.mode, "workflow session ready");
        Ok(())
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn context(&self) -> &IdentityContext {
        &self.ctx
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// The error that moved the session into `Failed`, if any.
    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// Edit one person field. A no-op outside `Ready` (each edit is a
    /// self-transition of the `Ready` state).
    pub fn edit_person_field(&mut self, field: PersonField, value: impl Into<String>) {
        if self.phase != WorkflowPhase::Ready {
            tracing::debug!(phase = ?self.phase, "ignoring person edit outside Ready");
            return;
        }
        self.form.set_person_field(field, value);
    }

    /// Edit one address field; editing the postal code past the trigger
    /// threshold hands back a lookup to run.
    pub fn edit_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Option<PendingLookup> {
        if self.phase != WorkflowPhase::Ready {
            tracing::debug!(phase = ?self.phase, "ignoring address edit outside Ready");
            return None;
        }
        self.form.set_address_field(field, value)
    }

    /// Feed a completed lookup attempt back into the form. Stale tickets are
    /// discarded; an unavailable lookup is non-fatal and leaves the fields
    /// untouched for manual entry.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<LookupOutcome, LookupError>,
    ) -> bool {
        match result {
            Ok(outcome) => self.form.apply_lookup(ticket, &outcome),
            Err(LookupError::Unavailable) => {
                self.form.fail_lookup(ticket);
                false
            }
        }
    }

    /// Return a failed session to `Ready` so edits can be retried. The form
    /// keeps whatever was resolved before the failure, including a person
    /// identifier created by a partially applied save.
    pub fn resume_editing(&mut self) {
        if self.phase == WorkflowPhase::Failed {
            self.phase = WorkflowPhase::Ready;
        }
    }

    /// Run the two-phase save protocol.
    ///
    /// Validation failure keeps the session in `Ready` and makes no network
    /// call. Any save failure moves the session to `Failed` with the
    /// corresponding error retained for inspection.
    pub async fn submit(&mut self) -> Result<PersonId, WorkflowError> {
        if self.phase != WorkflowPhase::Ready {
            return Err(WorkflowError::NotReady);
        }

        let missing = missing_required(&self.form.person, &self.form.address);
        if !missing.is_empty() {
            tracing::info!(count = missing.len(), "submission blocked by validation");
            return Err(WorkflowError::Validation(missing));
        }

        self.phase = WorkflowPhase::Submitting;

        // Step 1: resolve the target person identifier.
        let person_id = match self.save_person().await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "person save failed; address step skipped");
                return Err(self.fail(e));
            }
        };
        self.form.person.id = Some(person_id);
        self.form.address.person_id = Some(person_id);

        // Step 2: upsert the address under the resolved owner.
        if let Err(e) = self.save_address(person_id).await {
            tracing::error!(%person_id, error = %e, "address save failed; person change is persisted");
            return Err(self.fail(e));
        }

        self.phase = WorkflowPhase::Succeeded;
        tracing::info!(%person_id, "profile and address saved");
        Ok(person_id)
    }

    fn fail(&mut self, error: WorkflowError) -> WorkflowError {
        self.phase = WorkflowPhase::Failed;
        self.last_error = Some(error.clone());
        error
    }

    fn subject(&self) -> Result<PersonId, WorkflowError> {
        self.ctx.subject.ok_or_else(|| {
            // resolve() guarantees a subject for both edit modes.
            WorkflowError::Load(ServiceError::Parse(
                "identity context has no subject for edit mode".to_string(),
            ))
        })
    }

    async fn save_person(&mut self) -> Result<PersonId, WorkflowError> {
        let token = self.session.token();

        let saved = match self.ctx.mode {
            EditMode::Add => {
                let payload = RegisterPayload::from_draft(&self.form.person);
                self.persons.register(&payload).await
            }
            EditMode::EditSelf => self.persons.update_self(token, &self.form.person).await,
            EditMode::EditOther => {
                let subject = self.subject()?;
                self.persons.replace(token, subject, &self.form.person).await
            }
        }
        .map_err(WorkflowError::PersonSave)?;

        saved
            .id
            .or(self.form.person.id)
            .ok_or_else(|| {
                WorkflowError::PersonSave(ServiceError::Parse(
                    "saved person carries no identifier".to_string(),
                ))
            })
    }

    async fn save_address(&mut self, owner: PersonId) -> Result<(), WorkflowError> {
        let token = self.session.token();

        let result = match self.form.address.id {
            None => self.addresses.create(token, &self.form.address).await,
            Some(id) => {
                if self.ctx.admin_scoped() {
                    self.addresses.replace_admin(token, id, &self.form.address).await
                } else {
                    self.addresses.replace(token, id, &self.form.address).await
                }
            }
        };

        match result {
            Ok(saved) => {
                self.form.address = saved;
                // The service may omit the owner on its response shape.
                self.form.address.person_id.get_or_insert(owner);
                Ok(())
            }
            Err(source) => Err(WorkflowError::AddressSave {
                person_id: owner,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use userdesk_core::AddressId;
    use userdesk_profiles::{Address, MissingField, Person};
    use userdesk_session::ActorRole;

    type CallLog = Rc<RefCell<Vec<String>>>;

    #[derive(Clone)]
    struct FakePersons {
        calls: CallLog,
        stored: Person,
        issue_id: i64,
        fail: bool,
    }

    impl FakePersons {
        fn new(calls: CallLog, stored: Person) -> Self {
            Self {
                calls,
                stored,
                issue_id: 101,
                fail: false,
            }
        }

        fn rejected() -> ServiceError {
            ServiceError::Rejected {
                status: 400,
                message: "email: invalid".to_string(),
            }
        }
    }

    impl PersonService for FakePersons {
        async fn fetch_self(&self, _token: &str) -> Result<Person, ServiceError> {
            self.calls.borrow_mut().push("person.fetch_self".to_string());
            Ok(self.stored.clone())
        }

        async fn fetch(&self, _token: &str, subject: PersonId) -> Result<Person, ServiceError> {
            self.calls.borrow_mut().push(format!("person.fetch {subject}"));
            Ok(self.stored.clone())
        }

        async fn register(&self, payload: &RegisterPayload) -> Result<Person, ServiceError> {
            self.calls
                .borrow_mut()
                .push(format!("person.register {}", payload.email));
            if self.fail {
                return Err(Self::rejected());
            }
            let mut created = Person::draft();
            created.id = Some(PersonId::new(self.issue_id));
            created.email = payload.email.clone();
            created.first_name = payload.first_name.clone();
            created.last_name = payload.last_name.clone();
            created.phone = payload.phone.clone();
            Ok(created)
        }

        async fn update_self(&self, _token: &str, person: &Person) -> Result<Person, ServiceError> {
            self.calls.borrow_mut().push("person.update_self".to_string());
            if self.fail {
                return Err(Self::rejected());
            }
            let mut saved = person.clone();
            saved.id = saved.id.or(self.stored.id);
            Ok(saved)
        }

        async fn replace(
            &self,
            _token: &str,
            subject: PersonId,
            person: &Person,
        ) -> Result<Person, ServiceError> {
            self.calls
                .borrow_mut()
                .push(format!("person.replace {subject}"));
            if self.fail {
                return Err(Self::rejected());
            }
            let mut saved = person.clone();
            saved.id = Some(subject);
            Ok(saved)
        }
    }

    #[derive(Clone)]
    struct FakeAddresses {
        calls: CallLog,
        stored: Vec<Address>,
        issue_id: i64,
        fail_writes: bool,
    }

    impl FakeAddresses {
        fn new(calls: CallLog, stored: Vec<Address>) -> Self {
            Self {
                calls,
                stored,
                issue_id: 7,
                fail_writes: false,
            }
        }
    }

    impl AddressService for FakeAddresses {
        async fn list_for(&self, _token: &str, owner: PersonId) -> Result<Vec<Address>, ServiceError> {
            self.calls
                .borrow_mut()
                .push(format!("address.list_for {owner}"));
            Ok(self.stored.clone())
        }

        async fn create(&self, _token: &str, address: &Address) -> Result<Address, ServiceError> {
            self.calls.borrow_mut().push("address.create".to_string());
            if self.fail_writes {
                return Err(ServiceError::Rejected {
                    status: 400,
                    message: "postal_code: invalid".to_string(),
                });
            }
            let mut saved = address.clone();
            saved.id = Some(AddressId::new(self.issue_id));
            Ok(saved)
        }

        async fn replace(
            &self,
            _token: &str,
            id: AddressId,
            address: &Address,
        ) -> Result<Address, ServiceError> {
            self.calls.borrow_mut().push(format!("address.replace {id}"));
            if self.fail_writes {
                return Err(ServiceError::Rejected {
                    status: 400,
                    message: "postal_code: invalid".to_string(),
                });
            }
            Ok(address.clone())
        }

        async fn replace_admin(
            &self,
            _token: &str,
            id: AddressId,
            address: &Address,
        ) -> Result<Address, ServiceError> {
            self.calls
                .borrow_mut()
                .push(format!("address.replace_admin {id}"));
            if self.fail_writes {
                return Err(ServiceError::Rejected {
                    status: 400,
                    message: "postal_code: invalid".to_string(),
                });
            }
            Ok(address.clone())
        }
    }

    fn ordinary_session(id: i64) -> Session {
        Session::establish("token", PersonId::new(id), ActorRole::Ordinary)
    }

    fn admin_session(id: i64) -> Session {
        Session::establish("token", PersonId::new(id), ActorRole::Administrator)
    }

    fn stored_person(id: i64) -> Person {
        let mut p = Person::draft();
        p.id = Some(PersonId::new(id));
        p.first_name = "Asha".to_string();
        p.last_name = "K".to_string();
        p.email = "asha@example.com".to_string();
        p.phone = "9000000000".to_string();
        p
    }

    fn stored_address(id: i64, owner: i64) -> Address {
        let mut a = Address::draft();
        a.id = Some(AddressId::new(id));
        a.person_id = Some(PersonId::new(owner));
        a.house_flat = "12-3".to_string();
        a.street = "MG Road".to_string();
        a.area = "Gachibowli".to_string();
        a.postal_code = "500081".to_string();
        a
    }

    fn fill_add_form<P: PersonService, A: AddressService>(c: &mut ReconciliationController<P, A>) {
        c.edit_person_field(PersonField::FirstName, "Ravi");
        c.edit_person_field(PersonField::LastName, "S");
        c.edit_person_field(PersonField::Email, "ravi@example.com");
        c.edit_address_field(AddressField::HouseFlat, "4-5");
        c.edit_address_field(AddressField::Street, "Link Road");
        c.edit_address_field(AddressField::Area, "Madhapur");
        c.edit_address_field(AddressField::PostalCode, "500081");
    }

    #[tokio::test]
    async fn add_mode_saves_person_before_address() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), Person::draft());
        let addresses = FakeAddresses::new(calls.clone(), Vec::new());

        let mut c = ReconciliationController::open(
            admin_session(1),
            &NavTarget::add_new(),
            persons,
            addresses,
        )
        .await
        .unwrap();
        assert_eq!(c.phase(), WorkflowPhase::Ready);

        fill_add_form(&mut c);
        let person_id = c.submit().await.unwrap();

        assert_eq!(person_id, PersonId::new(101));
        assert_eq!(c.phase(), WorkflowPhase::Succeeded);
        assert_eq!(
            calls.borrow().as_slice(),
            [
                "person.register ravi@example.com".to_string(),
                "address.create".to_string(),
            ]
        );
        assert_eq!(c.form().person.id, Some(PersonId::new(101)));
        assert_eq!(c.form().address.person_id, Some(PersonId::new(101)));
        assert_eq!(c.form().address.id, Some(AddressId::new(7)));
    }

    #[tokio::test]
    async fn empty_email_blocks_submission_without_network_calls() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), Person::draft());
        let addresses = FakeAddresses::new(calls.clone(), Vec::new());

        let mut c = ReconciliationController::open(
            ordinary_session(5),
            &NavTarget::add_new(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        fill_add_form(&mut c);
        c.edit_person_field(PersonField::Email, "");

        let err = c.submit().await.unwrap_err();
        assert_eq!(err, WorkflowError::Validation(vec![MissingField::Email]));
        assert_eq!(c.phase(), WorkflowPhase::Ready);
        assert!(calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn admin_editing_another_subject_uses_admin_endpoints() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), stored_person(42));
        let addresses = FakeAddresses::new(calls.clone(), vec![stored_address(7, 42)]);

        let mut c = ReconciliationController::open(
            admin_session(1),
            &NavTarget::edit(PersonId::new(42)),
            persons,
            addresses,
        )
        .await
        .unwrap();

        c.submit().await.unwrap();

        assert_eq!(
            calls.borrow().as_slice(),
            [
                "person.fetch 42".to_string(),
                "address.list_for 42".to_string(),
                "person.replace 42".to_string(),
                "address.replace_admin 7".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn self_edit_uses_self_service_endpoints() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), stored_person(5));
        let addresses = FakeAddresses::new(calls.clone(), vec![stored_address(7, 5)]);

        let mut c = ReconciliationController::open(
            ordinary_session(5),
            &NavTarget::self_service(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        c.submit().await.unwrap();

        assert_eq!(
            calls.borrow().as_slice(),
            [
                "person.fetch_self".to_string(),
                "address.list_for 5".to_string(),
                "person.update_self".to_string(),
                "address.replace 7".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn edit_mode_without_stored_address_creates_one() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), stored_person(5));
        let addresses = FakeAddresses::new(calls.clone(), Vec::new());

        let mut c = ReconciliationController::open(
            ordinary_session(5),
            &NavTarget::self_service(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        c.edit_address_field(AddressField::HouseFlat, "4-5");
        c.edit_address_field(AddressField::Street, "Link Road");
        c.edit_address_field(AddressField::Area, "Madhapur");
        c.edit_address_field(AddressField::PostalCode, "500081");

        c.submit().await.unwrap();
        assert!(calls.borrow().contains(&"address.create".to_string()));
        assert_eq!(c.form().address.person_id, Some(PersonId::new(5)));
    }

    #[tokio::test]
    async fn person_failure_skips_the_address_step() {
        let calls: CallLog = Rc::default();
        let mut persons = FakePersons::new(calls.clone(), stored_person(5));
        persons.fail = true;
        let addresses = FakeAddresses::new(calls.clone(), vec![stored_address(7, 5)]);

        let mut c = ReconciliationController::open(
            ordinary_session(5),
            &NavTarget::self_service(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        let err = c.submit().await.unwrap_err();
        assert!(matches!(err, WorkflowError::PersonSave(_)));
        assert_eq!(c.phase(), WorkflowPhase::Failed);

        let log = calls.borrow();
        assert!(log.contains(&"person.update_self".to_string()));
        assert!(!log.iter().any(|c| c.starts_with("address.replace")));
        assert!(!log.contains(&"address.create".to_string()));
        drop(log);

        // Failed submissions are retryable.
        c.resume_editing();
        assert_eq!(c.phase(), WorkflowPhase::Ready);
    }

    #[tokio::test]
    async fn address_failure_retains_the_created_person_id() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), Person::draft());
        let mut addresses = FakeAddresses::new(calls.clone(), Vec::new());
        addresses.fail_writes = true;

        let mut c = ReconciliationController::open(
            admin_session(1),
            &NavTarget::add_new(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        fill_add_form(&mut c);
        let err = c.submit().await.unwrap_err();

        match err {
            WorkflowError::AddressSave { person_id, .. } => {
                assert_eq!(person_id, PersonId::new(101));
            }
            other => panic!("expected AddressSave, got {other:?}"),
        }
        assert_eq!(c.phase(), WorkflowPhase::Failed);
        // The person change is persisted; the id is kept for a manual retry
        // of the address step.
        assert_eq!(c.form().person.id, Some(PersonId::new(101)));
        assert!(c.last_error().is_some());
    }

    #[tokio::test]
    async fn unchanged_edit_round_trips_field_values() {
        let calls: CallLog = Rc::default();
        let person = stored_person(5);
        let address = stored_address(7, 5);
        let persons = FakePersons::new(calls.clone(), person.clone());
        let addresses = FakeAddresses::new(calls.clone(), vec![address.clone()]);

        let mut c = ReconciliationController::open(
            ordinary_session(5),
            &NavTarget::self_service(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        assert_eq!(c.form().person, person);
        assert_eq!(c.form().address, address);

        c.submit().await.unwrap();
        assert_eq!(c.form().person, person);
        assert_eq!(c.form().address, address);
    }

    #[tokio::test]
    async fn submit_is_rejected_outside_ready() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), Person::draft());
        let addresses = FakeAddresses::new(calls.clone(), Vec::new());

        let mut c = ReconciliationController::open(
            admin_session(1),
            &NavTarget::add_new(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        fill_add_form(&mut c);
        c.submit().await.unwrap();
        assert_eq!(c.phase(), WorkflowPhase::Succeeded);

        let err = c.submit().await.unwrap_err();
        assert_eq!(err, WorkflowError::NotReady);
    }

    #[tokio::test]
    async fn edits_are_ignored_after_success() {
        let calls: CallLog = Rc::default();
        let persons = FakePersons::new(calls.clone(), Person::draft());
        let addresses = FakeAddresses::new(calls.clone(), Vec::new());

        let mut c = ReconciliationController::open(
            admin_session(1),
            &NavTarget::add_new(),
            persons,
            addresses,
        )
        .await
        .unwrap();

        fill_add_form(&mut c);
        c.submit().await.unwrap();

        c.edit_person_field(PersonField::FirstName, "Changed");
        assert_eq!(c.form().person.first_name, "Ravi");
        assert!(c.edit_address_field(AddressField::PostalCode, "600001").is_none());
    }
}
