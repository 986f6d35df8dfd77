use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use userdesk_core::PersonId;

use crate::ActorRole;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No credential is present; the workflow cannot proceed and the caller
    /// must redirect to login.
    #[error("not authenticated")]
    Unauthenticated,
}

/// An authenticated session: bearer credential plus a snapshot of who holds it.
///
/// Established at login, cleared at logout. The credential lifecycle itself
/// (issuance, refresh) is handled by the login flow, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    actor_id: PersonId,
    actor_role: ActorRole,
    established_at: DateTime<Utc>,
}

impl Session {
    pub fn establish(token: impl Into<String>, actor_id: PersonId, actor_role: ActorRole) -> Self {
        Self {
            token: token.into(),
            actor_id,
            actor_role,
            established_at: Utc::now(),
        }
    }

    /// Bearer credential attached to authorized requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn actor_id(&self) -> PersonId {
        self.actor_id
    }

    pub fn actor_role(&self) -> ActorRole {
        self.actor_role
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }
}

/// Require an authenticated session, converting absence into the fatal
/// `Unauthenticated` error the caller handles by redirecting to login.
pub fn require(session: Option<&Session>) -> Result<&Session, SessionError> {
    session.ok_or(SessionError::Unauthenticated)
}
