//! Identity context resolution.
//!
//! Decides, from the session and navigation parameters, who is acting, whose
//! record is the target, and whether the workflow is creating or editing.

use serde::{Deserialize, Serialize};

use userdesk_core::PersonId;

use crate::{ActorRole, Session, SessionError, session};

/// What the navigation layer handed us when the workflow screen opened.
///
/// An administrator arriving from the user list carries the subject's id; the
/// "add user" action carries the explicit add-new intent; plain self-service
/// editing carries neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTarget {
    /// Externally-supplied target-subject identifier, if any.
    pub subject: Option<PersonId>,
    /// The actor explicitly chose to create a new person record.
    pub add_new: bool,
}

impl NavTarget {
    pub fn self_service() -> Self {
        Self::default()
    }

    pub fn edit(subject: PersonId) -> Self {
        Self {
            subject: Some(subject),
            add_new: false,
        }
    }

    pub fn add_new() -> Self {
        Self {
            subject: None,
            add_new: true,
        }
    }
}

/// Whether the workflow session creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Creating a brand new person record.
    Add,
    /// The actor is editing their own record.
    EditSelf,
    /// An administrator is editing someone else's record.
    EditOther,
}

/// Resolved identity context: who acts, on whom, and how.
///
/// Invariant: if `actor_role` is ordinary, `subject` is either `None` (Add)
/// or the actor's own id. [`resolve`] enforces this defensively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    pub actor_id: PersonId,
    pub actor_role: ActorRole,
    pub subject: Option<PersonId>,
    pub mode: EditMode,
}

impl IdentityContext {
    /// True when the save must go through administrator-scoped endpoints:
    /// a privileged actor operating on a record that is not their own.
    pub fn admin_scoped(&self) -> bool {
        self.mode == EditMode::EditOther
    }
}

/// Resolve the identity context for a workflow session.
///
/// Rules, in order:
/// - no session → `Unauthenticated`;
/// - a supplied subject id → edit that subject, except that an ordinary actor
///   is corrected back to their own record (upstream navigation is expected
///   to guarantee this, but it is not trusted);
/// - no subject + explicit add intent → Add;
/// - otherwise → edit-of-self.
pub fn resolve(
    current: Option<&Session>,
    nav: &NavTarget,
) -> Result<IdentityContext, SessionError> {
    let session = session::require(current)?;
    let actor_id = session.actor_id();
    let actor_role = session.actor_role();

    let ctx = match nav.subject {
        Some(subject) => {
            let subject = if !actor_role.is_admin() && subject != actor_id {
                // Defensive correction: an ordinary actor may never be
                // redirected into editing someone else via this path.
                tracing::warn!(
                    %actor_id,
                    requested = %subject,
                    "ordinary actor supplied a foreign subject id; overriding to self"
                );
                actor_id
            } else {
                subject
            };

            let mode = if subject == actor_id {
                EditMode::EditSelf
            } else {
                EditMode::EditOther
            };

            IdentityContext {
                actor_id,
                actor_role,
                subject: Some(subject),
                mode,
            }
        }
        None if nav.add_new => IdentityContext {
            actor_id,
            actor_role,
            subject: None,
            mode: EditMode::Add,
        },
        None => IdentityContext {
            actor_id,
            actor_role,
            subject: Some(actor_id),
            mode: EditMode::EditSelf,
        },
    };

    tracing::debug!(
        actor = %ctx.actor_id,
        role = %ctx.actor_role,
        mode = ?ctx.mode,
        "resolved identity context"
    );

    Ok(ctx)
}
