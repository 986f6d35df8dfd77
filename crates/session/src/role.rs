use serde::{Deserialize, Serialize};

/// Role of the acting identity.
///
/// The portal only distinguishes ordinary members from administrators; finer
/// grained permissions, if they ever arrive, belong in a policy layer above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Ordinary,
    Administrator,
}

impl ActorRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, ActorRole::Administrator)
    }
}

impl core::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActorRole::Ordinary => f.write_str("ordinary"),
            ActorRole::Administrator => f.write_str("administrator"),
        }
    }
}
