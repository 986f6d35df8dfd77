use serde::{Deserialize, Serialize};

/// Which provider produced a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Country-specific primary-market provider.
    Primary,
    /// Global fallback provider.
    Secondary,
}

/// Ephemeral locality data resolved from a postal code.
///
/// Consumed once to populate address fields and then discarded; never
/// persisted. Absent fields mean the provider had nothing to say and the
/// corresponding address field must be left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub source: ProviderKind,
}

impl LookupOutcome {
    pub fn empty(source: ProviderKind) -> Self {
        Self {
            district: None,
            city: None,
            state: None,
            country: None,
            source,
        }
    }
}
