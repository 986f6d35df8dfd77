//! Provider chain: primary-market provider first, global fallback second.

use thiserror::Error;

use crate::country::is_primary_market;
use crate::outcome::LookupOutcome;

/// Postal codes shorter than this are not worth a provider round trip;
/// typical codes run 4–6 characters.
pub const MIN_TRIGGER_LEN: usize = 4;

/// Trigger policy: attempt a lookup only once the typed code is complete
/// enough. Every subsequent edit re-triggers, superseding in-flight lookups
/// (supersession is enforced by the form state, not here).
pub fn should_trigger(postal_code: &str) -> bool {
    postal_code.trim().len() >= MIN_TRIGGER_LEN
}

/// A single provider failure. Callers treat any of these as "no match";
/// nothing here is fatal to the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Lookup failed end to end: both providers errored or found no match.
/// Non-fatal; address fields are left as last-known-good and the user may
/// fill them manually.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("postal lookup unavailable")]
    Unavailable,
}

/// A postal locality provider.
///
/// `Ok(None)` means the provider answered but had no match for the code;
/// `Err` means the attempt itself failed. The chain treats both the same.
#[allow(async_fn_in_trait)]
pub trait PostalProvider {
    async fn resolve(
        &self,
        postal_code: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<LookupOutcome>, ProviderError>;
}

/// The fallback chain the form consults.
pub struct LookupChain<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> LookupChain<P, S>
where
    P: PostalProvider,
    S: PostalProvider,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Resolve locality data for a postal code.
    ///
    /// The primary provider is consulted only when the country hint names the
    /// primary market. Its failure or no-match falls through to the global
    /// provider; only when both come up empty is the lookup reported
    /// unavailable.
    pub async fn lookup(
        &self,
        postal_code: &str,
        country_hint: Option<&str>,
    ) -> Result<LookupOutcome, LookupError> {
        if is_primary_market(country_hint) {
            match self.primary.resolve(postal_code, country_hint).await {
                Ok(Some(outcome)) => {
                    tracing::debug!(code = postal_code, "primary provider matched");
                    return Ok(outcome);
                }
                Ok(None) => {
                    tracing::debug!(code = postal_code, "primary provider had no match");
                }
                Err(e) => {
                    tracing::warn!(code = postal_code, error = %e, "primary provider failed, falling back");
                }
            }
        }

        match self.secondary.resolve(postal_code, country_hint).await {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => {
                tracing::debug!(code = postal_code, "secondary provider had no match");
                Err(LookupError::Unavailable)
            }
            Err(e) => {
                tracing::warn!(code = postal_code, error = %e, "secondary provider failed");
                Err(LookupError::Unavailable)
            }
        }
    }
}
