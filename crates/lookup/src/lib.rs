//! `userdesk-lookup` — postal-code → locality autofill.
//!
//! Resolves district/city/state/country for a typed postal code through a
//! primary country-specific provider with a secondary global fallback.
//! Provider failures are tolerated: transport and parse errors are converted
//! to "no match" at this boundary and never escape as fatal errors.

pub mod chain;
pub mod country;
pub mod outcome;
pub mod primary;
pub mod secondary;

pub use chain::{LookupChain, LookupError, PostalProvider, ProviderError, should_trigger};
pub use country::{is_primary_market, iso_code};
pub use outcome::{LookupOutcome, ProviderKind};
pub use primary::PinLookupClient;
pub use secondary::GeoLookupClient;
