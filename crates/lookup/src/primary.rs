//! Primary-market provider: India's pincode directory.
//!
//! Response shape: a one-element array of envelopes, each with a `Status`
//! string and an optional `PostOffice` list.

use serde::Deserialize;

use crate::chain::{PostalProvider, ProviderError};
use crate::outcome::{LookupOutcome, ProviderKind};

/// Canonical state name forced by the correction rule below.
const CORRECTED_STATE: &str = "Telangana";

/// Postal codes with this prefix belong to the corrected region.
const CORRECTED_PREFIX: &str = "50";

#[derive(Debug, Deserialize)]
struct PincodeEnvelope {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice")]
    post_office: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "Block", default)]
    block: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "Circle", default)]
    circle: Option<String>,
    #[serde(rename = "Region", default)]
    region: Option<String>,
    #[serde(rename = "Country", default)]
    country: Option<String>,
}

/// The provider's directory reports stale state names for the Hyderabad
/// region; force the canonical state when the circle, region, or code prefix
/// identifies it.
fn corrected_state(po: &PostOffice, postal_code: &str) -> Option<String> {
    let circle_hit = po
        .circle
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains("telangana"));
    let region_hit = po
        .region
        .as_deref()
        .is_some_and(|r| r.to_lowercase().contains("hyderabad"));

    if circle_hit || region_hit || postal_code.starts_with(CORRECTED_PREFIX) {
        Some(CORRECTED_STATE.to_string())
    } else {
        po.state.clone()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn outcome_from_post_office(po: &PostOffice, postal_code: &str) -> LookupOutcome {
    // City preference: administrative block, then office name, then district.
    let city = non_empty(&po.block)
        .or_else(|| non_empty(&po.name))
        .or_else(|| non_empty(&po.district));

    LookupOutcome {
        district: non_empty(&po.district),
        city,
        state: corrected_state(po, postal_code),
        country: non_empty(&po.country),
        source: ProviderKind::Primary,
    }
}

/// HTTP client for the primary pincode provider.
pub struct PinLookupClient {
    base_url: String,
    http: reqwest::Client,
}

impl PinLookupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl PostalProvider for PinLookupClient {
    async fn resolve(
        &self,
        postal_code: &str,
        _country_hint: Option<&str>,
    ) -> Result<Option<LookupOutcome>, ProviderError> {
        let url = format!("{}/pincode/{}", self.base_url, postal_code);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let envelopes: Vec<PincodeEnvelope> = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let Some(envelope) = envelopes.first() else {
            return Ok(None);
        };
        if !envelope.status.eq_ignore_ascii_case("success") {
            return Ok(None);
        }
        let Some(po) = envelope.post_office.as_ref().and_then(|v| v.first()) else {
            return Ok(None);
        };

        Ok(Some(outcome_from_post_office(po, postal_code)))
    }
}
