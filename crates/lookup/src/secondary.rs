//! Secondary global provider, keyed by ISO country code and postal code.

use serde::Deserialize;

use crate::chain::{PostalProvider, ProviderError};
use crate::country::iso_code;
use crate::outcome::{LookupOutcome, ProviderKind};

#[derive(Debug, Deserialize)]
struct ZipResponse {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    places: Vec<ZipPlace>,
}

#[derive(Debug, Deserialize)]
struct ZipPlace {
    #[serde(rename = "place name", default)]
    place_name: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// HTTP client for the global place/state provider.
pub struct GeoLookupClient {
    base_url: String,
    http: reqwest::Client,
}

impl GeoLookupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl PostalProvider for GeoLookupClient {
    async fn resolve(
        &self,
        postal_code: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<LookupOutcome>, ProviderError> {
        let code = iso_code(country_hint);
        let url = format!("{}/{}/{}", self.base_url, code, postal_code);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        // The provider answers unknown codes with 404; that is a clean
        // no-match, not a failure.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body: ZipResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let Some(place) = body.places.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(LookupOutcome {
            district: None,
            city: non_empty(place.place_name),
            state: non_empty(place.state),
            country: non_empty(body.country),
            source: ProviderKind::Secondary,
        }))
    }
}
