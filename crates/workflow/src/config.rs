//! Client configuration: where the portal API and the lookup providers live.

use userdesk_lookup::{GeoLookupClient, LookupChain, PinLookupClient};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_PIN_LOOKUP_URL: &str = "https://api.postalpincode.in";
const DEFAULT_GEO_LOOKUP_URL: &str = "https://api.zippopotam.us";

/// Base URLs for everything the workflow talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_url: String,
    pub pin_lookup_url: String,
    pub geo_lookup_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pin_lookup_url: DEFAULT_PIN_LOOKUP_URL.to_string(),
            geo_lookup_url: DEFAULT_GEO_LOOKUP_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env_or("USERDESK_API_URL", defaults.api_url),
            pin_lookup_url: env_or("USERDESK_PIN_LOOKUP_URL", defaults.pin_lookup_url),
            geo_lookup_url: env_or("USERDESK_GEO_LOOKUP_URL", defaults.geo_lookup_url),
        }
    }

    /// Build the postal lookup chain against the configured providers.
    pub fn lookup_chain(&self) -> LookupChain<PinLookupClient, GeoLookupClient> {
        LookupChain::new(
            PinLookupClient::new(self.pin_lookup_url.clone()),
            GeoLookupClient::new(self.geo_lookup_url.clone()),
        )
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        tracing::debug!(key, %default, "env var not set; using default");
        default
    })
}
