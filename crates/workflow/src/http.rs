//! `reqwest`-backed implementations of the service seams.
//!
//! Every failure is converted here: connection problems become
//! `ServiceError::Network`, non-success statuses become `Rejected` carrying
//! the service's own message, undecodable bodies become `Parse`.

use serde::de::DeserializeOwned;

use userdesk_core::{AddressId, PersonId};
use userdesk_profiles::{Address, Person, RegisterPayload};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::services::{AddressService, PersonService};

fn net_err(e: reqwest::Error) -> ServiceError {
    ServiceError::Network(e.to_string())
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(ServiceError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    resp.json().await.map_err(|e| ServiceError::Parse(e.to_string()))
}

/// Person service over the portal's auth/profile endpoints.
pub struct HttpPersonService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPersonService {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            http: reqwest::Client::new(),
        }
    }
}

impl PersonService for HttpPersonService {
    async fn fetch_self(&self, token: &str) -> Result<Person, ServiceError> {
        let url = format!("{}/api/auth/profile/", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn fetch(&self, token: &str, subject: PersonId) -> Result<Person, ServiceError> {
        let url = format!("{}/api/auth/profile/{}/", self.base_url, subject);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Person, ServiceError> {
        let url = format!("{}/api/auth/register/", self.base_url);
        let resp = self.http.post(&url).json(payload).send().await.map_err(net_err)?;
        decode(resp).await
    }

    async fn update_self(&self, token: &str, person: &Person) -> Result<Person, ServiceError> {
        // The self-service endpoint takes a partial POST.
        let url = format!("{}/api/auth/profile/", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(person)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn replace(
        &self,
        token: &str,
        subject: PersonId,
        person: &Person,
    ) -> Result<Person, ServiceError> {
        // Administrator-scoped full replace.
        let url = format!("{}/api/admin/users/{}/", self.base_url, subject);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(person)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }
}

/// Address service over the portal's address endpoints.
pub struct HttpAddressService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAddressService {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            http: reqwest::Client::new(),
        }
    }
}

impl AddressService for HttpAddressService {
    async fn list_for(&self, token: &str, owner: PersonId) -> Result<Vec<Address>, ServiceError> {
        let url = format!("{}/api/addresses/", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("person", owner.as_i64())])
            .bearer_auth(token)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn create(&self, token: &str, address: &Address) -> Result<Address, ServiceError> {
        let url = format!("{}/api/addresses/", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(address)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn replace(
        &self,
        token: &str,
        id: AddressId,
        address: &Address,
    ) -> Result<Address, ServiceError> {
        let url = format!("{}/api/addresses/{}/", self.base_url, id);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(address)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }

    async fn replace_admin(
        &self,
        token: &str,
        id: AddressId,
        address: &Address,
    ) -> Result<Address, ServiceError> {
        let url = format!("{}/api/admin/addresses/{}/", self.base_url, id);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(address)
            .send()
            .await
            .map_err(net_err)?;
        decode(resp).await
    }
}
