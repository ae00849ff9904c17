//! Operation dispatch surface.
//!
//! `DataProvider` is the one API list, show and create views depend on. It
//! pairs a `ResourceClient` with a `Transport`, does exactly one round-trip
//! per call and never retries.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{IdempotencyKey, ResourceClient};
use crate::config::ClientConfig;
use crate::error::OperationError;
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::{self, ListResult};
use crate::query::ListRequest;
use crate::resource::ResourceTable;

/// Executes one HTTP exchange.
///
/// Non-2xx statuses are returned as `Ok` responses; `Err` is reserved for
/// exchanges that produced no response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OperationError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OperationError> {
        (**self).execute(request)
    }
}

pub struct DataProvider<T> {
    client: ResourceClient,
    transport: T,
    read_only: bool,
}

impl<T: Transport> DataProvider<T> {
    pub fn new(config: &ClientConfig, resources: ResourceTable, transport: T) -> Self {
        Self {
            client: ResourceClient::new(config.api_url(), resources),
            transport,
            read_only: config.is_read_only(),
        }
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    fn dispatch(&self, resource: &str, request: HttpRequest) -> Result<HttpResponse, OperationError> {
        log::debug!("{resource}: {} {}", request.method, request.path);
        let response = self.transport.execute(request).inspect_err(|err| {
            log::warn!("{resource}: transport failed: {err}");
        })?;
        if !response.is_success() {
            let err = normalize::classify_error(&response);
            log::warn!("{resource}: request failed: {err}");
        }
        Ok(response)
    }

    fn ensure_writable(&self, operation: &str) -> Result<(), OperationError> {
        if self.read_only {
            return Err(OperationError::unsupported(operation));
        }
        Ok(())
    }

    pub fn get_list<R: DeserializeOwned>(
        &self,
        request: &ListRequest,
    ) -> Result<ListResult<R>, OperationError> {
        let http = self.client.build_list(request)?;
        let response = self.dispatch(&request.resource, http)?;
        self.client.parse_list(response)
    }

    /// `Ok(None)` when the backend answered successfully without a record.
    pub fn get_one<R: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl fmt::Display,
    ) -> Result<Option<R>, OperationError> {
        let http = self.client.build_get_one(resource, id)?;
        let response = self.dispatch(resource, http)?;
        self.client.parse_get_one(response)
    }

    pub fn create<R: DeserializeOwned, V: Serialize>(
        &self,
        resource: &str,
        variables: &V,
    ) -> Result<R, OperationError> {
        self.create_with(resource, variables, None)
    }

    /// Like `create`, but sends `key` so the backend can drop duplicates when
    /// the caller repeats a create whose outcome it never saw.
    pub fn create_idempotent<R: DeserializeOwned, V: Serialize>(
        &self,
        resource: &str,
        variables: &V,
        key: &IdempotencyKey,
    ) -> Result<R, OperationError> {
        self.create_with(resource, variables, Some(key))
    }

    fn create_with<R: DeserializeOwned, V: Serialize>(
        &self,
        resource: &str,
        variables: &V,
        key: Option<&IdempotencyKey>,
    ) -> Result<R, OperationError> {
        self.ensure_writable("create")?;
        let http = self.client.build_create(resource, variables, key)?;
        let response = self.dispatch(resource, http)?;
        self.client.parse_create(response)
    }

    pub fn update<R: DeserializeOwned, V: Serialize>(
        &self,
        resource: &str,
        id: impl fmt::Display,
        variables: &V,
    ) -> Result<R, OperationError> {
        self.ensure_writable("update")?;
        let http = self.client.build_update(resource, id, variables)?;
        let response = self.dispatch(resource, http)?;
        self.client.parse_update(response)
    }

    pub fn delete_one<R: DeserializeOwned>(
        &self,
        resource: &str,
        id: impl fmt::Display,
    ) -> Result<Option<R>, OperationError> {
        self.ensure_writable("delete")?;
        let http = self.client.build_delete(resource, id)?;
        let response = self.dispatch(resource, http)?;
        self.client.parse_delete(response)
    }
}
