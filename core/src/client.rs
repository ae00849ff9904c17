//! Stateless HTTP request builder and response parser for fleet resources.
//!
//! # Design
//! `ResourceClient` holds only the API root and the resource table and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller (or `DataProvider`) executes the
//! round-trip in between.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::OperationError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{self, ListResult};
use crate::query::{self, ListRequest};
use crate::resource::ResourceTable;

pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";

/// Caller-chosen token that lets the backend deduplicate repeated creates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn encode_body<V: Serialize>(variables: &V) -> Result<String, OperationError> {
    serde_json::to_string(variables)
        .map_err(|e| OperationError::no_response(format!("Request could not be encoded: {e}")))
}

/// Synchronous, stateless client for the fleet backend.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    base_url: String,
    resources: ResourceTable,
}

impl ResourceClient {
    pub fn new(base_url: &str, resources: ResourceTable) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resources,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    pub fn build_list(&self, request: &ListRequest) -> Result<HttpRequest, OperationError> {
        let spec = query::translate_list(&self.resources, request)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: self.url(&spec.endpoint),
            query: spec.into_pairs(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_one(
        &self,
        resource: &str,
        id: impl fmt::Display,
    ) -> Result<HttpRequest, OperationError> {
        let endpoint = query::record_endpoint(&self.resources, resource, &id.to_string())?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: self.url(&endpoint),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Variables are sent as-is: no renaming, no defaults.
    pub fn build_create<V: Serialize>(
        &self,
        resource: &str,
        variables: &V,
        key: Option<&IdempotencyKey>,
    ) -> Result<HttpRequest, OperationError> {
        let endpoint = query::resource_endpoint(&self.resources, resource)?;
        let mut headers = json_headers();
        if let Some(key) = key {
            headers.push((IDEMPOTENCY_HEADER.to_string(), key.to_string()));
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(&endpoint),
            query: Vec::new(),
            headers,
            body: Some(encode_body(variables)?),
        })
    }

    pub fn build_update<V: Serialize>(
        &self,
        resource: &str,
        id: impl fmt::Display,
        variables: &V,
    ) -> Result<HttpRequest, OperationError> {
        let endpoint = query::record_endpoint(&self.resources, resource, &id.to_string())?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: self.url(&endpoint),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(encode_body(variables)?),
        })
    }

    pub fn build_delete(
        &self,
        resource: &str,
        id: impl fmt::Display,
    ) -> Result<HttpRequest, OperationError> {
        let endpoint = query::record_endpoint(&self.resources, resource, &id.to_string())?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(&endpoint),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn parse_list<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ListResult<T>, OperationError> {
        normalize::parse_list(&response)
    }

    pub fn parse_get_one<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Option<T>, OperationError> {
        normalize::parse_record(&response)
    }

    /// A successful create must report the record it created.
    pub fn parse_create<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, OperationError> {
        normalize::parse_record(&response)?.ok_or_else(|| {
            OperationError::new("Response did not include the created record", response.status)
        })
    }

    pub fn parse_update<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, OperationError> {
        normalize::parse_record(&response)?.ok_or_else(|| {
            OperationError::new("Response did not include the updated record", response.status)
        })
    }

    pub fn parse_delete<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Option<T>, OperationError> {
        normalize::parse_record(&response)
    }
}
