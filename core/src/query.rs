//! Resource query translation.
//!
//! # Design
//! `translate_list` is a pure function from a `ListRequest` and the resource
//! table to a `QuerySpec`. Parameters are collected into a `BTreeMap`, so the
//! same input always yields the same value, key order included.
//!
//! Precedence, lowest first: pagination, sort, filter projections, metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OperationError;
use crate::resource::{ResourceTable, META_KEYS};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Pagination {
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
        }
    }

    fn page(&self) -> u32 {
        self.current.unwrap_or(DEFAULT_PAGE).max(1)
    }

    fn limit(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub field: String,
    pub order: SortOrder,
}

impl SortDirective {
    pub fn new(field: &str, order: SortOrder) -> Self {
        Self {
            field: field.to_string(),
            order,
        }
    }
}

/// Comparison operator of a filter predicate. The backend only understands
/// parameter equality and free-text search, so the translator projects by
/// field name and leaves the operator to the backend's interpretation.
/// `In` values travel as one comma-joined parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    In,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterPredicate {
    pub fn new(field: &str, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    pub fn contains(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Contains, value)
    }
}

/// Logical request for one page of records of a resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListRequest {
    pub resource: String,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sorters: Vec<SortDirective>,
    #[serde(default)]
    pub filters: Vec<FilterPredicate>,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

impl ListRequest {
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            ..Self::default()
        }
    }

    pub fn page(mut self, current: u32, page_size: u32) -> Self {
        self.pagination = Some(Pagination::new(current, page_size));
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sorters.push(SortDirective::new(field, order));
        self
    }

    pub fn filter(mut self, predicate: FilterPredicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

/// Network-request shape derived from a `ListRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
}

impl QuerySpec {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.params.into_iter().collect()
    }
}

/// Render a JSON value as a query-parameter value. A non-empty array of
/// scalars is joined with `,`; objects, null and nested arrays are skipped.
fn scalar_param(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Value::Array(_) => None,
                item => scalar_param(item),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Translate a list request into endpoint and query parameters.
pub fn translate_list(
    table: &ResourceTable,
    request: &ListRequest,
) -> Result<QuerySpec, OperationError> {
    let decl = table
        .get(&request.resource)
        .ok_or_else(|| OperationError::unknown_resource(&request.resource))?;
    let endpoint = decl.endpoint().to_string();

    let pagination = request.pagination.unwrap_or_default();
    let mut params = BTreeMap::new();
    params.insert("page".to_string(), pagination.page().to_string());
    params.insert("limit".to_string(), pagination.limit().to_string());

    if !request.sorters.is_empty() {
        let fields: Vec<&str> = request.sorters.iter().map(|s| s.field.as_str()).collect();
        let orders: Vec<&str> = request.sorters.iter().map(|s| s.order.as_str()).collect();
        params.insert("sort".to_string(), fields.join(","));
        params.insert("order".to_string(), orders.join(","));
    }

    for predicate in &request.filters {
        let Some(param) = decl.param_for(&predicate.field) else {
            log::debug!(
                "{}: skipping undeclared filter field `{}`",
                request.resource,
                predicate.field
            );
            continue;
        };
        if let Some(value) = scalar_param(&predicate.value) {
            params.insert(param.to_string(), value);
        }
    }

    for key in META_KEYS {
        if let Some(value) = request.meta.get(*key).and_then(scalar_param) {
            params.insert((*key).to_string(), value);
        }
    }

    Ok(QuerySpec { endpoint, params })
}

/// Endpoint of a declared resource.
pub fn resource_endpoint(table: &ResourceTable, resource: &str) -> Result<String, OperationError> {
    table
        .get(resource)
        .map(|decl| decl.endpoint().to_string())
        .ok_or_else(|| OperationError::unknown_resource(resource))
}

/// Endpoint of a single record: the resource endpoint plus `/{id}`.
pub fn record_endpoint(
    table: &ResourceTable,
    resource: &str,
    id: &str,
) -> Result<String, OperationError> {
    let endpoint = resource_endpoint(table, resource)?;
    Ok(format!("{endpoint}/{id}"))
}
