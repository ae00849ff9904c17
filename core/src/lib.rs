//! Data-access core for the fleet dashboard.
//!
//! # Overview
//! Turns declarative list/get-one/create/update/delete requests into
//! `HttpRequest` values and turns `HttpResponse` values into typed results or
//! a single classified `OperationError`.
//!
//! # Design
//! - `query` translates a `ListRequest` into endpoint + query parameters
//!   using the injected `ResourceTable`. Pure.
//! - `normalize` parses each body once and derives page contents and total
//!   from the same value.
//! - `ResourceClient` splits every operation into `build_*` and `parse_*`, so
//!   the I/O boundary is explicit.
//! - `DataProvider` pairs the client with a `Transport` and is the surface
//!   views depend on. One round-trip per call, no retries.
//! - `UreqTransport` (feature `ureq-transport`) is the stock blocking
//!   transport.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod resource;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use client::{IdempotencyKey, ResourceClient};
pub use config::ClientConfig;
pub use error::{ConfigError, OperationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::ListResult;
pub use provider::{DataProvider, Transport};
pub use query::{
    FilterOperator, FilterPredicate, ListRequest, Pagination, QuerySpec, SortDirective, SortOrder,
};
pub use resource::{ResourceDecl, ResourceTable};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{Acp, CreateAcp, CreateMission, Mission, MissionStatus, MissionWindow, User, UserRole};
