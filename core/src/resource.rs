//! Resource declarations: which resources exist and how their filter fields
//! project onto query parameters.
//!
//! A single `ResourceTable` is built at startup and injected into the
//! translator, so per-resource rules live in one place.

use std::collections::BTreeMap;

/// Metadata keys copied into the query string verbatim.
pub const META_KEYS: &[&str] = &["search", "operatorId", "commanderId"];

/// Declaration of one backend resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDecl {
    endpoint: String,
    projections: BTreeMap<String, String>,
}

impl ResourceDecl {
    /// Declares a resource served at `endpoint` (relative to the API root).
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_matches('/').to_string(),
            projections: BTreeMap::new(),
        }
    }

    /// Maps filter `field` onto query parameter `param`.
    pub fn project(mut self, field: &str, param: &str) -> Self {
        self.projections.insert(field.to_string(), param.to_string());
        self
    }

    /// Maps every field in `fields` onto `param`.
    pub fn project_all(self, fields: &[&str], param: &str) -> Self {
        fields
            .iter()
            .fold(self, |decl, field| decl.project(field, param))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameter for filter `field`, or `None` if undeclared.
    pub fn param_for(&self, field: &str) -> Option<&str> {
        self.projections.get(field).map(String::as_str)
    }
}

/// Mapping from resource name to its declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    resources: BTreeMap<String, ResourceDecl>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, decl: ResourceDecl) -> Self {
        self.resources.insert(name.to_string(), decl);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDecl> {
        self.resources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// The dashboard's resources: platforms, missions and personnel.
    pub fn fleet() -> Self {
        Self::new()
            .with(
                "acps",
                ResourceDecl::new("acps")
                    .project_all(&["search", "name", "serial", "type", "code"], "search")
                    .project("squadron", "squadron"),
            )
            .with(
                "missions",
                ResourceDecl::new("missions")
                    .project_all(&["search", "name"], "search")
                    .project("commander", "commanderId")
                    .project("operator", "operatorId")
                    .project("status", "status"),
            )
            .with(
                "users",
                ResourceDecl::new("users")
                    .project_all(&["search", "name", "email"], "search")
                    .project("role", "role")
                    .project("squadron", "squadron"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_table_declares_dashboard_resources() {
        let table = ResourceTable::fleet();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["acps", "missions", "users"]);
    }

    #[test]
    fn acp_projection_maps_identity_fields_to_search() {
        let table = ResourceTable::fleet();
        let acps = table.get("acps").unwrap();
        for field in ["name", "serial", "type"] {
            assert_eq!(acps.param_for(field), Some("search"), "{field}");
        }
        assert_eq!(acps.param_for("squadron"), Some("squadron"));
        assert_eq!(acps.param_for("description"), None);
    }

    #[test]
    fn endpoint_is_trimmed() {
        let decl = ResourceDecl::new("/missions/");
        assert_eq!(decl.endpoint(), "missions");
    }
}
