//! Request builders for the resources references can point at
//!
//! Name lookups are list-then-filter round trips against each resource's
//! listing operation. The organization a case, asset or task belongs to is
//! passed in explicitly.

use crate::request::{OperationRequest, QueryParams};

/// Organization used when a dependent lookup has no explicit organization
pub const DEFAULT_ORGANIZATION_ID: &str = "0";

/// Page size for name lookups; names are filtered server-side first
const LOOKUP_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Organization,
    Case,
    Asset,
    Task,
}

impl Resource {
    /// Field name used in resolution errors
    pub fn field(&self) -> &'static str {
        match self {
            Resource::Organization => "Organization ID",
            Resource::Case => "Case ID",
            Resource::Asset => "Asset ID",
            Resource::Task => "Task ID",
        }
    }

    pub fn list_path(&self) -> &'static str {
        match self {
            Resource::Organization => "/api/public/organizations",
            Resource::Case => "/api/public/cases",
            Resource::Asset => "/api/public/assets",
            Resource::Task => "/api/public/tasks",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Resource::Organization => "organizations",
            Resource::Case => "cases",
            Resource::Asset => "assets",
            Resource::Task => "tasks",
        }
    }

    /// Whether listings of this resource are scoped to organizations
    pub fn scoped_to_organization(&self) -> bool {
        !matches!(self, Resource::Organization)
    }
}

/// Listing options shared by every resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub organization_id: Option<String>,
    pub name: Option<String>,
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
}

/// Build the listing request for a resource
pub fn list_request(resource: Resource, options: &ListOptions) -> OperationRequest {
    let mut query = QueryParams::new()
        .push_opt("pageNumber", options.page_number)
        .push_opt("pageSize", options.page_size)
        .push_opt("filter[name]", options.name.as_deref());

    if resource.scoped_to_organization() {
        let organization = options
            .organization_id
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION_ID);
        query = query.push("filter[organizationIds]", organization);
    }

    OperationRequest::get(resource.list_path()).with_query(query)
}

/// Build the name lookup request for a resource
pub fn lookup_request(
    resource: Resource,
    name: &str,
    organization_id: Option<&str>,
) -> OperationRequest {
    list_request(
        resource,
        &ListOptions {
            organization_id: organization_id.map(str::to_string),
            name: Some(name.to_string()),
            page_number: Some(1),
            page_size: Some(LOOKUP_PAGE_SIZE),
        },
    )
}

/// Build the comparison report request; the endpoint answers with HTML
pub fn comparison_report_request(endpoint_id: &str, task_id: &str) -> OperationRequest {
    OperationRequest::get(format!(
        "/api/public/baseline/comparison/report/{endpoint_id}/{task_id}"
    ))
    .expect_html()
}
