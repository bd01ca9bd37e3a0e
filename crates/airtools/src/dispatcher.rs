//! Operation dispatcher
//!
//! The one place requests are sent and responses interpreted. Everything else
//! builds an [`OperationRequest`] and gets back an [`OperationResult`] or a
//! typed [`OperationError`].

use airtools_core::normalize::{normalize_outcome, OperationResult};
use airtools_core::pagination::{into_list_page, ListPage};
use airtools_core::reference::{find_id_by_name, Reference, ReferenceError};
use airtools_core::report::{extract_report_from_value, ComparisonReport};
use airtools_core::request::{Credentials, OperationRequest};
use airtools_core::resources::{comparison_report_request, lookup_request, Resource};
use airtools_core::OperationError;
use serde_json::Value;

use crate::resolve::resolve_reference;
use crate::transport::HttpTransport;

const REPORT_OPERATION: &str = "get comparison report";

#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: HttpTransport,
}

impl Dispatcher {
    pub fn new(credentials: Credentials) -> Result<Self, crate::error::Error> {
        Ok(Self {
            transport: HttpTransport::new(credentials)?,
        })
    }

    /// Send one request and normalize the response
    pub async fn call(&self, operation: &str, request: &OperationRequest) -> OperationResult {
        let result = normalize_outcome(self.transport.send(request).await);

        match &result {
            OperationResult::Success { .. } => {}
            OperationResult::ApiError { messages, status } => {
                log::warn!(
                    "{operation} failed with status {status}: {}",
                    messages.join("; ")
                );
            }
            OperationResult::TransportError { message, .. } => {
                log::warn!("{operation} did not get a response: {message}");
            }
        }

        result
    }

    /// Send one request and return its payload
    pub async fn execute(
        &self,
        operation: &str,
        request: &OperationRequest,
    ) -> Result<Value, OperationError> {
        self.call(operation, request).await.into_result(operation)
    }

    /// Send a listing request and attach pagination metadata
    pub async fn list(
        &self,
        operation: &str,
        request: &OperationRequest,
        strip_descriptors: bool,
    ) -> Result<ListPage, OperationError> {
        let payload = self.execute(operation, request).await?;
        Ok(into_list_page(&payload, strip_descriptors))
    }

    /// Find the id of a resource by its display name
    pub async fn lookup_by_name(
        &self,
        resource: Resource,
        name: &str,
        organization_id: Option<&str>,
    ) -> Result<Option<String>, OperationError> {
        let operation = format!("list {}", resource.plural());
        let request = lookup_request(resource, name, organization_id);
        let page = self.list(&operation, &request, true).await?;

        Ok(find_id_by_name(&page.entities, name))
    }

    /// Resolve a reference to a canonical id, looking names up when needed
    pub async fn resolve(
        &self,
        resource: Resource,
        reference: &Reference,
        organization_id: Option<&str>,
    ) -> Result<String, ReferenceError> {
        resolve_reference(resource.field(), reference, |name| async move {
            self.lookup_by_name(resource, &name, organization_id).await
        })
        .await
    }

    /// Fetch the baseline comparison report for an endpoint and task
    pub async fn comparison_report(
        &self,
        endpoint: &Reference,
        task: &Reference,
        organization_id: Option<&str>,
    ) -> Result<ComparisonReport, OperationError> {
        let endpoint_id = self
            .resolve(Resource::Asset, endpoint, organization_id)
            .await
            .map_err(|e| OperationError::reference(REPORT_OPERATION, e))?;
        let task_id = self
            .resolve(Resource::Task, task, organization_id)
            .await
            .map_err(|e| OperationError::reference(REPORT_OPERATION, e))?;

        let request = comparison_report_request(&endpoint_id, &task_id);
        let body = self.execute(REPORT_OPERATION, &request).await?;

        extract_report_from_value(&body, &endpoint_id, &task_id)
            .map_err(|e| OperationError::report(REPORT_OPERATION, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airtools_core::report::ReportError;
    use airtools_core::request::Method;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPORT_PAGE: &str = concat!(
        "<html><body>",
        r#"<script id="dronejson" type="text/plain">eyJhIjoxfQ==</script>"#,
        "</body></html>"
    );

    fn dispatcher_for(server: &MockServer) -> Dispatcher {
        Dispatcher::new(Credentials::new(&server.uri(), "test-token").unwrap()).unwrap()
    }

    fn organizations_page() -> Value {
        json!({
            "success": true,
            "result": {
                "entities": [
                    {"_id": 0, "name": "Default Organization"},
                    {"_id": 42, "name": "Acme"}
                ],
                "totalEntityCount": 2,
                "currentPage": 1,
                "pageSize": 100,
                "previousPage": null,
                "totalPageCount": 1,
                "nextPage": null,
                "sortables": ["name"],
                "filters": []
            },
            "statusCode": 200,
            "errors": []
        })
    }

    // ============================================================================
    // call / execute / list
    // ============================================================================

    #[tokio::test]
    async fn test_call_success() {
        let server = MockServer::start().await;
        let body = json!({"success": true, "result": {"_id": "C-1"}});
        Mock::given(method("GET"))
            .and(path("/api/public/cases/C-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = dispatcher_for(&server)
            .call("get case", &OperationRequest::get("/api/public/cases/C-1"))
            .await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_execute_reports_success_false_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": ["Case is locked"],
                "statusCode": 409
            })))
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .execute(
                "delete case",
                &OperationRequest::new(Method::Delete, "/api/public/cases/C-1"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to delete case: Case is locked");
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn test_execute_reports_error_status_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": ["name should not be empty", "ownerUserId must be a string"]
            })))
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .execute(
                "create case",
                &OperationRequest::new(Method::Post, "/api/public/cases").with_body(json!({})),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to create case: name should not be empty; ownerUserId must be a string"
        );
    }

    #[tokio::test]
    async fn test_list_attaches_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organizations_page()))
            .mount(&server)
            .await;

        let page = dispatcher_for(&server)
            .list(
                "list organizations",
                &OperationRequest::get("/api/public/organizations"),
                false,
            )
            .await
            .unwrap();

        assert_eq!(page.entities.len(), 2);
        let info = page.pagination.unwrap();
        assert_eq!(info.total_entity_count, 2);
        assert_eq!(info.sortables, Some(json!(["name"])));
    }

    #[tokio::test]
    async fn test_list_bare_array_has_no_pagination() {
        let server = MockServer::start().await;
        let body = json!({"success": true, "result": [{"_id": "t1"}]});
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let page = dispatcher_for(&server)
            .list("list tags", &OperationRequest::get("/api/public/tags"), true)
            .await
            .unwrap();
        assert_eq!(page.entities.len(), 1);
        assert!(page.pagination.is_none());
    }

    // ============================================================================
    // Reference resolution
    // ============================================================================

    #[tokio::test]
    async fn test_resolve_by_name_issues_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/organizations"))
            .and(query_param("filter[name]", "Acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organizations_page()))
            .expect(1)
            .mount(&server)
            .await;

        let id = dispatcher_for(&server)
            .resolve(
                Resource::Organization,
                &Reference::ByName("Acme".to_string()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(id, "42");
    }

    #[tokio::test]
    async fn test_resolve_by_id_issues_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let id = dispatcher_for(&server)
            .resolve(Resource::Case, &Reference::ById("C-1".to_string()), None)
            .await
            .unwrap();
        assert_eq!(id, "C-1");
    }

    #[tokio::test]
    async fn test_resolve_passes_organization_explicitly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/assets"))
            .and(query_param("filter[organizationIds]", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {
                    "entities": [{"_id": "asset-1", "name": "host-01"}],
                    "totalEntityCount": 1,
                    "currentPage": 1,
                    "pageSize": 100,
                    "totalPageCount": 1
                }
            })))
            .mount(&server)
            .await;

        let id = dispatcher_for(&server)
            .resolve(
                Resource::Asset,
                &Reference::ByName("host-01".to_string()),
                Some("42"),
            )
            .await
            .unwrap();
        assert_eq!(id, "asset-1");
    }

    #[tokio::test]
    async fn test_resolve_lookup_failure_names_field_and_cause() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .resolve(
                Resource::Organization,
                &Reference::ByName("Acme".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Organization ID: Failed to list organizations: Unauthorized"
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_name_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organizations_page()))
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .resolve(
                Resource::Organization,
                &Reference::ByName("Globex".to_string()),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReferenceError::NotFound { .. }));
    }

    // ============================================================================
    // Comparison report
    // ============================================================================

    #[tokio::test]
    async fn test_comparison_report_extracts_data_island() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/baseline/comparison/report/ep-1/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(REPORT_PAGE, "text/html"))
            .mount(&server)
            .await;

        let report = dispatcher_for(&server)
            .comparison_report(
                &Reference::ById("ep-1".to_string()),
                &Reference::ById("task-1".to_string()),
                None,
            )
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.report_json, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_comparison_report_rejects_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"success":true}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .comparison_report(
                &Reference::ById("ep-1".to_string()),
                &Reference::ById("task-1".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            OperationError::report(REPORT_OPERATION, ReportError::NotHtml)
        );
    }

    #[tokio::test]
    async fn test_comparison_report_keeps_error_status_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/baseline/comparison/report/ep-1/task-1"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": ["Task not found"]})),
            )
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .comparison_report(
                &Reference::ById("ep-1".to_string()),
                &Reference::ById("task-1".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            OperationError::Api {
                operation: REPORT_OPERATION.to_string(),
                messages: vec!["Task not found".to_string()],
                status: 404,
            }
        );
        assert_eq!(
            err.to_string(),
            "Failed to get comparison report: Task not found"
        );
    }

    #[tokio::test]
    async fn test_comparison_report_success_false_body_is_api_error() {
        let server = MockServer::start().await;
        let body = json!({
            "success": false,
            "errors": ["Endpoint offline"],
            "statusCode": 409
        });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .comparison_report(
                &Reference::ById("ep-1".to_string()),
                &Reference::ById("task-1".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            OperationError::Api {
                operation: REPORT_OPERATION.to_string(),
                messages: vec!["Endpoint offline".to_string()],
                status: 409,
            }
        );
    }

    #[tokio::test]
    async fn test_comparison_report_fails_fast_on_bad_reference() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let err = dispatcher_for(&server)
            .comparison_report(
                &Reference::ById("not an id!".to_string()),
                &Reference::ById("task-1".to_string()),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OperationError::Reference { .. }));
        assert!(err.to_string().starts_with("Failed to get comparison report: Asset ID"));
    }
}
