//! Pagination metadata extraction
//!
//! Listing operations return either a bare list (`result: [...]`) or a
//! paginated envelope (`result: { entities, totalEntityCount, ... }`). These
//! functions read the envelope; they never fetch further pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page metadata copied from a paginated envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_entity_count: u64,
    pub current_page: u64,
    pub page_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
    pub total_page_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
}

impl PaginationInfo {
    /// Drop the sort and filter descriptors, keeping only page numbers
    pub fn without_descriptors(mut self) -> Self {
        self.sortables = None;
        self.filters = None;
        self
    }

    pub fn has_next_page(&self) -> bool {
        match self.next_page {
            Some(next) => next > self.current_page,
            None => self.current_page < self.total_page_count,
        }
    }
}

/// One page of a listing operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub entities: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
}

/// Read pagination metadata from a success payload.
///
/// Returns `None` for bare lists and for payloads matching neither shape.
pub fn extract_pagination(payload: &Value) -> Option<PaginationInfo> {
    let result = payload.get("result")?;
    if result.is_array() {
        return None;
    }

    let envelope = result.as_object()?;
    let total_entity_count = envelope.get("totalEntityCount").and_then(Value::as_u64)?;

    let number = |key: &str| envelope.get(key).and_then(Value::as_u64);
    let descriptor = |key: &str| envelope.get(key).filter(|v| !v.is_null()).cloned();

    Some(PaginationInfo {
        total_entity_count,
        current_page: number("currentPage").unwrap_or(1),
        page_size: number("pageSize").unwrap_or(0),
        previous_page: number("previousPage"),
        total_page_count: number("totalPageCount").unwrap_or(0),
        next_page: number("nextPage"),
        sortables: descriptor("sortables"),
        filters: descriptor("filters"),
    })
}

/// Entities of a listing payload, whichever shape it uses
pub fn extract_entities(payload: &Value) -> Vec<Value> {
    match payload.get("result") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(envelope)) => envelope
            .get("entities")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Split a listing payload into entities and optional page metadata
pub fn into_list_page(payload: &Value, strip_descriptors: bool) -> ListPage {
    let pagination = extract_pagination(payload).map(|info| {
        if strip_descriptors {
            info.without_descriptors()
        } else {
            info
        }
    });

    ListPage {
        entities: extract_entities(payload),
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_envelope() -> Value {
        json!({
            "success": true,
            "result": {
                "entities": [{"_id": "a"}, {"_id": "b"}],
                "totalEntityCount": 12,
                "currentPage": 2,
                "pageSize": 2,
                "previousPage": 1,
                "totalPageCount": 6,
                "nextPage": 3,
                "sortables": ["name", "createdAt"],
                "filters": [{"name": "name", "type": "string"}]
            },
            "statusCode": 200,
            "errors": []
        })
    }

    #[test]
    fn test_bare_list_has_no_pagination() {
        let payload = json!({"success": true, "result": [{"_id": "1"}]});
        assert_eq!(extract_pagination(&payload), None);
    }

    #[test]
    fn test_envelope_fields_copied_verbatim() {
        let info = extract_pagination(&sample_envelope()).unwrap();

        assert_eq!(info.total_entity_count, 12);
        assert_eq!(info.current_page, 2);
        assert_eq!(info.page_size, 2);
        assert_eq!(info.previous_page, Some(1));
        assert_eq!(info.total_page_count, 6);
        assert_eq!(info.next_page, Some(3));
        assert_eq!(info.sortables, Some(json!(["name", "createdAt"])));
        assert!(info.filters.is_some());
    }

    #[test]
    fn test_envelope_without_total_count_is_not_paginated() {
        let payload = json!({"result": {"entities": [], "pageSize": 10}});
        assert_eq!(extract_pagination(&payload), None);
    }

    #[test]
    fn test_payload_without_result_is_not_paginated() {
        assert_eq!(extract_pagination(&json!({"data": []})), None);
        assert_eq!(extract_pagination(&json!("text")), None);
        assert_eq!(extract_pagination(&Value::Null), None);
    }

    #[test]
    fn test_first_page_has_no_previous_page() {
        let payload = json!({
            "result": {
                "entities": [],
                "totalEntityCount": 0,
                "currentPage": 1,
                "pageSize": 10,
                "previousPage": null,
                "totalPageCount": 0,
                "nextPage": null
            }
        });
        let info = extract_pagination(&payload).unwrap();
        assert_eq!(info.previous_page, None);
        assert_eq!(info.next_page, None);
        assert!(!info.has_next_page());
    }

    #[test]
    fn test_without_descriptors() {
        let info = extract_pagination(&sample_envelope())
            .unwrap()
            .without_descriptors();
        assert_eq!(info.sortables, None);
        assert_eq!(info.filters, None);
        assert_eq!(info.total_entity_count, 12);
    }

    #[test]
    fn test_has_next_page() {
        let info = extract_pagination(&sample_envelope()).unwrap();
        assert!(info.has_next_page());
    }

    #[test]
    fn test_extract_entities_from_both_shapes() {
        assert_eq!(extract_entities(&sample_envelope()).len(), 2);
        assert_eq!(
            extract_entities(&json!({"result": [1, 2, 3]})),
            vec![json!(1), json!(2), json!(3)]
        );
        assert!(extract_entities(&json!({"result": "nope"})).is_empty());
    }

    #[test]
    fn test_into_list_page_strips_descriptors() {
        let page = into_list_page(&sample_envelope(), true);
        let info = page.pagination.unwrap();
        assert_eq!(page.entities.len(), 2);
        assert_eq!(info.sortables, None);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let info = extract_pagination(&sample_envelope())
            .unwrap()
            .without_descriptors();
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["totalEntityCount"], 12);
        assert_eq!(value["currentPage"], 2);
        assert!(value.get("sortables").is_none());
    }
}
