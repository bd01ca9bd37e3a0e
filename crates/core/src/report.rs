//! Comparison report extraction
//!
//! The baseline comparison endpoint answers with an HTML page meant for
//! humans. The machine-readable report sits in a
//! `<script id="dronejson" type="text/plain">` element as base64-encoded JSON.

use base64::Engine;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

const HTML_MARKER: &str = "<html";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Expected HTML response but received different format")]
    NotHtml,

    #[error("Could not find comparison report data in the HTML response")]
    MissingDataIsland,

    #[error("Failed to decode base64 report data: {0}")]
    Base64(String),

    #[error("Failed to decode report data as UTF-8: {0}")]
    Utf8(String),

    #[error("Failed to parse report data as JSON: {0}")]
    Json(String),
}

/// Structured result of a comparison report call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_json: Option<Value>,
}

const DATA_ISLAND: &str =
    r#"(?s)<script\s+id\s*=\s*"dronejson"\s+type\s*=\s*"text/plain"\s*>(.*?)</script>"#;

fn data_island_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATA_ISLAND).unwrap())
}

/// Extract the comparison report embedded in an HTML page
pub fn extract_report(
    html: &str,
    endpoint_id: &str,
    task_id: &str,
) -> Result<ComparisonReport, ReportError> {
    let report_json = decode_data_island(html)?;

    Ok(ComparisonReport {
        success: true,
        message: format!(
            "Comparison report retrieved successfully for endpoint {endpoint_id} and task {task_id}"
        ),
        report_json: Some(report_json),
    })
}

/// Same as [`extract_report`] for a body that may not be text at all
pub fn extract_report_from_value(
    body: &Value,
    endpoint_id: &str,
    task_id: &str,
) -> Result<ComparisonReport, ReportError> {
    match body {
        Value::String(html) => extract_report(html, endpoint_id, task_id),
        _ => Err(ReportError::NotHtml),
    }
}

fn decode_data_island(html: &str) -> Result<Value, ReportError> {
    if !html.contains(HTML_MARKER) {
        return Err(ReportError::NotHtml);
    }

    let encoded = data_island_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or(ReportError::MissingDataIsland)?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ReportError::Base64(e.to_string()))?;

    let text = String::from_utf8(bytes).map_err(|e| ReportError::Utf8(e.to_string()))?;

    serde_json::from_str(&text).map_err(|e| ReportError::Json(e.to_string()))
}
