//! Single-shot HTTP transport for the AIR API

use airtools_core::normalize::{RawResponse, TransportFailure, TransportOutcome};
use airtools_core::request::{Accept, Credentials, Method, OperationRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::prelude::*;

/// Sends operation requests with bearer-token auth.
///
/// Non-2xx statuses come back as responses, not errors, so the normalizer
/// can read the error body. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials) -> std::result::Result<Self, Error> {
        let client = create_authenticated_client(&credentials)?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Issue one request and return the raw status and body
    pub async fn send(&self, request: &OperationRequest) -> TransportOutcome {
        let url = self.credentials.url_for(request.path());
        let query: Vec<(&str, &str)> = request.query().pairs().collect();

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url)
            .header(ACCEPT, request.accept().header_value());

        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        log::debug!("{} {}", request.method(), request.path());

        let response = builder.send().await.map_err(|e| TransportFailure {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(|e| TransportFailure {
            message: format!("Failed to read response body: {e}"),
            status: Some(status),
        })?;

        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method(),
            request.path(),
            status,
            text.len()
        );

        Ok(match request.accept() {
            Accept::Json => RawResponse::from_text(status, &text),
            Accept::Html => RawResponse::from_document(status, content_type.as_deref(), &text),
        })
    }
}

/// Create an HTTP client with the bearer token and JSON content type preset
pub fn create_authenticated_client(
    credentials: &Credentials,
) -> std::result::Result<reqwest::Client, Error> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", credentials.token()))
        .map_err(|e| Error::InvalidHeader(e.to_string()))?;
    auth.set_sensitive(true);

    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("airtools/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Client(e.to_string()))
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
