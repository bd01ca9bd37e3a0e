//! Operation request construction
//!
//! Pure builders for the requests the shell sends to the AIR API. Nothing in
//! here touches the network: a request is plain data until the transport
//! picks it up.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Method
// =============================================================================

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Parse a method name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Query parameters
// =============================================================================

/// Ordered query parameters.
///
/// The AIR API expects list filters as a single comma-separated value
/// (`filter[organizationIds]=1,2`), so pushing a key twice extends the
/// existing entry instead of repeating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, merging it into an existing key with a comma
    pub fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            return self;
        }

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Append an optional value; `None` is skipped
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v.to_string()),
            None => self,
        }
    }

    /// Append every value of a list under the same key
    pub fn push_all<I, V>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        values
            .into_iter()
            .fold(self, |params, value| params.push(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// =============================================================================
// Operation request
// =============================================================================

/// Response format an operation expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accept {
    #[default]
    Json,
    /// Body is kept as text; used by the comparison report page
    Html,
}

impl Accept {
    pub fn header_value(&self) -> &'static str {
        match self {
            Accept::Json => "application/json",
            Accept::Html => "text/html",
        }
    }
}

/// A single API call, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<Value>,
    accept: Accept,
}

impl OperationRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::default(),
            body: None,
            accept: Accept::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect_html(mut self) -> Self {
        self.accept = Accept::Html;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn accept(&self) -> Accept {
        self.accept
    }
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("AIR instance URL is empty")]
    MissingInstanceUrl,
    #[error("AIR API token is empty")]
    MissingToken,
}

/// Validated instance URL and API token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    instance_url: String,
    token: String,
}

impl Credentials {
    /// Trim both values, reject empty ones and strip trailing slashes from the URL
    pub fn new(instance_url: &str, token: &str) -> Result<Self, CredentialsError> {
        let instance_url = instance_url.trim().trim_end_matches('/');
        if instance_url.is_empty() {
            return Err(CredentialsError::MissingInstanceUrl);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialsError::MissingToken);
        }

        Ok(Self {
            instance_url: instance_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Absolute URL for an API path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.instance_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("instance_url", &self.instance_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
