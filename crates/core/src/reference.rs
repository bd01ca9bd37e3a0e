//! Reference resolution
//!
//! Forms let an operator point at an organization, case, asset or task by
//! picking it from a list, typing its id, or typing its name. Every API call
//! needs the canonical id, so this module narrows all three forms to one
//! string. Name lookups are supplied by the caller; the module itself does no I/O.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// A user-supplied pointer to a remote entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Picked from a list; the value is already an id
    ByValue(String),
    /// Typed as a raw id
    ById(String),
    /// Typed as a display name; needs a lookup
    ByName(String),
}

/// What is left to do for a reference after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    NeedsLookup(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("{field}: value is empty")]
    Empty { field: String, value: String },

    #[error("{field}: '{value}' is not a valid identifier")]
    Malformed { field: String, value: String },

    #[error("{field}: {cause}")]
    LookupFailed {
        field: String,
        value: String,
        cause: String,
    },

    #[error("{field}: no match found for '{value}'")]
    NotFound { field: String, value: String },

    #[error("{field}: unknown reference mode '{mode}'")]
    UnknownMode {
        field: String,
        mode: String,
        value: String,
    },
}

impl ReferenceError {
    pub fn field(&self) -> &str {
        match self {
            ReferenceError::Empty { field, .. }
            | ReferenceError::Malformed { field, .. }
            | ReferenceError::LookupFailed { field, .. }
            | ReferenceError::NotFound { field, .. }
            | ReferenceError::UnknownMode { field, .. } => field,
        }
    }

    /// The raw value the user supplied
    pub fn value(&self) -> &str {
        match self {
            ReferenceError::Empty { value, .. }
            | ReferenceError::Malformed { value, .. }
            | ReferenceError::LookupFailed { value, .. }
            | ReferenceError::NotFound { value, .. }
            | ReferenceError::UnknownMode { value, .. } => value,
        }
    }
}

// =============================================================================
// Reference
// =============================================================================

impl Reference {
    /// Build a reference from a form's `(mode, value)` pair.
    ///
    /// Modes are `list`, `id` and `name`, matched case-insensitively.
    pub fn parse(field: &str, mode: &str, value: &str) -> Result<Self, ReferenceError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Reference::ByValue(value.to_string())),
            "id" => Ok(Reference::ById(value.to_string())),
            "name" => Ok(Reference::ByName(value.to_string())),
            other => Err(ReferenceError::UnknownMode {
                field: field.to_string(),
                mode: other.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn raw_value(&self) -> &str {
        match self {
            Reference::ByValue(v) | Reference::ById(v) | Reference::ByName(v) => v,
        }
    }

    /// Validate the reference and tell whether a lookup is still needed
    pub fn plan(&self, field: &str) -> Result<Resolution, ReferenceError> {
        match self {
            Reference::ByValue(raw) | Reference::ById(raw) => {
                validate_identifier(field, raw).map(Resolution::Resolved)
            }
            Reference::ByName(raw) => {
                let name = raw.trim();
                if name.is_empty() {
                    return Err(ReferenceError::Empty {
                        field: field.to_string(),
                        value: raw.clone(),
                    });
                }
                Ok(Resolution::NeedsLookup(name.to_string()))
            }
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::ByValue(v) => write!(f, "list:{v}"),
            Reference::ById(v) => write!(f, "id:{v}"),
            Reference::ByName(v) => write!(f, "name:{v}"),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

fn uuid_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .unwrap()
    })
}

fn slug_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// Trim and check an id: decimal integer, UUID, or `[A-Za-z0-9_-]+`
pub fn validate_identifier(field: &str, raw: &str) -> Result<String, ReferenceError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ReferenceError::Empty {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }

    let is_integer = id.chars().all(|c| c.is_ascii_digit());
    if is_integer || uuid_pattern().is_match(id) || slug_pattern().is_match(id) {
        Ok(id.to_string())
    } else {
        Err(ReferenceError::Malformed {
            field: field.to_string(),
            value: raw.to_string(),
        })
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a reference to its canonical id.
///
/// `lookup` receives the trimmed display name and returns the matching id,
/// `None` when nothing matches, or an error that becomes the failure cause.
pub fn resolve<F, E>(
    field: &str,
    reference: &Reference,
    lookup: F,
) -> Result<String, ReferenceError>
where
    F: FnOnce(&str) -> Result<Option<String>, E>,
    E: fmt::Display,
{
    match reference.plan(field)? {
        Resolution::Resolved(id) => Ok(id),
        Resolution::NeedsLookup(name) => {
            let found = lookup(&name);
            finish_lookup(field, reference, found)
        }
    }
}

/// Turn the outcome of a name lookup into a validated id
pub fn finish_lookup<E: fmt::Display>(
    field: &str,
    reference: &Reference,
    found: Result<Option<String>, E>,
) -> Result<String, ReferenceError> {
    match found {
        Ok(Some(id)) => validate_identifier(field, &id),
        Ok(None) => Err(ReferenceError::NotFound {
            field: field.to_string(),
            value: reference.raw_value().to_string(),
        }),
        Err(cause) => Err(ReferenceError::LookupFailed {
            field: field.to_string(),
            value: reference.raw_value().to_string(),
            cause: cause.to_string(),
        }),
    }
}

/// Pick the id of the entity whose `name` matches.
///
/// An exact match wins; a case-insensitive match is used only when there is
/// no exact one. Accepts `_id` or `id`, string or numeric.
pub fn find_id_by_name(entities: &[Value], name: &str) -> Option<String> {
    let name = name.trim();

    entities
        .iter()
        .find(|e| entity_name(e) == Some(name))
        .or_else(|| {
            entities.iter().find(|e| {
                entity_name(e)
                    .map(|n| n.eq_ignore_ascii_case(name))
                    .unwrap_or(false)
            })
        })
        .and_then(entity_id)
}

fn entity_name(entity: &Value) -> Option<&str> {
    entity.get("name").and_then(Value::as_str).map(str::trim)
}

fn entity_id(entity: &Value) -> Option<String> {
    let id = entity.get("_id").or_else(|| entity.get("id"))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
