use thiserror::Error;

use crate::reference::ReferenceError;
use crate::report::ReportError;

/// Failure of a named operation.
///
/// The primary message always reads `Failed to <operation>: <cause>`; status
/// codes stay available through [`OperationError::status`] for diagnostics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    /// No response reached the caller
    #[error("Failed to {operation}: {message}")]
    Transport {
        operation: String,
        message: String,
        status: Option<u16>,
    },

    /// The API answered and reported a failure
    #[error("Failed to {operation}: {}", .messages.join("; "))]
    Api {
        operation: String,
        messages: Vec<String>,
        status: u16,
    },

    /// An input reference could not be turned into an id
    #[error("Failed to {operation}: {source}")]
    Reference {
        operation: String,
        source: ReferenceError,
    },

    /// The comparison report page could not be decoded
    #[error("Failed to {operation}: {source}")]
    Report {
        operation: String,
        source: ReportError,
    },
}

impl OperationError {
    pub fn reference(operation: impl Into<String>, source: ReferenceError) -> Self {
        OperationError::Reference {
            operation: operation.into(),
            source,
        }
    }

    pub fn report(operation: impl Into<String>, source: ReportError) -> Self {
        OperationError::Report {
            operation: operation.into(),
            source,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            OperationError::Transport { operation, .. }
            | OperationError::Api { operation, .. }
            | OperationError::Reference { operation, .. }
            | OperationError::Report { operation, .. } => operation,
        }
    }

    /// HTTP status associated with the failure, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            OperationError::Transport { status, .. } => *status,
            OperationError::Api { status, .. } => Some(*status),
            OperationError::Reference { .. } | OperationError::Report { .. } => None,
        }
    }
}
