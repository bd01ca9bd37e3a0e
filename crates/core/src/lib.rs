//! Core library for airtools
//!
//! This crate implements the **Functional Core** of the airtools client for the
//! Binalyze AIR REST API, following the Functional Core - Imperative Shell
//! architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`airtools_core`** (this crate): Pure functions with zero I/O
//! - **`airtools`**: Transport, dispatching and the CLI (the Imperative Shell)
//!
//! Every function here is deterministic and can be tested with fixture data,
//! no mock server required. The shell builds an [`request::OperationRequest`],
//! sends it, and hands the raw response back to this crate for interpretation.
//!
//! # Module Organization
//!
//! - [`request`]: Operation requests, query encoding and credentials
//! - [`normalize`]: Collapse both API error conventions into [`normalize::OperationResult`]
//! - [`pagination`]: Read page metadata from paginated envelopes
//! - [`reference`]: Narrow list/id/name references to a canonical id
//! - [`report`]: Decode the JSON report embedded in the comparison HTML page
//! - [`resources`]: Request builders for listing, lookup and report operations
//! - [`error`]: The operation-level error taxonomy
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use airtools_core::normalize::{normalize, RawResponse};
//! use airtools_core::pagination::extract_pagination;
//!
//! let raw = RawResponse::from_text(200, r#"{"success":true,"result":[]}"#);
//! let payload = normalize(&raw).into_result("list cases")?;
//! assert!(extract_pagination(&payload).is_none());
//! ```

pub mod error;
pub mod normalize;
pub mod pagination;
pub mod reference;
pub mod report;
pub mod request;
pub mod resources;

pub use error::OperationError;
