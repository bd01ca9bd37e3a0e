//! Async reference resolution

use std::fmt::Display;
use std::future::Future;

use airtools_core::reference::{finish_lookup, Reference, ReferenceError, Resolution};

/// Resolve a reference, awaiting `lookup` only for names.
///
/// Same contract as [`airtools_core::reference::resolve`], for lookups that
/// are API round trips.
pub async fn resolve_reference<F, Fut, E>(
    field: &str,
    reference: &Reference,
    lookup: F,
) -> Result<String, ReferenceError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Option<String>, E>>,
    E: Display,
{
    match reference.plan(field)? {
        Resolution::Resolved(id) => Ok(id),
        Resolution::NeedsLookup(name) => {
            log::debug!("resolving {field} from {reference}");
            let found = lookup(name).await;
            finish_lookup(field, reference, found)
        }
    }
}
