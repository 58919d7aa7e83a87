//! Reference resolution over the growing bundle
//!
//! Cross-links (a procedure's reason, a care plan's addressed conditions)
//! are resolved purely from the output sequence built so far; there is no
//! persistent index. The scan runs forward from the start of the bundle and
//! stops at the first match, so when several prior resources share a code
//! the reference always targets the oldest. That tie-break keeps repeated
//! exports byte-identical and must not be swapped for most-recent-match.

use super::bundle::{Bundle, Entry};
use crate::fhir::ResourceKind;

/// Finds the earliest appended entry of `kind` whose primary code is `code`
///
/// Returns `None` when no prior entry matches; callers treat that as "omit
/// the reference", never as an error.
pub fn find_first_by_kind_and_code<'a>(
    bundle: &'a Bundle,
    kind: ResourceKind,
    code: &str,
) -> Option<&'a Entry> {
    bundle
        .entries()
        .iter()
        .find(|entry| entry.resource.kind() == kind && entry.resource.primary_code() == Some(code))
}
