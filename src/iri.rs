//! Minimal IRI validation and splitting helpers.
//!
//! The reasoning engine never needs to parse or resolve IRIs against a base
//! (that belongs to an upstream parser); it only needs to reject obviously
//! malformed strings before they are interned, and to split an IRI into a
//! namespace/local-name pair for diagnostics.

use crate::error::{OwlError, OwlResult};

/// Rejects empty strings and strings containing whitespace. This is not a
/// full RFC 3987 validator - callers are expected to hand us IRIs that have
/// already been resolved by a parser.
pub fn validate(iri: &str) -> OwlResult<()> {
    if iri.is_empty() || iri.chars().any(char::is_whitespace) {
        return Err(OwlError::InvalidIri(iri.to_string()));
    }
    Ok(())
}

/// Splits an IRI into `(namespace, local_name)` at the last `#` or `/`.
/// Returns the whole IRI as the local name if neither separator is present.
pub fn split(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/']) {
        Some(idx) => (&iri[..=idx], &iri[idx + 1..]),
        None => ("", iri),
    }
}

pub fn local_name(iri: &str) -> &str {
    split(iri).1
}

pub fn namespace(iri: &str) -> &str {
    split(iri).0
}
