//! Error types shared across the ontology model, normalizer, and reasoning engine.

use thiserror::Error;

/// All errors this crate can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OwlError {
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    #[error("prefix conflict: '{prefix}' is already bound to '{existing}', cannot rebind to '{attempted}'")]
    PrefixConflict {
        prefix: String,
        existing: String,
        attempted: String,
    },

    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),

    #[error("statement did not reduce to a normal form: {0}")]
    NormalizationInvariantViolation(String),

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown object property: {0}")]
    UnknownProperty(String),

    #[error("unknown individual: {0}")]
    UnknownIndividual(String),

    #[error("literals are not supported in query results")]
    LiteralsUnsupported,

    #[error("unsupported expression in ORDER BY: {0}")]
    UnsupportedExpressionInOrderBy(String),
}

pub type OwlResult<T> = Result<T, OwlError>;
