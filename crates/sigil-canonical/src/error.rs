//! Error types for Sigil Canonical

use thiserror::Error;

/// Errors raised while converting a JSON payload into signable fields.
///
/// All of these surface before anything is canonicalized or signed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("float values are not allowed in signable payloads (field '{field}'). Use strings instead (e.g. \"0.7\" instead of 0.7)")]
    FloatNotAllowed { field: String },

    #[error("signable payloads must be JSON objects")]
    NonObjectRoot,

    #[error("collection '{field}' mixes scalar and object elements")]
    MixedCollection { field: String },

    #[error("collection '{field}' contains a nested collection, which is not signable")]
    NestedArray { field: String },
}
