//! Error types for Sigil Core

use thiserror::Error;

/// Invalid-argument failures, surfaced synchronously before any hashing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("shared secret key must not be empty or blank")]
    BlankSharedSecret,

    #[error("signing input must not be empty or blank")]
    BlankSigningInput,
}

/// Errors raised by the token validation entry points.
///
/// `Mismatch` is a security violation, kept distinct from argument errors so
/// callers can tell "bad usage" from "authentication failed".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("token does not match the object and shared secret key")]
    Mismatch,
}
