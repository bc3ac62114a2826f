//! Argument validation
//!
//! Guards used by the token codec and validator. Blank means empty or
//! whitespace-only; both are rejected before any hashing occurs.

use crate::error::ArgumentError;

/// Validate a caller-supplied shared secret key.
pub fn ensure_shared_secret(shared_secret_key: &str) -> Result<(), ArgumentError> {
    if shared_secret_key.trim().is_empty() {
        return Err(ArgumentError::BlankSharedSecret);
    }
    Ok(())
}

/// Validate the canonical string handed to the token codec.
pub fn ensure_signing_input(signing_input: &str) -> Result<(), ArgumentError> {
    if signing_input.trim().is_empty() {
        return Err(ArgumentError::BlankSigningInput);
    }
    Ok(())
}
