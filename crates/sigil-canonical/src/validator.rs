//! Token validation
//!
//! Recomputes the token for a candidate object and secret and compares it
//! against the presented token. Comparison is constant-time: the original
//! design's plain equality is a latent timing side-channel, and the token
//! bytes are unaffected by the comparison method.

use sigil_core::{ArgumentError, Signable, TokenError};

use crate::codec::generate_token;

/// Check whether a presented token matches the object and shared secret.
///
/// A blank token short-circuits to `Ok(false)` without touching the object
/// or the secret. A blank token and a mismatched token are intentionally
/// indistinguishable through this entry point.
///
/// # Errors
///
/// Propagates [`ArgumentError`] for a blank shared secret or an object with
/// a blank canonical form.
pub fn is_token_valid<T: Signable>(
    token: &str,
    obj: &T,
    shared_secret_key: &str,
) -> Result<bool, ArgumentError> {
    if token.trim().is_empty() {
        return Ok(false);
    }

    let expected = generate_token(obj, shared_secret_key)?;
    Ok(constant_time_eq(&expected, token))
}

/// Validate a presented token, raising on mismatch.
///
/// # Errors
///
/// Returns [`TokenError::Mismatch`] when the token (including a blank one)
/// does not match, and [`TokenError::Argument`] for invalid arguments.
pub fn validate_token<T: Signable>(
    token: &str,
    obj: &T,
    shared_secret_key: &str,
) -> Result<(), TokenError> {
    if is_token_valid(token, obj, shared_secret_key)? {
        Ok(())
    } else {
        Err(TokenError::Mismatch)
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
