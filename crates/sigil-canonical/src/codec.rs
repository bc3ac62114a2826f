//! Token codec
//!
//! Transforms a canonical string into the final transport-safe token:
//! frame (length + checksum prefix), reverse, salt, HMAC-SHA512, byte-pad,
//! base64 with case inversion and alphabet remapping.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use sigil_core::{ensure_shared_secret, ensure_signing_input, ArgumentError, Signable};
use std::fmt::Write;

use crate::canonical::canonicalize;

type HmacSha512 = Hmac<Sha512>;

/// Embedded salt, unique to Sigil. Not a secret.
const STATIC_SALT: &str = "Sigil.Token.StaticSalt.7acbc9ea-b995-4564-a24b-189b4f935b66";

/// Filler byte bringing the digest to a multiple of 3, so base64 never
/// emits a trailing `=`.
const PAD_BYTE: u8 = 0x00;

/// Replacement for `/`, outside the base64 alphabet.
const SLASH_SUBSTITUTE: char = 'Ж';

/// Replacement for `+`, outside the base64 alphabet.
const PLUS_SUBSTITUTE: char = 'ж';

/// Generate the token for a signable object.
///
/// Canonicalizes the object and runs the result through
/// [`compute_token`]. An object whose canonical string is blank (zero
/// included fields) is an error before any hashing occurs.
///
/// # Errors
///
/// Returns [`ArgumentError`] for a blank shared secret or blank canonical
/// string.
pub fn generate_token<T: Signable>(
    obj: &T,
    shared_secret_key: &str,
) -> Result<String, ArgumentError> {
    compute_token(&canonicalize(obj), shared_secret_key)
}

/// Compute the token for an already-canonicalized signing input.
///
/// The pipeline, in order:
///
/// 1. Prefix a frame encoding the input's character count and a SHA-256
///    checksum (framing integrity only, not a security boundary)
/// 2. Reverse the character sequence of the framed string (format artifact,
///    no security property)
/// 3. Prepend the embedded static salt
/// 4. HMAC-SHA512 over the salted string, keyed by the shared secret
/// 5. Pad the digest with filler bytes to a multiple of 3
/// 6. Base64-encode, invert ASCII letter case, and substitute the
///    transport-unsafe characters `/` and `+` with reserved non-ASCII
///    replacements
///
/// The result is 88 characters with no `=`, `/` or `+`. Tokens are opaque:
/// they are compared, never decoded.
pub fn compute_token(
    signing_input: &str,
    shared_secret_key: &str,
) -> Result<String, ArgumentError> {
    ensure_signing_input(signing_input)?;
    ensure_shared_secret(shared_secret_key)?;

    let framed = frame(signing_input);
    let reversed: String = framed.chars().rev().collect();
    let salted = format!("{STATIC_SALT}.{reversed}");

    let mut mac = HmacSha512::new_from_slice(shared_secret_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(salted.as_bytes());
    let digest = mac.finalize().into_bytes();

    let encoded = BASE64.encode(pad_to_triple(&digest));
    Ok(remap_alphabet(&invert_ascii_case(&encoded)))
}

/// Prefix the framing header: character count and checksum of the input.
fn frame(signing_input: &str) -> String {
    format!(
        "|#Length:{};Checksum:{}#|{}",
        signing_input.chars().count(),
        checksum(signing_input),
        signing_input
    )
}

/// Lowercase SHA-256 hex of the input's UTF-8 bytes.
fn checksum(signing_input: &str) -> String {
    let digest = Sha256::digest(signing_input.as_bytes());

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(hex, "{:02x}", byte).unwrap();
    }
    hex
}

/// Pad with filler bytes to a multiple of 3.
fn pad_to_triple(digest: &[u8]) -> Vec<u8> {
    let pad_length = (3 - digest.len() % 3) % 3;

    let mut padded = Vec::with_capacity(digest.len() + pad_length);
    padded.extend_from_slice(digest);
    padded.resize(digest.len() + pad_length, PAD_BYTE);
    padded
}

/// Swap the case of every ASCII letter.
fn invert_ascii_case(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Substitute the transport-unsafe base64 characters.
fn remap_alphabet(encoded: &str) -> String {
    encoded
        .replace('/', &SLASH_SUBSTITUTE.to_string())
        .replace('+', &PLUS_SUBSTITUTE.to_string())
}
