//! # Sigil Canonical
//!
//! Deterministic canonicalization and HMAC token computation for Sigil.
//!
//! This crate provides:
//! - Canonical string construction for any [`sigil_core::Signable`] object
//! - The token codec (framing, salting, HMAC-SHA512, transport-safe encoding)
//! - Token validation against an object and a shared secret
//! - A JSON payload adapter with a declarative signing policy
//!
//! ## Canonicalization Rules
//!
//! 1. Excluded fields are dropped; the rest sort by explicit order, then by
//!    name (byte-wise, never declaration order)
//! 2. Every formatted field is terminated by a reserved separator marker
//! 3. Missing values render as a reserved empty-value marker, distinct from
//!    the empty string
//! 4. Rendering is locale-independent: fixed boolean literals, decimal
//!    integers, RFC 3339 UTC timestamps with microsecond precision
//!
//! ## Example
//!
//! ```rust
//! use sigil_canonical::{generate_token, is_token_valid};
//! use sigil_core::{Field, Signable};
//!
//! struct Receipt {
//!     account: String,
//!     amount: u64,
//! }
//!
//! impl Signable for Receipt {
//!     fn describe_fields(&self) -> Vec<Field> {
//!         vec![
//!             Field::new("account", self.account.as_str()),
//!             Field::new("amount", self.amount),
//!         ]
//!     }
//! }
//!
//! let receipt = Receipt {
//!     account: "acct-1042".to_string(),
//!     amount: 1999,
//! };
//!
//! let token = generate_token(&receipt, "a shared secret").unwrap();
//! assert!(is_token_valid(&token, &receipt, "a shared secret").unwrap());
//! ```
//!
//! ## Determinism
//!
//! For a fixed object value and fixed secret, token generation is a pure
//! function: no randomness, no machine- or time-dependent state. The
//! signable object must be effectively immutable for the duration of a
//! call, and the object graph must be acyclic.

mod canonical;
mod codec;
mod error;
mod json;
mod validator;

pub use canonical::*;
pub use codec::*;
pub use error::*;
pub use json::*;
pub use validator::*;
