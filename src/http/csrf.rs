//! CSRF token minting and constant-time validation.
//!
//! The minted token lives in two places: the caller's session storage (server side, external
//! to this crate) and a hardened cookie mirrored back to the frontend. On mutating requests
//! the frontend echoes the token in a header and the two copies must match.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
// self
use crate::_prelude::*;

/// Request header the frontend echoes the CSRF token in.
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Session/cookie key the CSRF token is stored under.
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

const CSRF_TOKEN_BYTES: usize = 32;

/// Mints a cryptographically random, URL-safe CSRF token.
pub fn mint_csrf_token() -> String {
	let mut bytes = [0_u8; CSRF_TOKEN_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	URL_SAFE_NO_PAD.encode(bytes)
}

/// Validates the submitted token against the stored session token in constant time.
///
/// Missing submissions and mismatches are indistinguishable to the caller.
pub fn validate_csrf_token(submitted: Option<&str>, stored: &str) -> Result<()> {
	let submitted = submitted.ok_or(Error::CsrfMismatch)?;

	if !constant_time_eq(submitted.as_bytes(), stored.as_bytes()) {
		return Err(Error::CsrfMismatch);
	}

	Ok(())
}

// Byte-wise comparison without early exit on the first mismatch; the length check alone may
// short-circuit since token lengths are fixed and public.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	if a.len() != b.len() {
		return false;
	}

	a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
