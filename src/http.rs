//! Framework-agnostic HTTP boundary helpers.
//!
//! The gate never owns the wire framework's request/response plumbing; it only computes the
//! header and cookie values the surrounding pipeline applies. Everything here is pure string
//! manipulation so any host framework can adapt it.

pub mod cors;
pub mod csrf;
pub mod headers;

pub use cors::*;
pub use csrf::*;
pub use headers::*;

// self
use crate::_prelude::*;

/// Request header carrying the access token.
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// Response header signaling a newly minted access token after a refresh-based renewal, so the
/// caller can update its stored credential without re-login.
pub const RENEWED_ACCESS_HEADER: &str = "x-renewed-access-token";
/// Cookie name of the dedicated refresh-token channel.
pub const REFRESH_COOKIE: &str = "gate_refresh";

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme comparison is case-insensitive per RFC 7235; surrounding whitespace on the token
/// is trimmed.
pub fn parse_bearer(header: &str) -> Option<&str> {
	let (scheme, token) = header.split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}

	let token = token.trim();

	(!token.is_empty()).then_some(token)
}

/// A `Set-Cookie` value the pipeline applies to the outgoing response.
///
/// Refresh-channel cookies are always http-only, secure, and same-site strict so scripts and
/// cross-site requests can never read or replay them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieDirective {
	/// Cookie name.
	pub name: &'static str,
	/// Cookie value; empty when clearing.
	pub value: String,
	/// Remaining lifetime; zero when clearing.
	pub max_age: Duration,
}
impl CookieDirective {
	/// Builds the refresh-channel cookie carrying a newly issued refresh token.
	pub fn refresh(token: &str, max_age: Duration) -> Self {
		Self { name: REFRESH_COOKIE, value: token.to_owned(), max_age: max_age.max(Duration::ZERO) }
	}

	/// Builds the directive that clears the refresh channel (logout).
	pub fn clear_refresh() -> Self {
		Self { name: REFRESH_COOKIE, value: String::new(), max_age: Duration::ZERO }
	}

	/// Returns `true` when this directive removes the cookie rather than setting it.
	pub fn is_clearing(&self) -> bool {
		self.value.is_empty()
	}

	/// Renders the full `Set-Cookie` header value.
	pub fn header_value(&self) -> String {
		format!(
			"{}={}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={}",
			self.name,
			self.value,
			self.max_age.whole_seconds()
		)
	}
}
