//! Gate-level error types shared across tokens, guards, and credential flows.
//!
//! Callers at the HTTP boundary are expected to collapse every variant into a generic
//! authorization-style rejection; the internal distinctions (expired vs. tampered vs. locked)
//! exist for server-side observability and tests, never for echoing to clients.

// self
use crate::{_prelude::*, guard::RetryDirective};

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical gate error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token encoding or verification failure.
	#[error(transparent)]
	Codec(#[from] crate::token::CodecError),
	/// Local policy configuration problem.
	#[error(transparent)]
	Policy(#[from] crate::policy::PolicyError),
	/// Credential-store failure.
	#[error("{0}")]
	Storage(#[from] crate::store::StoreError),
	/// Secret hashing or verification machinery failed (not a credential mismatch).
	#[error(transparent)]
	Hash(#[from] crate::hasher::HashError),
	/// Identifier validation failure.
	#[error(transparent)]
	Identifier(#[from] crate::identity::IdentifierError),
	/// Notification delivery failure.
	#[error(transparent)]
	Notify(#[from] crate::notify::NotifyError),

	/// The caller exceeded its request budget for the current window.
	#[error("Too many requests; retry after the current window elapses.")]
	RateLimited {
		/// Machine-readable retry hint for the caller.
		retry: RetryDirective,
	},
	/// The caller accumulated too many authentication failures.
	///
	/// Deliberately carries no remaining-lockout duration; revealing it would aid timing attacks.
	#[error("Too many failed authentication attempts.")]
	LockedOut,
	/// Credential check failed.
	///
	/// Identical whether the principal is unknown or the secret is wrong, to prevent account
	/// enumeration.
	#[error("Invalid credentials.")]
	InvalidCredentials,
	/// Registration collides with an existing principal.
	#[error("A principal with that identifier already exists.")]
	DuplicateIdentifier,
	/// Password reset targets an identifier with no matching principal.
	#[error("No principal matches the provided identifier.")]
	UnknownPrincipal,
	/// Submitted CSRF token is absent or does not match the stored one.
	#[error("Invalid CSRF token.")]
	CsrfMismatch,
}
impl Error {
	/// Returns `true` for failures that indicate tampering or a wrong key rather than mere
	/// expiry; these must be logged distinctly for security monitoring.
	pub const fn is_integrity_failure(&self) -> bool {
		matches!(self, Self::Codec(crate::token::CodecError::InvalidSignature))
	}

	/// Returns `true` for transient failures the caller may retry once the relevant window
	/// elapses.
	pub const fn is_transient(&self) -> bool {
		matches!(self, Self::RateLimited { .. } | Self::LockedOut)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::token::CodecError;

	#[test]
	fn integrity_classification_separates_expiry_from_tampering() {
		assert!(Error::from(CodecError::InvalidSignature).is_integrity_failure());
		assert!(!Error::from(CodecError::Expired).is_integrity_failure());
		assert!(!Error::LockedOut.is_integrity_failure());
	}

	#[test]
	fn transient_classification_covers_both_guards() {
		let retry = RetryDirective::new(
			OffsetDateTime::now_utc() + Duration::seconds(30),
			Duration::seconds(30),
		);

		assert!(Error::RateLimited { retry }.is_transient());
		assert!(Error::LockedOut.is_transient());
		assert!(!Error::InvalidCredentials.is_transient());
	}
}
