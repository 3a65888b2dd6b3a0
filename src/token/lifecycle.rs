//! Access/refresh token lifecycle: issuance, per-request validation, and rotation on renewal.
//!
//! On each authenticated request the caller's credential state walks a small state machine:
//! a decodable access token resolves immediately; an absent or expired access token falls back
//! to the refresh channel, which (when valid) mints a fresh access token *and* rotates the
//! refresh token; an absent, expired, or tampered refresh token rejects the request and the
//! caller must re-authenticate. Any invalid-signature token rejects immediately at every step,
//! with no silent fallback.
//!
//! Tokens are stateless, so logout cannot revoke an already-issued access token before its
//! natural expiry; it only clears the refresh channel. Known limitation.

// self
use crate::{
	_prelude::*,
	http::CookieDirective,
	obs::{self, GateStage},
	policy::GatePolicy,
	token::{CodecError, SignatureScheme, SigningKey, TokenKind, codec},
};

/// The access/refresh pair minted per successful authentication.
///
/// The refresh token must only travel via a server-controlled, http-only, same-site-restricted
/// cookie channel (see [`TokenPair::refresh_cookie`]), never echoed in a JSON body.
#[derive(Clone, Debug)]
pub struct TokenPair {
	/// Serialized short-lived access token.
	pub access_token: String,
	/// Access-token expiry instant.
	pub access_expires_at: OffsetDateTime,
	/// Serialized long-lived refresh token.
	pub refresh_token: String,
	/// Refresh-token expiry instant.
	pub refresh_expires_at: OffsetDateTime,
}
impl TokenPair {
	/// Builds the refresh-channel cookie directive for this pair.
	pub fn refresh_cookie(&self, now: OffsetDateTime) -> CookieDirective {
		CookieDirective::refresh(&self.refresh_token, self.refresh_expires_at - now)
	}
}

/// Per-request success terminal of the lifecycle state machine.
#[derive(Clone, Debug)]
pub enum Authentication {
	/// The presented access token decoded cleanly; no side effect.
	Active {
		/// Resolved subject payload.
		subject: Json,
	},
	/// The access token was absent or expired and the refresh token minted a replacement pair.
	///
	/// The new access token must be surfaced to the caller out of band (response header) and
	/// the rotated refresh token re-set on the cookie channel.
	Renewed {
		/// Resolved subject payload.
		subject: Json,
		/// Replacement token pair (rotated refresh token included).
		tokens: TokenPair,
	},
}
impl Authentication {
	/// Returns the resolved subject payload.
	pub fn subject(&self) -> &Json {
		match self {
			Authentication::Active { subject } | Authentication::Renewed { subject, .. } => subject,
		}
	}

	/// Returns the replacement pair when the request triggered a renewal.
	pub fn renewed_tokens(&self) -> Option<&TokenPair> {
		match self {
			Authentication::Active { .. } => None,
			Authentication::Renewed { tokens, .. } => Some(tokens),
		}
	}
}

/// Issues, validates, and renews token pairs; stateless and safe to share across requests.
#[derive(Clone, Debug)]
pub struct TokenLifecycle {
	signing_key: SigningKey,
	scheme: SignatureScheme,
	access_ttl: Duration,
	refresh_ttl: Duration,
}
impl TokenLifecycle {
	/// Creates a lifecycle manager from the validated policy.
	pub fn new(policy: &GatePolicy) -> Self {
		Self {
			signing_key: policy.signing_key.clone(),
			scheme: policy.scheme,
			access_ttl: policy.access_ttl,
			refresh_ttl: policy.refresh_ttl,
		}
	}

	/// Mints an access + refresh pair for the subject, with both windows anchored at `now`.
	pub fn issue_at(&self, subject: &Json, now: OffsetDateTime) -> Result<TokenPair> {
		let access_token = codec::encode_at(
			subject,
			TokenKind::Access,
			now,
			self.access_ttl,
			&self.signing_key,
			self.scheme,
		)?;
		let refresh_token = codec::encode_at(
			subject,
			TokenKind::Refresh,
			now,
			self.refresh_ttl,
			&self.signing_key,
			self.scheme,
		)?;

		Ok(TokenPair {
			access_token,
			access_expires_at: now + self.access_ttl,
			refresh_token,
			refresh_expires_at: now + self.refresh_ttl,
		})
	}

	/// Convenience wrapper around [`Self::issue_at`] using the current clock.
	pub fn issue(&self, subject: &Json) -> Result<TokenPair> {
		self.issue_at(subject, OffsetDateTime::now_utc())
	}

	/// Resolves the caller's credential state from the bearer header and refresh channel.
	///
	/// `bearer` is the value presented via `Authorization: Bearer <token>`; `refresh` comes from
	/// the dedicated cookie channel, never from the same header as the access token.
	pub fn authenticate_at(
		&self,
		bearer: Option<&str>,
		refresh: Option<&str>,
		now: OffsetDateTime,
	) -> Result<Authentication> {
		match bearer {
			Some(token) =>
				match codec::decode_at(token, &self.signing_key, self.scheme, now) {
					Ok(decoded) if decoded.kind == TokenKind::Access =>
						Ok(Authentication::Active { subject: decoded.subject }),
					Ok(_) => {
						// A refresh token presented as a bearer credential is a misuse of a
						// validly signed token; reject it as an integrity failure.
						let error = Error::from(CodecError::InvalidSignature);

						obs::note_rejection(GateStage::Authenticate, &error);

						Err(error)
					},
					Err(CodecError::Expired) => self.renew_at(refresh, now),
					Err(e) => {
						let error = Error::from(e);

						obs::note_rejection(GateStage::Authenticate, &error);

						Err(error)
					},
				},
			None => self.renew_at(refresh, now),
		}
	}

	/// Convenience wrapper around [`Self::authenticate_at`] using the current clock.
	pub fn authenticate(&self, bearer: Option<&str>, refresh: Option<&str>) -> Result<Authentication> {
		self.authenticate_at(bearer, refresh, OffsetDateTime::now_utc())
	}

	/// Returns the directive that clears the refresh channel on logout.
	///
	/// Stateless tokens carry no server-side revocation list, so an already-issued access token
	/// stays usable until its natural expiry.
	pub fn invalidate(&self) -> CookieDirective {
		CookieDirective::clear_refresh()
	}

	fn renew_at(&self, refresh: Option<&str>, now: OffsetDateTime) -> Result<Authentication> {
		let Some(token) = refresh else {
			let error = Error::from(CodecError::Expired);

			obs::note_rejection(GateStage::Authenticate, &error);

			return Err(error);
		};
		let decoded = codec::decode_at(token, &self.signing_key, self.scheme, now).map_err(|e| {
			let error = Error::from(e);

			obs::note_rejection(GateStage::Authenticate, &error);

			error
		})?;

		if decoded.kind != TokenKind::Refresh {
			let error = Error::from(CodecError::InvalidSignature);

			obs::note_rejection(GateStage::Authenticate, &error);

			return Err(error);
		}

		// Rotation: every renewal mints a fresh refresh token as well, shrinking the replay
		// window of a stolen one.
		let tokens = self.issue_at(&decoded.subject, now)?;

		Ok(Authentication::Renewed { subject: decoded.subject, tokens })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;
	use crate::policy::GatePolicy;

	fn lifecycle() -> TokenLifecycle {
		let policy = GatePolicy::builder("lifecycle-test-key")
			.access_ttl(Duration::minutes(15))
			.refresh_ttl(Duration::days(7))
			.build()
			.expect("Lifecycle policy fixture should validate.");

		TokenLifecycle::new(&policy)
	}

	#[test]
	fn issued_pair_windows_nest_correctly() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 9 }), now)
			.expect("Issuing a pair should succeed.");

		assert_eq!(pair.access_expires_at, now + Duration::minutes(15));
		assert_eq!(pair.refresh_expires_at, now + Duration::days(7));
		assert!(pair.refresh_expires_at > pair.access_expires_at);
	}

	#[test]
	fn valid_access_token_resolves_without_side_effects() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let subject = json!({ "user_id": 9 });
		let pair = lifecycle.issue_at(&subject, now).expect("Issuing a pair should succeed.");
		let auth = lifecycle
			.authenticate_at(Some(&pair.access_token), None, now + Duration::minutes(5))
			.expect("A fresh access token should authenticate.");

		assert_eq!(auth.subject(), &subject);
		assert!(auth.renewed_tokens().is_none());
	}

	#[test]
	fn expired_access_with_valid_refresh_renews_and_rotates() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let subject = json!({ "user_id": 9 });
		let pair = lifecycle.issue_at(&subject, now).expect("Issuing a pair should succeed.");
		// Used at minute 20, past the 15-minute access window.
		let later = now + Duration::minutes(20);
		let auth = lifecycle
			.authenticate_at(Some(&pair.access_token), Some(&pair.refresh_token), later)
			.expect("A valid refresh token should renew the session.");

		assert_eq!(auth.subject(), &subject);

		let renewed = auth.renewed_tokens().expect("Renewal should mint a replacement pair.");

		assert_ne!(renewed.refresh_token, pair.refresh_token, "refresh token must rotate");
		assert_eq!(renewed.access_expires_at, later + Duration::minutes(15));

		// The renewed access token authenticates on its own.
		lifecycle
			.authenticate_at(Some(&renewed.access_token), None, later + Duration::minutes(1))
			.expect("Renewed access token should authenticate.");
	}

	#[test]
	fn absent_access_with_valid_refresh_renews() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 1 }), now)
			.expect("Issuing a pair should succeed.");
		let auth = lifecycle
			.authenticate_at(None, Some(&pair.refresh_token), now + Duration::hours(1))
			.expect("Refresh-only authentication should succeed.");

		assert!(auth.renewed_tokens().is_some());
	}

	#[test]
	fn expired_refresh_terminates_the_session() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 1 }), now)
			.expect("Issuing a pair should succeed.");
		let verdict = lifecycle.authenticate_at(
			Some(&pair.access_token),
			Some(&pair.refresh_token),
			now + Duration::days(8),
		);

		assert!(matches!(verdict, Err(Error::Codec(CodecError::Expired))));
	}

	#[test]
	fn missing_both_channels_is_an_expiry_rejection() {
		let lifecycle = lifecycle();
		let verdict = lifecycle.authenticate_at(None, None, OffsetDateTime::now_utc());

		assert!(matches!(verdict, Err(Error::Codec(CodecError::Expired))));
	}

	#[test]
	fn refresh_token_cannot_pose_as_access_token() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 1 }), now)
			.expect("Issuing a pair should succeed.");
		let verdict =
			lifecycle.authenticate_at(Some(&pair.refresh_token), None, now + Duration::minutes(1));

		assert!(matches!(verdict, Err(Error::Codec(CodecError::InvalidSignature))));
	}

	#[test]
	fn access_token_cannot_pose_as_refresh_token() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 1 }), now)
			.expect("Issuing a pair should succeed.");
		// Access token expired; the "refresh" channel holds another access token.
		let verdict = lifecycle.authenticate_at(
			None,
			Some(&pair.access_token),
			now + Duration::minutes(20),
		);

		assert!(matches!(verdict, Err(Error::Codec(CodecError::InvalidSignature))));
	}

	#[test]
	fn tampered_bearer_rejects_immediately_without_refresh_fallback() {
		let lifecycle = lifecycle();
		let now = macros::datetime!(2025-06-01 00:00 UTC);
		let pair = lifecycle
			.issue_at(&json!({ "user_id": 1 }), now)
			.expect("Issuing a pair should succeed.");
		let mut tampered = pair.access_token.clone();

		tampered.pop();

		let verdict = lifecycle.authenticate_at(
			Some(&tampered),
			Some(&pair.refresh_token),
			now + Duration::minutes(1),
		);

		assert!(
			matches!(verdict, Err(Error::Codec(CodecError::InvalidSignature))),
			"a tampered bearer token must not fall back to the refresh channel"
		);
	}
}
