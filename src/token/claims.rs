//! Claims embedded in every signed token.

// self
use crate::_prelude::*;

/// Discriminates the two token roles issued per authentication.
///
/// The discriminant is signed into the payload so a refresh token can never be replayed as an
/// access token (or vice versa), even though both are minted from the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Short-lived credential presented on each request.
	Access,
	/// Long-lived credential used solely to mint a new access token.
	Refresh,
}
impl TokenKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Signed claim set carried by every token.
///
/// The subject payload is opaque to the codec; it only has to round-trip losslessly through
/// encode/decode. It lives under the private `subject` claim name rather than the registered
/// `sub` claim, which the JWT wire convention (and strict decoders) constrain to a string;
/// structured payloads would not survive that slot. Instants are stored as unix-second
/// timestamps, the wire convention of the `iat`/`exp` registered claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Opaque structured payload identifying the principal.
	pub subject: Json,
	/// Issued-at instant, unix seconds.
	pub iat: i64,
	/// Expiry instant, unix seconds; always strictly after `iat`.
	pub exp: i64,
	/// Token role discriminant.
	pub kind: TokenKind,
}
impl Claims {
	/// Builds a claim set for the provided validity window.
	pub fn new(subject: Json, kind: TokenKind, issued_at: OffsetDateTime, validity: Duration) -> Self {
		let expires_at = issued_at + validity;

		Self { subject, iat: issued_at.unix_timestamp(), exp: expires_at.unix_timestamp(), kind }
	}

	/// Issued-at instant as an [`OffsetDateTime`].
	pub fn issued_at(&self) -> Result<OffsetDateTime, time::error::ComponentRange> {
		OffsetDateTime::from_unix_timestamp(self.iat)
	}

	/// Expiry instant as an [`OffsetDateTime`].
	pub fn expires_at(&self) -> Result<OffsetDateTime, time::error::ComponentRange> {
		OffsetDateTime::from_unix_timestamp(self.exp)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	#[test]
	fn validity_window_is_relative_to_issuance() {
		let issued = macros::datetime!(2025-06-01 12:00 UTC);
		let claims =
			Claims::new(json!({ "user_id": 7 }), TokenKind::Access, issued, Duration::minutes(15));

		assert_eq!(claims.issued_at().expect("Issued-at should convert."), issued);
		assert_eq!(
			claims.expires_at().expect("Expiry should convert."),
			issued + Duration::minutes(15)
		);
		assert!(claims.exp > claims.iat);
	}

	#[test]
	fn kind_serializes_as_snake_case() {
		let payload = serde_json::to_string(&TokenKind::Refresh)
			.expect("Token kind should serialize to JSON.");

		assert_eq!(payload, "\"refresh\"");
	}

	#[test]
	fn subject_round_trips_through_serde() {
		let subject = json!({ "user_id": 42, "roles": ["admin", "ops"] });
		let claims = Claims::new(
			subject.clone(),
			TokenKind::Access,
			OffsetDateTime::now_utc(),
			Duration::minutes(30),
		);
		let encoded = serde_json::to_string(&claims).expect("Claims should serialize.");
		let decoded: Claims = serde_json::from_str(&encoded).expect("Claims should deserialize.");

		assert_eq!(decoded.subject, subject);
		assert_eq!(decoded.kind, TokenKind::Access);
	}

	#[test]
	fn payload_avoids_the_registered_sub_claim() {
		let claims = Claims::new(
			json!({ "principal_id": "principal-7" }),
			TokenKind::Access,
			OffsetDateTime::now_utc(),
			Duration::minutes(30),
		);
		let encoded: Json =
			serde_json::to_value(&claims).expect("Claims should serialize to a JSON object.");

		// Strict JWT decoders require the registered `sub` claim to be a string; structured
		// payloads must ride a private claim name instead.
		assert!(encoded.get("sub").is_none());
		assert_eq!(encoded.get("subject"), Some(&json!({ "principal_id": "principal-7" })));
	}
}
