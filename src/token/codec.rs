//! Pure encode/decode layer over HMAC-signed tokens.
//!
//! The codec never touches shared state; it is a pure function of its inputs plus the
//! caller-supplied instant, which keeps every expiry edge case testable with a pinned clock.
//! Signature verification always happens before the expiry comparison, so a tampered token is
//! reported as [`CodecError::InvalidSignature`] even when it is also stale.

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
// self
use crate::{
	_prelude::*,
	token::{Claims, SigningKey, TokenKind},
};

/// HMAC signature schemes accepted by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignatureScheme {
	/// HMAC-SHA256.
	Hs256,
	/// HMAC-SHA384.
	Hs384,
	/// HMAC-SHA512.
	Hs512,
}
impl SignatureScheme {
	/// Returns the canonical scheme identifier (`HS256`, ...).
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureScheme::Hs256 => "HS256",
			SignatureScheme::Hs384 => "HS384",
			SignatureScheme::Hs512 => "HS512",
		}
	}

	const fn algorithm(self) -> Algorithm {
		match self {
			SignatureScheme::Hs256 => Algorithm::HS256,
			SignatureScheme::Hs384 => Algorithm::HS384,
			SignatureScheme::Hs512 => Algorithm::HS512,
		}
	}
}
impl Display for SignatureScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureScheme {
	type Err = CodecError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"HS256" => Ok(SignatureScheme::Hs256),
			"HS384" => Ok(SignatureScheme::Hs384),
			"HS512" => Ok(SignatureScheme::Hs512),
			other =>
				Err(CodecError::Encoding { reason: format!("unsupported algorithm `{other}`") }),
		}
	}
}

/// Failures produced by the token codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum CodecError {
	/// Bad input to issuance; a caller bug, fatal to the request, never retried.
	#[error("Token cannot be encoded: {reason}.")]
	Encoding {
		/// What made the input unacceptable.
		reason: String,
	},
	/// The token's validity window has passed. Recoverable via refresh for access tokens,
	/// terminal for refresh tokens.
	#[error("Token has expired.")]
	Expired,
	/// The signature does not verify or the structure is malformed. Always terminal; logged
	/// distinctly from expiry for security monitoring.
	#[error("Token signature is invalid or the token is malformed.")]
	InvalidSignature,
}

/// Verified claims returned by [`decode_at`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedToken {
	/// Opaque subject payload, round-tripped unchanged.
	pub subject: Json,
	/// Token role discriminant signed into the payload.
	pub kind: TokenKind,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}

/// Serializes and signs a token carrying the provided subject payload.
///
/// Fails with [`CodecError::Encoding`] when the subject is empty or absent, or the signing key
/// is empty. The supported-algorithm check is structural: [`SignatureScheme`] only admits
/// schemes the codec signs with.
pub fn encode_at(
	subject: &Json,
	kind: TokenKind,
	issued_at: OffsetDateTime,
	validity: Duration,
	key: &SigningKey,
	scheme: SignatureScheme,
) -> Result<String, CodecError> {
	if subject_is_empty(subject) {
		return Err(CodecError::Encoding { reason: "subject payload is empty".into() });
	}
	if key.expose().is_empty() {
		return Err(CodecError::Encoding { reason: "signing key is empty".into() });
	}
	if !validity.is_positive() {
		return Err(CodecError::Encoding { reason: "validity duration is not positive".into() });
	}

	let claims = Claims::new(subject.clone(), kind, issued_at, validity);
	let header = Header::new(scheme.algorithm());
	let encoding_key = EncodingKey::from_secret(key.expose().as_bytes());

	jsonwebtoken::encode(&header, &claims, &encoding_key)
		.map_err(|e| CodecError::Encoding { reason: e.to_string() })
}

/// Convenience wrapper around [`encode_at`] that stamps `issued_at` with the current clock.
pub fn encode(
	subject: &Json,
	kind: TokenKind,
	validity: Duration,
	key: &SigningKey,
	scheme: SignatureScheme,
) -> Result<String, CodecError> {
	encode_at(subject, kind, OffsetDateTime::now_utc(), validity, key, scheme)
}

/// Verifies a serialized token and returns its claims, evaluating expiry against `now`.
///
/// Expiry is an explicit strict comparison here rather than delegated to the JWT library, so
/// the instant can be pinned in tests and the window has zero leeway.
pub fn decode_at(
	token: &str,
	key: &SigningKey,
	scheme: SignatureScheme,
	now: OffsetDateTime,
) -> Result<DecodedToken, CodecError> {
	let mut validation = Validation::new(scheme.algorithm());

	validation.validate_exp = false;
	validation.leeway = 0;
	validation.required_spec_claims.clear();

	let decoding_key = DecodingKey::from_secret(key.expose().as_bytes());
	// With exp validation disabled every decode failure is either a signature mismatch or a
	// malformed structure; both are integrity failures.
	let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
		.map_err(|_| CodecError::InvalidSignature)?;
	let claims = data.claims;
	let issued_at = claims.issued_at().map_err(|_| CodecError::InvalidSignature)?;
	let expires_at = claims.expires_at().map_err(|_| CodecError::InvalidSignature)?;

	if now > expires_at {
		return Err(CodecError::Expired);
	}

	Ok(DecodedToken { subject: claims.subject, kind: claims.kind, issued_at, expires_at })
}

/// Convenience wrapper around [`decode_at`] using the current clock.
pub fn decode(
	token: &str,
	key: &SigningKey,
	scheme: SignatureScheme,
) -> Result<DecodedToken, CodecError> {
	decode_at(token, key, scheme, OffsetDateTime::now_utc())
}

fn subject_is_empty(subject: &Json) -> bool {
	match subject {
		Json::Null => true,
		Json::String(s) => s.is_empty(),
		Json::Object(map) => map.is_empty(),
		Json::Array(items) => items.is_empty(),
		Json::Bool(_) | Json::Number(_) => false,
	}
}
