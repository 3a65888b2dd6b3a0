//! Secret-hashing contract backed by a slow, salted, one-way function.

// crates.io
use argon2::{
	Argon2,
	password_hash::{
		Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
		rand_core::OsRng,
	},
};
// self
use crate::_prelude::*;

/// Failures raised by the hashing machinery itself.
///
/// A wrong password is *not* an error here; [`SecretHasher::verify`] reports it as `Ok(false)`
/// so callers can count it as an authentication failure without conflating it with hasher
/// breakage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum HashError {
	/// Hashing the plaintext failed.
	#[error("Secret hashing failed: {message}.")]
	Hashing {
		/// Human-readable error payload.
		message: String,
	},
	/// The stored digest could not be parsed.
	#[error("Stored digest is malformed.")]
	MalformedDigest,
}

/// Slow, salted, one-way hashing contract for principal secrets.
pub trait SecretHasher
where
	Self: Send + Sync,
{
	/// Hashes a plaintext secret with a fresh salt.
	fn hash(&self, plaintext: &str) -> Result<String, HashError>;

	/// Verifies a plaintext secret against a stored digest.
	fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError>;
}

/// Argon2id-backed [`SecretHasher`] using the library's recommended parameters.
#[derive(Clone, Debug, Default)]
pub struct Argon2Hasher;
impl SecretHasher for Argon2Hasher {
	fn hash(&self, plaintext: &str) -> Result<String, HashError> {
		let salt = SaltString::generate(&mut OsRng);
		let digest = Argon2::default()
			.hash_password(plaintext.as_bytes(), &salt)
			.map_err(|e| HashError::Hashing { message: e.to_string() })?;

		Ok(digest.to_string())
	}

	fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
		let parsed = PasswordHash::new(digest).map_err(|_| HashError::MalformedDigest)?;

		match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
			Ok(()) => Ok(true),
			Err(PasswordHashError::Password) => Ok(false),
			Err(e) => Err(HashError::Hashing { message: e.to_string() }),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hash_and_verify_round_trip() {
		let hasher = Argon2Hasher;
		let digest = hasher.hash("correct horse battery staple").expect("Hashing should succeed.");

		assert!(digest.starts_with("$argon2"));
		assert!(
			hasher
				.verify("correct horse battery staple", &digest)
				.expect("Verification machinery should not fail.")
		);
		assert!(
			!hasher.verify("wrong password", &digest).expect("A mismatch is not a hasher error.")
		);
	}

	#[test]
	fn salts_differ_between_hashes() {
		let hasher = Argon2Hasher;
		let first = hasher.hash("secret").expect("First hash should succeed.");
		let second = hasher.hash("secret").expect("Second hash should succeed.");

		assert_ne!(first, second, "fresh salts must yield distinct digests");
	}

	#[test]
	fn malformed_digest_is_a_distinct_failure() {
		let hasher = Argon2Hasher;

		assert_eq!(hasher.verify("secret", "not-a-digest").err(), Some(HashError::MalformedDigest));
	}
}
