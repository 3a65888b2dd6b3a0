//! Principal registration flow.

// self
use crate::{
	_prelude::*,
	flows::Gate,
	obs::{self, GateStage, StageOutcome, StageSpan},
	store::{NewPrincipal, PrincipalRecord, StoreError},
};

/// Input for registering a new principal; the secret arrives in plaintext and is hashed before
/// it touches the store.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
	/// Unique login identifier (username, email, ...).
	pub identifier: String,
	/// Plaintext secret.
	pub secret: String,
	/// Optional delivery address for notifications.
	pub contact: Option<String>,
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("identifier", &self.identifier)
			.field("secret", &"<redacted>")
			.field("contact", &self.contact)
			.finish()
	}
}

impl Gate {
	/// Hashes the secret and persists a new principal.
	///
	/// A taken identifier surfaces as [`Error::DuplicateIdentifier`], whether caught by the
	/// pre-check or by the store's own uniqueness constraint racing a concurrent registration.
	pub async fn register(&self, registration: Registration) -> Result<PrincipalRecord> {
		const STAGE: GateStage = GateStage::Register;

		let span = StageSpan::new(STAGE, "register");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.register_inner(registration)).await;

		obs::record_stage_outcome(
			STAGE,
			if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		result
	}

	async fn register_inner(&self, registration: Registration) -> Result<PrincipalRecord> {
		if self.store.find_by_identifier(&registration.identifier).await?.is_some() {
			return Err(Error::DuplicateIdentifier);
		}

		let secret_digest = self.hasher.hash(&registration.secret)?;
		let record = self
			.store
			.create(NewPrincipal {
				identifier: registration.identifier,
				secret_digest,
				contact: registration.contact,
			})
			.await
			.map_err(|e| match e {
				StoreError::Conflict => Error::DuplicateIdentifier,
				e => e.into(),
			})?;

		Ok(record)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[tokio::test]
	async fn registration_stores_a_digest_not_the_plaintext() {
		let (gate, store, _) = build_memory_gate(test_policy());
		let record = gate
			.register(Registration {
				identifier: "alice@example.com".into(),
				secret: "correct horse battery staple".into(),
				contact: None,
			})
			.await
			.expect("Registering a fresh identifier should succeed.");

		assert_ne!(record.secret_digest, "correct horse battery staple");
		assert!(record.secret_digest.starts_with("$argon2"));
		assert_eq!(store.len(), 1);

		// The stored digest verifies against the original plaintext.
		assert!(
			Argon2Hasher
				.verify("correct horse battery staple", &record.secret_digest)
				.expect("Verification machinery should not fail.")
		);
	}

	#[tokio::test]
	async fn duplicate_identifier_is_rejected() {
		let (gate, _, _) = build_memory_gate(test_policy());
		let registration = Registration {
			identifier: "alice@example.com".into(),
			secret: "first".into(),
			contact: None,
		};

		gate.register(registration.clone())
			.await
			.expect("The first registration should succeed.");

		let verdict = gate.register(registration).await;

		assert!(matches!(verdict, Err(Error::DuplicateIdentifier)));
	}
}
