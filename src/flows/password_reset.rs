//! Password reset flow.

// self
use crate::{
	_prelude::*,
	flows::Gate,
	notify::{Message, NotifyError},
	obs::{self, GateStage, StageOutcome, StageSpan},
};

/// Input for resetting a principal's secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordReset {
	/// Unique login identifier of the principal.
	pub identifier: String,
	/// Replacement plaintext secret.
	pub new_secret: String,
}
impl Debug for PasswordReset {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordReset")
			.field("identifier", &self.identifier)
			.field("new_secret", &"<redacted>")
			.finish()
	}
}

/// Terminal state of a reset whose credential-store mutation committed.
#[derive(Clone, Debug)]
pub enum ResetOutcome {
	/// Secret replaced and the principal notified (or there was no contact address to notify).
	Completed,
	/// Secret replaced but the notification failed to deliver.
	///
	/// The mutation is already durable and is never rolled back for a delivery failure; the
	/// caller decides whether to retry the notification.
	NotificationFailed(NotifyError),
}
impl ResetOutcome {
	/// Returns `true` when the notification leg also succeeded (or was not applicable).
	pub const fn is_fully_delivered(&self) -> bool {
		matches!(self, ResetOutcome::Completed)
	}
}

impl Gate {
	/// Replaces the principal's secret with a freshly hashed digest, then notifies them.
	///
	/// An unknown identifier surfaces as [`Error::UnknownPrincipal`]. Notification failure is a
	/// degraded success, not an error.
	pub async fn reset_password(&self, reset: PasswordReset) -> Result<ResetOutcome> {
		const STAGE: GateStage = GateStage::PasswordReset;

		let span = StageSpan::new(STAGE, "reset_password");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.reset_inner(reset)).await;

		obs::record_stage_outcome(
			STAGE,
			if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		result
	}

	async fn reset_inner(&self, reset: PasswordReset) -> Result<ResetOutcome> {
		let Some(principal) = self.store.find_by_identifier(&reset.identifier).await? else {
			return Err(Error::UnknownPrincipal);
		};
		let secret_digest = self.hasher.hash(&reset.new_secret)?;

		self.store.update_secret(&principal.id, &secret_digest).await?;

		let Some(recipient) = principal.contact else {
			return Ok(ResetOutcome::Completed);
		};
		let message = Message {
			recipient,
			subject: "Your password was changed".into(),
			body: format!(
				"The password for {} was just changed. If this was not you, contact support immediately.",
				principal.identifier
			),
		};

		match self.notifier.deliver(&message).await {
			Ok(()) => Ok(ResetOutcome::Completed),
			Err(e) => {
				#[cfg(feature = "tracing")]
				::tracing::warn!(
					identifier = %principal.identifier,
					error = %e,
					"password reset committed but the notification failed",
				);

				Ok(ResetOutcome::NotificationFailed(e))
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, flows::Registration};

	async fn seeded(
		contact: Option<&str>,
	) -> (Gate, Arc<MemoryCredentialStore>, Arc<MemoryNotifier>) {
		let (gate, store, notifier) = build_memory_gate(test_policy());

		gate.register(Registration {
			identifier: "alice@example.com".into(),
			secret: "old password".into(),
			contact: contact.map(Into::into),
		})
		.await
		.expect("Seeding the fixture principal should succeed.");

		(gate, store, notifier)
	}

	#[tokio::test]
	async fn reset_replaces_the_digest_and_notifies_the_contact() {
		let (gate, store, notifier) = seeded(Some("alice@example.com")).await;
		let outcome = gate
			.reset_password(PasswordReset {
				identifier: "alice@example.com".into(),
				new_secret: "new password".into(),
			})
			.await
			.expect("Resetting a known principal should succeed.");

		assert!(outcome.is_fully_delivered());

		let record = store
			.find_by_identifier("alice@example.com")
			.await
			.expect("Lookup should succeed.")
			.expect("The principal should still exist.");

		assert!(
			Argon2Hasher
				.verify("new password", &record.secret_digest)
				.expect("Verification machinery should not fail.")
		);
		assert!(
			!Argon2Hasher
				.verify("old password", &record.secret_digest)
				.expect("Verification machinery should not fail.")
		);

		let sent = notifier.sent();

		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].recipient, "alice@example.com");
	}

	#[tokio::test]
	async fn unknown_identifier_is_rejected_before_any_mutation() {
		let (gate, store, _) = seeded(None).await;
		let verdict = gate
			.reset_password(PasswordReset {
				identifier: "nobody@example.com".into(),
				new_secret: "irrelevant".into(),
			})
			.await;

		assert!(matches!(verdict, Err(Error::UnknownPrincipal)));
		assert_eq!(store.len(), 1);
	}

	#[tokio::test]
	async fn notification_failure_does_not_roll_back_the_reset() {
		let (gate, store, notifier) = seeded(Some("alice@example.com")).await;

		notifier.set_failing(true);

		let outcome = gate
			.reset_password(PasswordReset {
				identifier: "alice@example.com".into(),
				new_secret: "new password".into(),
			})
			.await
			.expect("The reset itself should still succeed.");

		assert!(matches!(outcome, ResetOutcome::NotificationFailed(_)));

		let record = store
			.find_by_identifier("alice@example.com")
			.await
			.expect("Lookup should succeed.")
			.expect("The principal should still exist.");

		assert!(
			Argon2Hasher
				.verify("new password", &record.secret_digest)
				.expect("The committed digest must survive the failed notification.")
		);
	}

	#[tokio::test]
	async fn missing_contact_skips_the_notification() {
		let (gate, _, notifier) = seeded(None).await;
		let outcome = gate
			.reset_password(PasswordReset {
				identifier: "alice@example.com".into(),
				new_secret: "new password".into(),
			})
			.await
			.expect("Resetting without a contact should succeed.");

		assert!(outcome.is_fully_delivered());
		assert!(notifier.sent().is_empty());
	}
}
