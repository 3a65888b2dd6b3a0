//! Sliding-window failure log keyed by caller identity, cleared on success.

// self
use crate::{_prelude::*, guard::Verdict, identity::ClientKey, policy::BruteForceRule};

type FailureMap = Arc<Mutex<HashMap<ClientKey, Vec<OffsetDateTime>>>>;

/// Sliding-window lockout guard shared by every clone.
///
/// Stale failure timestamps are pruned lazily on each evaluation, never by a background sweep,
/// so an entry only ever holds instants within the trailing window. Only failures classified
/// as authentication failures (invalid credentials) may be recorded; malformed requests and
/// server errors must not count, or unrelated errors would lock callers out.
#[derive(Clone, Debug)]
pub struct BruteForceGuard {
	rule: BruteForceRule,
	failures: FailureMap,
}
impl BruteForceGuard {
	/// Creates a guard with its own isolated store.
	pub fn new(rule: BruteForceRule) -> Self {
		Self { rule, failures: Default::default() }
	}

	/// Returns the configured failure budget rule.
	pub const fn rule(&self) -> BruteForceRule {
		self.rule
	}

	/// Prunes stale failures for the identity, then compares the remainder to the budget.
	pub fn evaluate_at(&self, key: &ClientKey, now: OffsetDateTime) -> Verdict {
		let mut failures = self.failures.lock();
		let Some(attempts) = failures.get_mut(key) else {
			return Verdict::Allowed;
		};

		Self::prune(attempts, now, self.rule.window);

		if attempts.is_empty() {
			failures.remove(key);

			return Verdict::Allowed;
		}
		if attempts.len() >= self.rule.max_attempts as usize {
			return Verdict::Locked;
		}

		Verdict::Allowed
	}

	/// Appends an authentication failure observed at `now`.
	pub fn record_failure_at(&self, key: &ClientKey, now: OffsetDateTime) {
		let mut failures = self.failures.lock();
		let attempts = failures.entry(key.clone()).or_default();

		Self::prune(attempts, now, self.rule.window);
		attempts.push(now);
	}

	/// Clears the identity's failure log entirely after a successful authentication.
	pub fn record_success(&self, key: &ClientKey) {
		self.failures.lock().remove(key);
	}

	/// Convenience wrapper around [`Self::evaluate_at`] using the current clock.
	pub fn evaluate(&self, key: &ClientKey) -> Verdict {
		self.evaluate_at(key, OffsetDateTime::now_utc())
	}

	/// Convenience wrapper around [`Self::record_failure_at`] using the current clock.
	pub fn record_failure(&self, key: &ClientKey) {
		self.record_failure_at(key, OffsetDateTime::now_utc());
	}

	fn prune(attempts: &mut Vec<OffsetDateTime>, now: OffsetDateTime, window: Duration) {
		attempts.retain(|instant| now - *instant < window);
	}
}
