//! High-level credential flows orchestrated by the gate.

pub mod login;
pub mod password_reset;
pub mod register;
pub mod session;

pub use login::*;
pub use password_reset::*;
pub use register::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	guard::{BruteForceGuard, Decision, RateLimiter, Verdict},
	hasher::SecretHasher,
	identity::ClientKey,
	notify::Notifier,
	obs::{self, GateStage},
	policy::GatePolicy,
	store::CredentialStore,
	token::TokenLifecycle,
};

/// Coordinates the guards, token lifecycle, and collaborator contracts for one deployment.
///
/// The gate owns the validated policy plus handles to the credential store, secret hasher, and
/// notifier so individual flows can focus on their own orchestration (admission checks, token
/// issuance, rotation, secret updates). Guard stores are per-gate; constructing a fresh gate
/// yields isolated counters, which is what tests want.
#[derive(Clone)]
pub struct Gate {
	policy: GatePolicy,
	lifecycle: TokenLifecycle,
	rate_limiter: RateLimiter,
	brute_force: BruteForceGuard,
	store: Arc<dyn CredentialStore>,
	hasher: Arc<dyn SecretHasher>,
	notifier: Arc<dyn Notifier>,
}
impl Gate {
	/// Creates a gate from a validated policy and collaborator handles.
	pub fn new(
		policy: GatePolicy,
		store: Arc<dyn CredentialStore>,
		hasher: Arc<dyn SecretHasher>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		let lifecycle = TokenLifecycle::new(&policy);
		let rate_limiter = RateLimiter::new(policy.rate_limit);
		let brute_force = BruteForceGuard::new(policy.brute_force);

		Self { policy, lifecycle, rate_limiter, brute_force, store, hasher, notifier }
	}

	/// Returns the validated policy this gate enforces.
	pub const fn policy(&self) -> &GatePolicy {
		&self.policy
	}

	/// Returns the token lifecycle manager.
	pub const fn lifecycle(&self) -> &TokenLifecycle {
		&self.lifecycle
	}

	/// Returns the fixed-window rate limiter guarding this gate.
	pub const fn rate_limiter(&self) -> &RateLimiter {
		&self.rate_limiter
	}

	/// Returns the sliding-window brute-force guard.
	pub const fn brute_force(&self) -> &BruteForceGuard {
		&self.brute_force
	}

	/// Runs the guard pipeline ahead of a credential-checking endpoint.
	///
	/// Order matters: the request budget is spent before the lockout check, so hammering a
	/// locked identity still burns its rate budget.
	pub fn admit_at(&self, key: &ClientKey, now: OffsetDateTime) -> Result<()> {
		match self.rate_limiter.check_and_increment_at(key, now) {
			Decision::Allow => {},
			Decision::Reject(retry) => {
				let error = Error::RateLimited { retry };

				obs::note_rejection(GateStage::Admission, &error);

				return Err(error);
			},
		}

		match self.brute_force.evaluate_at(key, now) {
			Verdict::Allowed => Ok(()),
			Verdict::Locked => {
				let error = Error::LockedOut;

				obs::note_rejection(GateStage::Admission, &error);

				Err(error)
			},
		}
	}

	/// Convenience wrapper around [`Self::admit_at`] using the current clock.
	pub fn admit(&self, key: &ClientKey) -> Result<()> {
		self.admit_at(key, OffsetDateTime::now_utc())
	}
}
impl Debug for Gate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gate")
			.field("policy", &self.policy)
			.field("rate_limiter", &self.rate_limiter)
			.field("brute_force", &self.brute_force)
			.finish()
	}
}
